use anyhow::Result;

use super::Context;
use crate::cli::TasksCommand;
use crate::views::table::display_tasks;

pub async fn list_tasks(ctx: &Context, cmd: TasksCommand) -> Result<()> {
    let tasks = ctx.repo.find_tasks(cmd.all).await?;
    display_tasks(&tasks);
    Ok(())
}
