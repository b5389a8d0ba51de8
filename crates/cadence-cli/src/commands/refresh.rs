use anyhow::Result;
use chrono::Utc;

use super::Context;
use crate::cli::RefreshCommand;
use crate::parser::parse_date;
use crate::views::table::display_tasks;

pub async fn refresh(ctx: &Context, cmd: RefreshCommand) -> Result<()> {
    let horizon = cmd.horizon.unwrap_or(ctx.scheduler.config().lookahead_days);
    let today = match &cmd.today {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };

    let created = ctx
        .scheduler
        .refresh_upcoming_from(&ctx.account, horizon, today)
        .await?;

    println!("Generated {} task(s) for the next {} day(s).", created.len(), horizon);
    if created.is_empty() {
        return Ok(());
    }

    let mut tasks = Vec::with_capacity(created.len());
    for id in &created {
        if let Some(task) = ctx.repo.find_task_by_id(id).await? {
            tasks.push(task);
        }
    }
    tasks.sort_by_key(|t| t.due_date);
    display_tasks(&tasks);
    Ok(())
}
