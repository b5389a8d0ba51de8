use anyhow::{anyhow, Result};
use cadence_core::models::TaskId;

use super::Context;
use crate::cli::DoneCommand;
use crate::util::resolve_task;

pub async fn done_task(ctx: &Context, cmd: DoneCommand) -> Result<()> {
    let task = resolve_task(&ctx.repo, &cmd.id).await?;
    let completed = ctx
        .repo
        .complete_task(&task.id)
        .await?
        .ok_or_else(|| anyhow!("Task '{}' disappeared while completing it", task.id))?;
    println!("Completed task: '{}'", completed.title);

    // Plain tasks have no instance; only generated ones drive their rule.
    let Some(instance) = ctx.repo.find_instance_by_task(&completed.id).await? else {
        return Ok(());
    };

    let next = ctx
        .scheduler
        .on_task_completed(instance.rule_id, instance.due_date)
        .await?;
    report_next(ctx, next).await
}

/// Prints the task created for the following occurrence, if any.
pub async fn report_next(ctx: &Context, next: Option<TaskId>) -> Result<()> {
    match next {
        Some(id) => match ctx.repo.find_task_by_id(&id).await? {
            Some(task) => println!("Created next task '{}' due {}", task.title, task.due_date),
            None => println!("Created next task {}", id),
        },
        None => println!("No new occurrence generated."),
    }
    Ok(())
}
