use anyhow::Result;

use super::done::report_next;
use super::Context;
use crate::cli::CompleteCommand;
use crate::parser::parse_date;
use crate::util::resolve_rule;

/// Completion event for a task that lives outside the local list.
pub async fn complete_occurrence(ctx: &Context, cmd: CompleteCommand) -> Result<()> {
    let rule = resolve_rule(&ctx.repo, &ctx.account, &cmd.rule_id).await?;
    let due = parse_date(&cmd.due)?;

    let next = ctx.scheduler.on_task_completed(rule.id, due).await?;
    report_next(ctx, next).await
}
