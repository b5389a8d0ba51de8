use anyhow::Result;
use cadence_core::recurrence::preview;
use chrono::Utc;

use super::Context;
use crate::cli::PreviewCommand;
use crate::parser::parse_date;
use crate::util::resolve_rule;
use crate::views::table::{describe_pattern, display_dates};

pub async fn preview_rule(ctx: &Context, cmd: PreviewCommand) -> Result<()> {
    let rule = resolve_rule(&ctx.repo, &ctx.account, &cmd.id).await?;
    let after = match &cmd.after {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };

    if !rule.is_active {
        println!("Rule '{}' is disabled; nothing will be generated.", rule.title);
        return Ok(());
    }

    println!("'{}' {} after {}:", rule.title, describe_pattern(&rule), after);
    display_dates(&preview(&rule, after, cmd.count));
    Ok(())
}
