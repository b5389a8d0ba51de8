use anyhow::Result;
use cadence_core::models::{weekday_ordinal, Frequency, FrequencyKind, RuleSpec};
use chrono::{Datelike, NaiveDate, Utc};
use owo_colors::OwoColorize;

use super::Context;
use crate::cli::{PatternArgs, RuleAddCommand, RuleCommand, RuleEditCommand, RuleIdArg, RuleListCommand};
use crate::parser::{parse_date, parse_weekdays};
use crate::util::resolve_rule;
use crate::views::table::{describe_pattern, display_rule_status, display_rules};

pub async fn rule_command(ctx: &Context, command: RuleCommand) -> Result<()> {
    match command {
        RuleCommand::Add(cmd) => add_rule(ctx, cmd).await,
        RuleCommand::Edit(cmd) => edit_rule(ctx, cmd).await,
        RuleCommand::Disable(cmd) => disable_rule(ctx, cmd).await,
        RuleCommand::Enable(cmd) => enable_rule(ctx, cmd).await,
        RuleCommand::List(cmd) => list_rules(ctx, cmd).await,
        RuleCommand::Show(cmd) => show_rule(ctx, cmd).await,
    }
}

/// Builds a frequency from the pattern flags.
///
/// Fields the flags leave out are taken from `base` (the rule being edited),
/// then from the start date: its weekday, day of month and month.
pub fn build_frequency(
    pattern: &PatternArgs,
    base: Option<&Frequency>,
    start: NaiveDate,
) -> Result<Frequency> {
    let kind = pattern
        .every
        .or_else(|| base.map(Frequency::kind))
        .unwrap_or(FrequencyKind::Daily);

    let (base_day, base_month) = match base {
        Some(Frequency::Monthly { day_of_month }) => (Some(*day_of_month), None),
        Some(Frequency::Yearly {
            month_of_year,
            day_of_month,
        }) => (Some(*day_of_month), Some(*month_of_year)),
        _ => (None, None),
    };
    let day = pattern.day.or(base_day).unwrap_or_else(|| start.day());
    let month = pattern.month.or(base_month).unwrap_or_else(|| start.month());

    let weekdays = match &pattern.on {
        Some(list) => parse_weekdays(list)?,
        None => match base.and_then(Frequency::weekdays) {
            Some(days) => days.clone(),
            None => [weekday_ordinal(start.weekday())].into_iter().collect(),
        },
    };

    Ok(match kind {
        FrequencyKind::Daily => Frequency::Daily,
        FrequencyKind::Weekly => Frequency::Weekly { weekdays },
        FrequencyKind::Custom => Frequency::Custom { weekdays },
        FrequencyKind::Monthly => Frequency::Monthly { day_of_month: day },
        FrequencyKind::Yearly => Frequency::Yearly {
            month_of_year: month,
            day_of_month: day,
        },
    })
}

fn touches_pattern(pattern: &PatternArgs) -> bool {
    pattern.every.is_some() || pattern.on.is_some() || pattern.day.is_some() || pattern.month.is_some()
}

async fn add_rule(ctx: &Context, cmd: RuleAddCommand) -> Result<()> {
    let start_date = match &cmd.start {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };
    let end_date = cmd.until.as_deref().map(parse_date).transpose()?;

    let spec = RuleSpec {
        source_task_id: cmd.source.unwrap_or_else(|| "manual".to_string()),
        list_id: cmd.list,
        account_scope: ctx.account.clone(),
        frequency: build_frequency(&cmd.pattern, None, start_date)?,
        interval: cmd.pattern.interval.unwrap_or(1),
        start_date,
        end_date,
        title: cmd.title,
        notes: cmd.notes,
    };

    let rule = ctx.lifecycle.create_rule(spec).await?;
    println!(
        "Created rule {} '{}' ({})",
        rule.id.to_string().yellow(),
        rule.title,
        describe_pattern(&rule)
    );
    Ok(())
}

async fn edit_rule(ctx: &Context, cmd: RuleEditCommand) -> Result<()> {
    let rule = resolve_rule(&ctx.repo, &ctx.account, &cmd.id).await?;
    let mut spec = rule.spec();

    if let Some(title) = cmd.title {
        spec.title = title;
    }
    if let Some(notes) = cmd.notes {
        spec.notes = Some(notes);
    } else if cmd.notes_clear {
        spec.notes = None;
    }
    if let Some(list) = cmd.list {
        spec.list_id = list;
    }
    if let Some(start) = &cmd.start {
        spec.start_date = parse_date(start)?;
    }
    if let Some(until) = &cmd.until {
        spec.end_date = Some(parse_date(until)?);
    } else if cmd.until_clear {
        spec.end_date = None;
    }
    if let Some(interval) = cmd.pattern.interval {
        spec.interval = interval;
    }
    if touches_pattern(&cmd.pattern) {
        spec.frequency = build_frequency(&cmd.pattern, Some(&rule.frequency), spec.start_date)?;
    }

    let updated = ctx.lifecycle.update_rule(rule.id, spec).await?;
    println!("Updated rule '{}' ({})", updated.title, describe_pattern(&updated));
    Ok(())
}

async fn disable_rule(ctx: &Context, cmd: RuleIdArg) -> Result<()> {
    let rule = resolve_rule(&ctx.repo, &ctx.account, &cmd.id).await?;
    ctx.lifecycle.disable_rule(rule.id).await?;
    println!("Disabled rule '{}'. Generated tasks are kept.", rule.title);
    Ok(())
}

async fn enable_rule(ctx: &Context, cmd: RuleIdArg) -> Result<()> {
    let rule = resolve_rule(&ctx.repo, &ctx.account, &cmd.id).await?;
    ctx.lifecycle.enable_rule(rule.id).await?;
    println!("Enabled rule '{}'.", rule.title);
    Ok(())
}

async fn list_rules(ctx: &Context, cmd: RuleListCommand) -> Result<()> {
    let mut rules = ctx.repo.find_rules(&ctx.account).await?;
    if !cmd.all {
        rules.retain(|r| r.is_active);
    }
    display_rules(&rules);
    Ok(())
}

async fn show_rule(ctx: &Context, cmd: RuleIdArg) -> Result<()> {
    let rule = resolve_rule(&ctx.repo, &ctx.account, &cmd.id).await?;
    let status = ctx.scheduler.rule_status(rule.id).await?;
    display_rule_status(&status);
    Ok(())
}
