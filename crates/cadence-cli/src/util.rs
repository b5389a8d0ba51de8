use anyhow::Result;
use cadence_core::models::RecurrenceRule;
use cadence_core::repository::{LocalTask, SqliteRepository};
use thiserror::Error;

/// Lookup failures for IDs typed on the command line.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("ID prefix must be at least 2 characters long")]
    PrefixTooShort,
    #[error("No {kind} found with ID prefix '{prefix}'")]
    NotFound { kind: &'static str, prefix: String },
    #[error("Ambiguous {kind} ID '{prefix}'")]
    Ambiguous {
        kind: &'static str,
        prefix: String,
        candidates: Vec<(String, String)>,
    },
}

fn pick_one<T>(
    kind: &'static str,
    prefix: &str,
    mut found: Vec<T>,
    describe: impl Fn(&T) -> (String, String),
) -> Result<T, LookupError> {
    match found.len() {
        1 => Ok(found.remove(0)),
        0 => Err(LookupError::NotFound {
            kind,
            prefix: prefix.to_string(),
        }),
        _ => Err(LookupError::Ambiguous {
            kind,
            prefix: prefix.to_string(),
            candidates: found.iter().map(describe).collect(),
        }),
    }
}

/// Resolves a rule ID prefix within one account; other accounts' rules are invisible.
pub async fn resolve_rule(repo: &SqliteRepository, account_scope: &str, prefix: &str) -> Result<RecurrenceRule> {
    if prefix.len() < 2 {
        return Err(LookupError::PrefixTooShort.into());
    }
    let rules = repo.find_rules_by_id_prefix(account_scope, prefix).await?;
    Ok(pick_one("rule", prefix, rules, |r| (r.id.to_string(), r.title.clone()))?)
}

pub async fn resolve_task(repo: &SqliteRepository, prefix: &str) -> Result<LocalTask> {
    if prefix.len() < 2 {
        return Err(LookupError::PrefixTooShort.into());
    }
    let tasks = repo.find_tasks_by_id_prefix(prefix).await?;
    Ok(pick_one("task", prefix, tasks, |t| (t.id.clone(), t.title.clone()))?)
}

/// First `len` characters of an ID for compact display.
pub fn short_id(id: &str, len: usize) -> &str {
    id.get(..len).unwrap_or(id)
}
