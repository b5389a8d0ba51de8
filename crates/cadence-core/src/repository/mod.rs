use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{Frequency, RecurrenceRule};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

// Collaborator trait implementations, one domain per module
pub mod instances;
pub mod rules;
pub mod tasks;

pub use tasks::LocalTask;

/// Raw `rules` row; the frequency column holds the tagged union as JSON.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct RuleRow {
    pub id: Uuid,
    pub source_task_id: String,
    pub list_id: String,
    pub account_scope: String,
    pub frequency: String,
    pub interval: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub title: String,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<RuleRow> for RecurrenceRule {
    type Error = CoreError;

    fn try_from(row: RuleRow) -> Result<Self, Self::Error> {
        let frequency: Frequency = serde_json::from_str(&row.frequency)?;
        let interval = u32::try_from(row.interval)
            .map_err(|_| CoreError::Persistence(format!("Rule {} has invalid interval {}", row.id, row.interval)))?;
        Ok(Self {
            id: row.id,
            source_task_id: row.source_task_id,
            list_id: row.list_id,
            account_scope: row.account_scope,
            frequency,
            interval,
            start_date: row.start_date,
            end_date: row.end_date,
            title: row.title,
            notes: row.notes,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// SQLite implementation of the rule, ledger and task store contracts
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}
