use thiserror::Error;
use uuid::Uuid;

/// Structural problems with a rule, caught before anything is persisted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Interval must be at least 1, got {0}")]
    IntervalTooSmall(u32),

    #[error("End date {end} is before start date {start}")]
    EndBeforeStart {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Weekly and custom rules need at least one weekday")]
    EmptyWeekdays,

    #[error("Weekday ordinal {0} is out of range (expected 0..=6)")]
    WeekdayOutOfRange(u8),

    #[error("Day of month {0} is out of range (expected 1..=31)")]
    DayOfMonthOutOfRange(u32),

    #[error("Month {0} is out of range (expected 1..=12)")]
    MonthOutOfRange(u32),

    #[error("Rule title must not be empty")]
    EmptyTitle,
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid rule: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Rule not found: {0}")]
    RuleNotFound(Uuid),

    #[error("Rule is inactive: {0}")]
    InactiveRule(Uuid),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Serialization error")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// True for failures raised by a task store or persistence collaborator.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            CoreError::Persistence(_)
                | CoreError::Database(_)
                | CoreError::Migration(_)
                | CoreError::Io(_)
                | CoreError::Serialization(_)
        )
    }
}
