use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Identifier of a task owned by the external task store.
pub type TaskId = String;

/// Weekday ordinals in ISO order: 0 = Monday ... 6 = Sunday.
pub type WeekdaySet = BTreeSet<u8>;

/// Returns the ordinal used in [`WeekdaySet`] for a chrono weekday.
#[inline]
pub fn weekday_ordinal(day: Weekday) -> u8 {
    day.num_days_from_monday() as u8
}

/// Repetition pattern of a rule. Each variant carries only the fields it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly {
        weekdays: WeekdaySet,
    },
    Monthly {
        day_of_month: u32,
    },
    Yearly {
        month_of_year: u32,
        day_of_month: u32,
    },
    /// Weekday-driven pattern with a user-chosen week interval.
    Custom {
        weekdays: WeekdaySet,
    },
}

impl Frequency {
    pub fn kind(&self) -> FrequencyKind {
        match self {
            Frequency::Daily => FrequencyKind::Daily,
            Frequency::Weekly { .. } => FrequencyKind::Weekly,
            Frequency::Monthly { .. } => FrequencyKind::Monthly,
            Frequency::Yearly { .. } => FrequencyKind::Yearly,
            Frequency::Custom { .. } => FrequencyKind::Custom,
        }
    }

    /// Weekday set for weekday-driven variants.
    pub fn weekdays(&self) -> Option<&WeekdaySet> {
        match self {
            Frequency::Weekly { weekdays } | Frequency::Custom { weekdays } => Some(weekdays),
            _ => None,
        }
    }
}

/// Discriminant of [`Frequency`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyKind {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

impl std::fmt::Display for FrequencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrequencyKind::Daily => write!(f, "daily"),
            FrequencyKind::Weekly => write!(f, "weekly"),
            FrequencyKind::Monthly => write!(f, "monthly"),
            FrequencyKind::Yearly => write!(f, "yearly"),
            FrequencyKind::Custom => write!(f, "custom"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid frequency: {0}")]
pub struct ParseFrequencyError(String);

impl FromStr for FrequencyKind {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "day" => Ok(FrequencyKind::Daily),
            "weekly" | "week" => Ok(FrequencyKind::Weekly),
            "monthly" | "month" => Ok(FrequencyKind::Monthly),
            "yearly" | "year" | "annually" => Ok(FrequencyKind::Yearly),
            "custom" => Ok(FrequencyKind::Custom),
            _ => Err(ParseFrequencyError(s.to_string())),
        }
    }
}

/// A stored recurrence definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub id: Uuid,
    /// The plain task that was promoted to repeating
    pub source_task_id: String,
    pub list_id: String,
    pub account_scope: String,
    pub frequency: Frequency,
    /// Every N units of `frequency`
    pub interval: u32,
    /// Inclusive anchor; never generated itself
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub title: String,
    pub notes: Option<String>,
    /// Soft-delete flag
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecurrenceRule {
    /// Builds an active rule from an already validated spec.
    pub fn from_spec(spec: RuleSpec) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            source_task_id: spec.source_task_id,
            list_id: spec.list_id,
            account_scope: spec.account_scope,
            frequency: spec.frequency,
            interval: spec.interval,
            start_date: spec.start_date,
            end_date: spec.end_date,
            title: spec.title,
            notes: spec.notes,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every user-editable field, keeping identity and activity.
    pub fn apply_spec(&mut self, spec: RuleSpec) {
        self.source_task_id = spec.source_task_id;
        self.list_id = spec.list_id;
        self.account_scope = spec.account_scope;
        self.frequency = spec.frequency;
        self.interval = spec.interval;
        self.start_date = spec.start_date;
        self.end_date = spec.end_date;
        self.title = spec.title;
        self.notes = spec.notes;
        self.updated_at = Utc::now();
    }

    /// The user-editable part of the rule.
    pub fn spec(&self) -> RuleSpec {
        RuleSpec {
            source_task_id: self.source_task_id.clone(),
            list_id: self.list_id.clone(),
            account_scope: self.account_scope.clone(),
            frequency: self.frequency.clone(),
            interval: self.interval,
            start_date: self.start_date,
            end_date: self.end_date,
            title: self.title.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Input for creating or replacing a rule. Not yet validated.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSpec {
    pub source_task_id: String,
    pub list_id: String,
    pub account_scope: String,
    pub frequency: Frequency,
    pub interval: u32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub title: String,
    pub notes: Option<String>,
}

/// One concrete, dated materialization of a rule. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Instance {
    pub rule_id: Uuid,
    pub generated_task_id: TaskId,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Instance {
    pub fn new(rule_id: Uuid, generated_task_id: TaskId, due_date: NaiveDate) -> Self {
        Self {
            rule_id,
            generated_task_id,
            due_date,
            created_at: Utc::now(),
        }
    }
}

/// Payload handed to the task store when materializing an occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub notes: Option<String>,
    pub due_date: NaiveDate,
    pub list_id: String,
}

impl NewTask {
    pub fn for_occurrence(rule: &RecurrenceRule, due_date: NaiveDate) -> Self {
        Self {
            title: rule.title.clone(),
            notes: rule.notes.clone(),
            due_date,
            list_id: rule.list_id.clone(),
        }
    }
}

/// Snapshot of a rule together with what it has produced so far.
#[derive(Debug, Clone)]
pub struct RuleStatus {
    pub rule: RecurrenceRule,
    pub instances: Vec<Instance>,
    /// Generated tasks the task store reports as completed
    pub completed_tasks: BTreeSet<TaskId>,
    pub last_due_date: Option<NaiveDate>,
    pub next_due_date: Option<NaiveDate>,
}

impl RuleStatus {
    pub fn completed_instances(&self) -> usize {
        self.instances.iter().filter(|i| self.is_completed(i)).count()
    }

    pub fn is_completed(&self, instance: &Instance) -> bool {
        self.completed_tasks.contains(&instance.generated_task_id)
    }
}
