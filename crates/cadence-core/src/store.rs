//! Collaborator contracts the engine depends on.
//!
//! The engine never owns storage. Task creation, rule persistence and the
//! instance ledger all live behind these traits so the same scheduling policy
//! runs against SQLite, an in-memory store, or a remote task service.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{Instance, NewTask, RecurrenceRule, TaskId};

/// External task list that receives materialized occurrences.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, task: NewTask) -> Result<TaskId, CoreError>;
    async fn completion_status(&self, task_id: &str) -> Result<bool, CoreError>;
}

#[async_trait]
pub trait RulePersistence: Send + Sync {
    async fn load(&self, rule_id: Uuid) -> Result<Option<RecurrenceRule>, CoreError>;
    /// Inserts or replaces the rule with the same id.
    async fn save(&self, rule: &RecurrenceRule) -> Result<(), CoreError>;
    async fn list_active(&self, account_scope: &str) -> Result<Vec<RecurrenceRule>, CoreError>;
    /// Soft delete: clears `is_active`, keeps the row.
    async fn disable(&self, rule_id: Uuid) -> Result<(), CoreError>;
}

/// Append-only record of generated instances.
#[async_trait]
pub trait InstanceLedgerPersistence: Send + Sync {
    /// Atomically records `instance` unless one already exists for
    /// `(instance.rule_id, instance.due_date)`. Returns `true` when inserted.
    async fn insert_if_absent(&self, instance: &Instance) -> Result<bool, CoreError>;
    async fn max_due_date(&self, rule_id: Uuid) -> Result<Option<NaiveDate>, CoreError>;
    async fn list_instances(&self, rule_id: Uuid) -> Result<Vec<Instance>, CoreError>;
    async fn find_instance(&self, rule_id: Uuid, due_date: NaiveDate) -> Result<Option<Instance>, CoreError>;
}
