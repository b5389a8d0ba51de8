//! In-process implementation of every collaborator contract.
//!
//! Useful for embedding the engine without a database and as the backing
//! store of the scheduler tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{Instance, NewTask, RecurrenceRule, TaskId};
use crate::store::{InstanceLedgerPersistence, RulePersistence, TaskStore};

/// A task held by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryTask {
    pub id: TaskId,
    pub title: String,
    pub notes: Option<String>,
    pub due_date: NaiveDate,
    pub list_id: String,
    pub completed: bool,
}

#[derive(Default)]
struct Inner {
    rules: HashMap<Uuid, RecurrenceRule>,
    instances: BTreeMap<(Uuid, NaiveDate), Instance>,
    tasks: BTreeMap<TaskId, MemoryTask>,
    next_task: u64,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_task_creation: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `create_task` call fail until reset.
    pub fn set_task_creation_failure(&self, fail: bool) {
        self.fail_task_creation.store(fail, Ordering::SeqCst);
    }

    pub async fn tasks(&self) -> Vec<MemoryTask> {
        self.inner.lock().await.tasks.values().cloned().collect()
    }

    /// Marks a task as done. Returns `false` for unknown ids.
    pub async fn complete_task(&self, task_id: &str) -> bool {
        match self.inner.lock().await.tasks.get_mut(task_id) {
            Some(task) => {
                task.completed = true;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, task: NewTask) -> Result<TaskId, CoreError> {
        if self.fail_task_creation.load(Ordering::SeqCst) {
            return Err(CoreError::Persistence("task store unavailable".to_string()));
        }
        let mut inner = self.inner.lock().await;
        inner.next_task += 1;
        let id = format!("task-{:05}", inner.next_task);
        inner.tasks.insert(
            id.clone(),
            MemoryTask {
                id: id.clone(),
                title: task.title,
                notes: task.notes,
                due_date: task.due_date,
                list_id: task.list_id,
                completed: false,
            },
        );
        Ok(id)
    }

    async fn completion_status(&self, task_id: &str) -> Result<bool, CoreError> {
        self.inner
            .lock()
            .await
            .tasks
            .get(task_id)
            .map(|t| t.completed)
            .ok_or_else(|| CoreError::Persistence(format!("unknown task {}", task_id)))
    }
}

#[async_trait]
impl RulePersistence for MemoryStore {
    async fn load(&self, rule_id: Uuid) -> Result<Option<RecurrenceRule>, CoreError> {
        Ok(self.inner.lock().await.rules.get(&rule_id).cloned())
    }

    async fn save(&self, rule: &RecurrenceRule) -> Result<(), CoreError> {
        self.inner.lock().await.rules.insert(rule.id, rule.clone());
        Ok(())
    }

    async fn list_active(&self, account_scope: &str) -> Result<Vec<RecurrenceRule>, CoreError> {
        let inner = self.inner.lock().await;
        let mut rules: Vec<_> = inner
            .rules
            .values()
            .filter(|r| r.is_active && r.account_scope == account_scope)
            .cloned()
            .collect();
        rules.sort_by_key(|r| r.id);
        Ok(rules)
    }

    async fn disable(&self, rule_id: Uuid) -> Result<(), CoreError> {
        let mut inner = self.inner.lock().await;
        let rule = inner
            .rules
            .get_mut(&rule_id)
            .ok_or(CoreError::RuleNotFound(rule_id))?;
        rule.is_active = false;
        rule.updated_at = chrono::Utc::now();
        Ok(())
    }
}

#[async_trait]
impl InstanceLedgerPersistence for MemoryStore {
    async fn insert_if_absent(&self, instance: &Instance) -> Result<bool, CoreError> {
        let mut inner = self.inner.lock().await;
        let key = (instance.rule_id, instance.due_date);
        if inner.instances.contains_key(&key) {
            return Ok(false);
        }
        inner.instances.insert(key, instance.clone());
        Ok(true)
    }

    async fn max_due_date(&self, rule_id: Uuid) -> Result<Option<NaiveDate>, CoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .instances
            .range((rule_id, NaiveDate::MIN)..=(rule_id, NaiveDate::MAX))
            .next_back()
            .map(|(_, i)| i.due_date))
    }

    async fn list_instances(&self, rule_id: Uuid) -> Result<Vec<Instance>, CoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .instances
            .range((rule_id, NaiveDate::MIN)..=(rule_id, NaiveDate::MAX))
            .map(|(_, i)| i.clone())
            .collect())
    }

    async fn find_instance(&self, rule_id: Uuid, due_date: NaiveDate) -> Result<Option<Instance>, CoreError> {
        Ok(self.inner.lock().await.instances.get(&(rule_id, due_date)).cloned())
    }
}
