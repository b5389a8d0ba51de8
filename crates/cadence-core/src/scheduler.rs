//! Generation policy: decides when an occurrence becomes a real task.
//!
//! Two entry points feed the same check-then-create step:
//! - [`Scheduler::on_task_completed`] materializes the occurrence following a
//!   completed task, anchored on that task's own due date;
//! - [`Scheduler::refresh_upcoming`] fills a lookahead window for every active
//!   rule of an account.
//!
//! The ledger's insert-if-absent primitive keyed on `(rule_id, due_date)` is
//! the only coordination between concurrent callers. An instance is recorded
//! strictly after its task exists, so a failed task creation leaves nothing
//! behind and the next call retries the same date.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SchedulerConfig;
use crate::error::CoreError;
use crate::ledger::InstanceLedger;
use crate::models::{Instance, NewTask, RecurrenceRule, RuleStatus, TaskId};
use crate::recurrence::{next_due_date, occurrences_after};
use crate::store::{InstanceLedgerPersistence, RulePersistence, TaskStore};

pub struct Scheduler {
    tasks: Arc<dyn TaskStore>,
    rules: Arc<dyn RulePersistence>,
    ledger: InstanceLedger,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        rules: Arc<dyn RulePersistence>,
        ledger: Arc<dyn InstanceLedgerPersistence>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            tasks,
            rules,
            ledger: InstanceLedger::new(ledger),
            config,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Materializes the occurrence that follows a completed task.
    ///
    /// # Arguments
    /// * `rule_id` - Rule the completed task belongs to
    /// * `completed_due_date` - Due date of the completed task (not the
    ///   completion date), so late completion keeps the cadence; dates before
    ///   the rule's start date are treated as the start date
    ///
    /// # Returns
    /// * `Ok(Some(task_id))` - A new task was created and recorded
    /// * `Ok(None)` - Nothing to do: rule inactive, series ended, or the
    ///   occurrence already exists
    /// * `Err(_)` - Rule missing or a collaborator failed
    pub async fn on_task_completed(
        &self,
        rule_id: Uuid,
        completed_due_date: NaiveDate,
    ) -> Result<Option<TaskId>, CoreError> {
        let rule = match self.load_active(rule_id).await {
            Ok(rule) => rule,
            Err(CoreError::InactiveRule(_)) => {
                debug!(%rule_id, "completion on inactive rule ignored");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        // A due date before the series start never yields an earlier occurrence.
        let anchor = completed_due_date.max(rule.start_date);
        let Some(next) = next_due_date(&rule, anchor) else {
            debug!(%rule_id, after = %anchor, "series has ended");
            return Ok(None);
        };

        self.materialize(&rule, next).await
    }

    /// Fills the lookahead window for every active rule in `account_scope`,
    /// using today's UTC date as the window start.
    pub async fn refresh_upcoming(&self, account_scope: &str, horizon_days: u32) -> Result<Vec<TaskId>, CoreError> {
        self.refresh_upcoming_from(account_scope, horizon_days, Utc::now().date_naive())
            .await
    }

    /// Same as [`refresh_upcoming`](Self::refresh_upcoming) with an explicit "today".
    ///
    /// # Behavior
    /// - The window is `today <= due < today + horizon_days`
    /// - Each rule resumes from the later of its last generated due date and
    ///   its start date; the start date itself is never generated
    /// - Past occurrences are skipped when catch-up is disabled
    /// - At most `max_instances_per_rule` instances are created per rule
    /// - Every instance is committed as soon as it is created, so dropping
    ///   this future midway leaves a ledger the next call resumes from
    pub async fn refresh_upcoming_from(
        &self,
        account_scope: &str,
        horizon_days: u32,
        today: NaiveDate,
    ) -> Result<Vec<TaskId>, CoreError> {
        let horizon_end = today
            .checked_add_days(Days::new(u64::from(horizon_days)))
            .unwrap_or(NaiveDate::MAX);
        let rules = self.rules.list_active(account_scope).await?;

        let mut created = Vec::new();
        for rule in &rules {
            let mut ids = self.refresh_rule(rule, today, horizon_end).await?;
            created.append(&mut ids);
        }

        info!(
            account_scope,
            rules = rules.len(),
            created = created.len(),
            horizon_days,
            "refreshed upcoming instances"
        );
        Ok(created)
    }

    /// Reports a rule's history, completion count and next candidate date.
    ///
    /// Completion is read from the task store; instances never carry it.
    pub async fn rule_status(&self, rule_id: Uuid) -> Result<RuleStatus, CoreError> {
        let rule = self
            .rules
            .load(rule_id)
            .await?
            .ok_or(CoreError::RuleNotFound(rule_id))?;
        let instances = self.ledger.history(rule_id).await?;

        let mut completed_tasks = BTreeSet::new();
        for instance in &instances {
            if self.tasks.completion_status(&instance.generated_task_id).await? {
                completed_tasks.insert(instance.generated_task_id.clone());
            }
        }

        let last_due_date = instances.last().map(|i| i.due_date);
        let anchor = last_due_date.map_or(rule.start_date, |d| d.max(rule.start_date));
        let next_due_date = next_due_date(&rule, anchor);

        Ok(RuleStatus {
            rule,
            instances,
            completed_tasks,
            last_due_date,
            next_due_date,
        })
    }

    async fn refresh_rule(
        &self,
        rule: &RecurrenceRule,
        today: NaiveDate,
        horizon_end: NaiveDate,
    ) -> Result<Vec<TaskId>, CoreError> {
        let anchor = match self.ledger.last_due_date(rule.id).await? {
            Some(last) => last.max(rule.start_date),
            None => rule.start_date,
        };

        let mut created = Vec::new();
        for next in occurrences_after(rule, anchor) {
            if next >= horizon_end {
                break;
            }
            if next < today && !self.config.enable_catchup {
                continue;
            }
            if created.len() >= self.config.max_instances_per_rule {
                warn!(rule_id = %rule.id, limit = self.config.max_instances_per_rule, "instance limit reached, resuming next refresh");
                break;
            }
            if let Some(task_id) = self.materialize(rule, next).await? {
                created.push(task_id);
            }
        }
        Ok(created)
    }

    /// Check-then-create for one occurrence.
    async fn materialize(&self, rule: &RecurrenceRule, due_date: NaiveDate) -> Result<Option<TaskId>, CoreError> {
        if self.ledger.contains(rule.id, due_date).await? {
            debug!(rule_id = %rule.id, %due_date, "occurrence already generated");
            return Ok(None);
        }

        let task_id = self
            .tasks
            .create_task(NewTask::for_occurrence(rule, due_date))
            .await?;

        let instance = Instance::new(rule.id, task_id.clone(), due_date);
        if !self.ledger.record(&instance).await? {
            // Another writer recorded this day between our check and insert.
            warn!(rule_id = %rule.id, %due_date, task_id = %task_id, "lost dedup race, task left unrecorded");
            return Ok(None);
        }

        info!(rule_id = %rule.id, %due_date, task_id = %task_id, "materialized occurrence");
        Ok(Some(task_id))
    }

    async fn load_active(&self, rule_id: Uuid) -> Result<RecurrenceRule, CoreError> {
        let rule = self
            .rules
            .load(rule_id)
            .await?
            .ok_or(CoreError::RuleNotFound(rule_id))?;
        if !rule.is_active {
            return Err(CoreError::InactiveRule(rule_id));
        }
        Ok(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::models::{Frequency, RuleSpec};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup(frequency: Frequency, config: SchedulerConfig) -> (Scheduler, Arc<MemoryStore>, RecurrenceRule) {
        let store = Arc::new(MemoryStore::new());
        let rule = RecurrenceRule::from_spec(RuleSpec {
            source_task_id: "src".to_string(),
            list_id: "inbox".to_string(),
            account_scope: "acct".to_string(),
            frequency,
            interval: 1,
            start_date: date(2024, 1, 1),
            end_date: None,
            title: "Standup".to_string(),
            notes: None,
        });
        store.save(&rule).await.unwrap();
        let scheduler = Scheduler::new(store.clone(), store.clone(), store.clone(), config);
        (scheduler, store, rule)
    }

    #[tokio::test]
    async fn test_completion_copies_rule_fields_onto_task() {
        let (scheduler, store, rule) = setup(Frequency::Daily, SchedulerConfig::default()).await;
        let id = scheduler.on_task_completed(rule.id, date(2024, 1, 3)).await.unwrap().unwrap();

        let tasks = store.tasks().await;
        let task = tasks.iter().find(|t| t.id == id).unwrap();
        assert_eq!(task.title, "Standup");
        assert_eq!(task.list_id, "inbox");
        assert_eq!(task.due_date, date(2024, 1, 4));
    }

    #[tokio::test]
    async fn test_catchup_disabled_skips_past_dates() {
        let config = SchedulerConfig {
            enable_catchup: false,
            ..SchedulerConfig::default()
        };
        let (scheduler, store, rule) = setup(Frequency::Daily, config).await;

        scheduler.refresh_upcoming_from("acct", 3, date(2024, 1, 10)).await.unwrap();
        let days: Vec<_> = store
            .list_instances(rule.id)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.due_date)
            .collect();
        assert_eq!(days, vec![date(2024, 1, 10), date(2024, 1, 11), date(2024, 1, 12)]);
    }

    #[tokio::test]
    async fn test_instance_limit_resumes_on_next_refresh() {
        let config = SchedulerConfig {
            max_instances_per_rule: 2,
            ..SchedulerConfig::default()
        };
        let (scheduler, _store, _rule) = setup(Frequency::Daily, config).await;

        let first = scheduler.refresh_upcoming_from("acct", 5, date(2024, 1, 2)).await.unwrap();
        assert_eq!(first.len(), 2);
        let second = scheduler.refresh_upcoming_from("acct", 5, date(2024, 1, 2)).await.unwrap();
        assert_eq!(second.len(), 2);
        let third = scheduler.refresh_upcoming_from("acct", 5, date(2024, 1, 2)).await.unwrap();
        assert_eq!(third.len(), 1);
    }

    #[tokio::test]
    async fn test_zero_horizon_creates_nothing() {
        let (scheduler, _store, _rule) = setup(Frequency::Daily, SchedulerConfig::default()).await;
        let created = scheduler.refresh_upcoming_from("acct", 0, date(2024, 1, 1)).await.unwrap();
        assert!(created.is_empty());
    }

    #[tokio::test]
    async fn test_other_account_untouched() {
        let (scheduler, _store, _rule) = setup(Frequency::Daily, SchedulerConfig::default()).await;
        let created = scheduler.refresh_upcoming_from("someone-else", 14, date(2024, 1, 1)).await.unwrap();
        assert!(created.is_empty());
    }
}
