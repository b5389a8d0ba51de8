//! Validation gate for creating and editing rules.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{ConfigurationError, CoreError};
use crate::models::{Frequency, RecurrenceRule, RuleSpec};
use crate::store::RulePersistence;

/// Checks the structural invariants of a rule spec.
///
/// # Behavior
/// - `interval >= 1`
/// - `end_date >= start_date` when present
/// - weekday variants need a non-empty set of ordinals in `0..=6`
/// - monthly and yearly need `1 <= day_of_month <= 31`
/// - yearly needs `1 <= month_of_year <= 12`
/// - the title is not blank
pub fn validate(spec: &RuleSpec) -> Result<(), ConfigurationError> {
    if spec.interval < 1 {
        return Err(ConfigurationError::IntervalTooSmall(spec.interval));
    }

    if let Some(end) = spec.end_date {
        if end < spec.start_date {
            return Err(ConfigurationError::EndBeforeStart {
                start: spec.start_date,
                end,
            });
        }
    }

    if spec.title.trim().is_empty() {
        return Err(ConfigurationError::EmptyTitle);
    }

    match &spec.frequency {
        Frequency::Daily => {}
        Frequency::Weekly { weekdays } | Frequency::Custom { weekdays } => {
            if weekdays.is_empty() {
                return Err(ConfigurationError::EmptyWeekdays);
            }
            if let Some(&bad) = weekdays.iter().find(|&&d| d > 6) {
                return Err(ConfigurationError::WeekdayOutOfRange(bad));
            }
        }
        Frequency::Monthly { day_of_month } => check_day_of_month(*day_of_month)?,
        Frequency::Yearly {
            month_of_year,
            day_of_month,
        } => {
            if !(1..=12).contains(month_of_year) {
                return Err(ConfigurationError::MonthOutOfRange(*month_of_year));
            }
            check_day_of_month(*day_of_month)?;
        }
    }

    Ok(())
}

fn check_day_of_month(day: u32) -> Result<(), ConfigurationError> {
    if (1..=31).contains(&day) {
        Ok(())
    } else {
        Err(ConfigurationError::DayOfMonthOutOfRange(day))
    }
}

/// Sits in front of the scheduler and only lets valid rules through.
pub struct RuleLifecycleManager {
    rules: Arc<dyn RulePersistence>,
}

impl RuleLifecycleManager {
    pub fn new(rules: Arc<dyn RulePersistence>) -> Self {
        Self { rules }
    }

    /// Validates `spec` and persists it as a new active rule.
    pub async fn create_rule(&self, spec: RuleSpec) -> Result<RecurrenceRule, CoreError> {
        validate(&spec)?;
        let rule = RecurrenceRule::from_spec(spec);
        self.rules.save(&rule).await?;
        info!(rule_id = %rule.id, frequency = %rule.frequency.kind(), "created recurrence rule");
        Ok(rule)
    }

    /// Replaces the editable fields of an existing rule.
    ///
    /// Identity, activity and creation time survive the edit. Instances the
    /// rule already produced are left untouched.
    pub async fn update_rule(&self, rule_id: Uuid, spec: RuleSpec) -> Result<RecurrenceRule, CoreError> {
        validate(&spec)?;
        let mut rule = self.load(rule_id).await?;
        rule.apply_spec(spec);
        self.rules.save(&rule).await?;
        info!(rule_id = %rule.id, "updated recurrence rule");
        Ok(rule)
    }

    pub async fn disable_rule(&self, rule_id: Uuid) -> Result<(), CoreError> {
        self.load(rule_id).await?;
        self.rules.disable(rule_id).await?;
        info!(rule_id = %rule_id, "disabled recurrence rule");
        Ok(())
    }

    /// Reactivates a previously disabled rule.
    pub async fn enable_rule(&self, rule_id: Uuid) -> Result<RecurrenceRule, CoreError> {
        let mut rule = self.load(rule_id).await?;
        if !rule.is_active {
            rule.is_active = true;
            rule.updated_at = Utc::now();
            self.rules.save(&rule).await?;
            info!(rule_id = %rule_id, "enabled recurrence rule");
        }
        Ok(rule)
    }

    async fn load(&self, rule_id: Uuid) -> Result<RecurrenceRule, CoreError> {
        self.rules
            .load(rule_id)
            .await?
            .ok_or(CoreError::RuleNotFound(rule_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn spec(frequency: Frequency) -> RuleSpec {
        RuleSpec {
            source_task_id: "task-1".to_string(),
            list_id: "list-1".to_string(),
            account_scope: "acct".to_string(),
            frequency,
            interval: 1,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            title: "Pay rent".to_string(),
            notes: Some("transfer".to_string()),
        }
    }

    mod validation {
        use super::*;

        #[rstest]
        #[case(Frequency::Daily)]
        #[case(Frequency::Weekly { weekdays: [0, 4].into_iter().collect() })]
        #[case(Frequency::Custom { weekdays: [6].into_iter().collect() })]
        #[case(Frequency::Monthly { day_of_month: 31 })]
        #[case(Frequency::Yearly { month_of_year: 2, day_of_month: 29 })]
        fn test_accepts_valid_shapes(#[case] frequency: Frequency) {
            assert_eq!(validate(&spec(frequency)), Ok(()));
        }

        #[rstest]
        #[case(Frequency::Weekly { weekdays: Default::default() }, ConfigurationError::EmptyWeekdays)]
        #[case(Frequency::Custom { weekdays: [2, 7].into_iter().collect() }, ConfigurationError::WeekdayOutOfRange(7))]
        #[case(Frequency::Monthly { day_of_month: 0 }, ConfigurationError::DayOfMonthOutOfRange(0))]
        #[case(Frequency::Monthly { day_of_month: 32 }, ConfigurationError::DayOfMonthOutOfRange(32))]
        #[case(Frequency::Yearly { month_of_year: 13, day_of_month: 1 }, ConfigurationError::MonthOutOfRange(13))]
        #[case(Frequency::Yearly { month_of_year: 3, day_of_month: 40 }, ConfigurationError::DayOfMonthOutOfRange(40))]
        fn test_rejects_invalid_shapes(#[case] frequency: Frequency, #[case] expected: ConfigurationError) {
            assert_eq!(validate(&spec(frequency)), Err(expected));
        }

        #[test]
        fn test_rejects_zero_interval() {
            let mut s = spec(Frequency::Daily);
            s.interval = 0;
            assert_eq!(validate(&s), Err(ConfigurationError::IntervalTooSmall(0)));
        }

        #[test]
        fn test_rejects_end_before_start() {
            let mut s = spec(Frequency::Daily);
            s.end_date = NaiveDate::from_ymd_opt(2023, 12, 31);
            assert!(matches!(validate(&s), Err(ConfigurationError::EndBeforeStart { .. })));

            s.end_date = Some(s.start_date);
            assert_eq!(validate(&s), Ok(()));
        }

        #[test]
        fn test_rejects_blank_title() {
            let mut s = spec(Frequency::Daily);
            s.title = "   ".to_string();
            assert_eq!(validate(&s), Err(ConfigurationError::EmptyTitle));
        }
    }

    mod manager {
        use super::*;

        fn manager() -> (RuleLifecycleManager, Arc<MemoryStore>) {
            let store = Arc::new(MemoryStore::new());
            (RuleLifecycleManager::new(store.clone()), store)
        }

        #[tokio::test]
        async fn test_create_persists_active_rule() {
            let (manager, store) = manager();
            let rule = manager.create_rule(spec(Frequency::Daily)).await.unwrap();
            assert!(rule.is_active);

            let stored = store.load(rule.id).await.unwrap().unwrap();
            assert_eq!(stored, rule);
        }

        #[tokio::test]
        async fn test_invalid_spec_never_persisted() {
            let (manager, store) = manager();
            let err = manager
                .create_rule(spec(Frequency::Weekly { weekdays: Default::default() }))
                .await
                .unwrap_err();
            assert!(matches!(err, CoreError::Configuration(ConfigurationError::EmptyWeekdays)));
            assert!(store.list_active("acct").await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_update_revalidates_and_keeps_identity() {
            let (manager, _store) = manager();
            let rule = manager.create_rule(spec(Frequency::Daily)).await.unwrap();

            let bad = spec(Frequency::Monthly { day_of_month: 0 });
            assert!(manager.update_rule(rule.id, bad).await.is_err());

            let mut edited = spec(Frequency::Monthly { day_of_month: 15 });
            edited.interval = 2;
            let updated = manager.update_rule(rule.id, edited).await.unwrap();
            assert_eq!(updated.id, rule.id);
            assert_eq!(updated.created_at, rule.created_at);
            assert_eq!(updated.interval, 2);
            assert_eq!(updated.frequency, Frequency::Monthly { day_of_month: 15 });
        }

        #[tokio::test]
        async fn test_update_missing_rule() {
            let (manager, _store) = manager();
            let id = Uuid::now_v7();
            let err = manager.update_rule(id, spec(Frequency::Daily)).await.unwrap_err();
            assert!(matches!(err, CoreError::RuleNotFound(missing) if missing == id));
        }

        #[tokio::test]
        async fn test_disable_then_enable() {
            let (manager, store) = manager();
            let rule = manager.create_rule(spec(Frequency::Daily)).await.unwrap();

            manager.disable_rule(rule.id).await.unwrap();
            assert!(!store.load(rule.id).await.unwrap().unwrap().is_active);
            assert!(store.list_active("acct").await.unwrap().is_empty());

            let enabled = manager.enable_rule(rule.id).await.unwrap();
            assert!(enabled.is_active);
            assert_eq!(store.list_active("acct").await.unwrap().len(), 1);
        }
    }
}
