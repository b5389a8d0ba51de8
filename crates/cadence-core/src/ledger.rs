use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::Instance;
use crate::store::InstanceLedgerPersistence;

/// Read-mostly view over the instance ledger used for dedup decisions.
#[derive(Clone)]
pub struct InstanceLedger {
    persistence: Arc<dyn InstanceLedgerPersistence>,
}

impl InstanceLedger {
    pub fn new(persistence: Arc<dyn InstanceLedgerPersistence>) -> Self {
        Self { persistence }
    }

    /// Whether an instance already exists for this rule on `day`.
    pub async fn contains(&self, rule_id: Uuid, day: NaiveDate) -> Result<bool, CoreError> {
        Ok(self.persistence.find_instance(rule_id, day).await?.is_some())
    }

    /// Latest generated due date, if the rule produced anything yet.
    pub async fn last_due_date(&self, rule_id: Uuid) -> Result<Option<NaiveDate>, CoreError> {
        self.persistence.max_due_date(rule_id).await
    }

    /// All instances of the rule, oldest due date first.
    pub async fn history(&self, rule_id: Uuid) -> Result<Vec<Instance>, CoreError> {
        let mut instances = self.persistence.list_instances(rule_id).await?;
        instances.sort_by_key(|i| i.due_date);
        Ok(instances)
    }

    /// Records an instance. `false` means another writer got there first.
    pub async fn record(&self, instance: &Instance) -> Result<bool, CoreError> {
        self.persistence.insert_if_absent(instance).await
    }
}
