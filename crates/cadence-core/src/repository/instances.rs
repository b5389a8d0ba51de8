use crate::error::CoreError;
use crate::models::Instance;
use crate::repository::SqliteRepository;
use crate::store::InstanceLedgerPersistence;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

#[async_trait]
impl InstanceLedgerPersistence for SqliteRepository {
    async fn insert_if_absent(&self, instance: &Instance) -> Result<bool, CoreError> {
        // The (rule_id, due_date) primary key makes this a single atomic step.
        let result = sqlx::query(
            r#"INSERT INTO instances (rule_id, due_date, generated_task_id, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (rule_id, due_date) DO NOTHING"#,
        )
        .bind(instance.rule_id)
        .bind(instance.due_date)
        .bind(&instance.generated_task_id)
        .bind(instance.created_at)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn max_due_date(&self, rule_id: Uuid) -> Result<Option<NaiveDate>, CoreError> {
        let latest: Option<(NaiveDate,)> = sqlx::query_as(
            "SELECT due_date FROM instances WHERE rule_id = $1 ORDER BY due_date DESC LIMIT 1",
        )
        .bind(rule_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(latest.map(|(due,)| due))
    }

    async fn list_instances(&self, rule_id: Uuid) -> Result<Vec<Instance>, CoreError> {
        let instances = sqlx::query_as("SELECT * FROM instances WHERE rule_id = $1 ORDER BY due_date")
            .bind(rule_id)
            .fetch_all(self.pool())
            .await?;
        Ok(instances)
    }

    async fn find_instance(&self, rule_id: Uuid, due_date: NaiveDate) -> Result<Option<Instance>, CoreError> {
        let instance = sqlx::query_as("SELECT * FROM instances WHERE rule_id = $1 AND due_date = $2")
            .bind(rule_id)
            .bind(due_date)
            .fetch_optional(self.pool())
            .await?;
        Ok(instance)
    }
}

impl SqliteRepository {
    /// Maps a generated task back to the instance that produced it.
    pub async fn find_instance_by_task(&self, task_id: &str) -> Result<Option<Instance>, CoreError> {
        let instance = sqlx::query_as("SELECT * FROM instances WHERE generated_task_id = $1")
            .bind(task_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(instance)
    }
}
