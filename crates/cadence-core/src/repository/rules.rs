use crate::error::CoreError;
use crate::models::RecurrenceRule;
use crate::repository::{RuleRow, SqliteRepository};
use crate::store::RulePersistence;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

#[async_trait]
impl RulePersistence for SqliteRepository {
    async fn load(&self, rule_id: Uuid) -> Result<Option<RecurrenceRule>, CoreError> {
        let row: Option<RuleRow> = sqlx::query_as("SELECT * FROM rules WHERE id = $1")
            .bind(rule_id)
            .fetch_optional(self.pool())
            .await?;
        row.map(RecurrenceRule::try_from).transpose()
    }

    async fn save(&self, rule: &RecurrenceRule) -> Result<(), CoreError> {
        let frequency = serde_json::to_string(&rule.frequency)?;

        sqlx::query(
            r#"INSERT INTO rules (id, source_task_id, list_id, account_scope, frequency, interval, start_date, end_date, title, notes, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id) DO UPDATE SET
                source_task_id = excluded.source_task_id,
                list_id = excluded.list_id,
                account_scope = excluded.account_scope,
                frequency = excluded.frequency,
                interval = excluded.interval,
                start_date = excluded.start_date,
                end_date = excluded.end_date,
                title = excluded.title,
                notes = excluded.notes,
                is_active = excluded.is_active,
                updated_at = excluded.updated_at"#,
        )
        .bind(rule.id)
        .bind(&rule.source_task_id)
        .bind(&rule.list_id)
        .bind(&rule.account_scope)
        .bind(frequency)
        .bind(i64::from(rule.interval))
        .bind(rule.start_date)
        .bind(rule.end_date)
        .bind(&rule.title)
        .bind(&rule.notes)
        .bind(rule.is_active)
        .bind(rule.created_at)
        .bind(rule.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn list_active(&self, account_scope: &str) -> Result<Vec<RecurrenceRule>, CoreError> {
        let rows: Vec<RuleRow> =
            sqlx::query_as("SELECT * FROM rules WHERE account_scope = $1 AND is_active = 1 ORDER BY created_at")
                .bind(account_scope)
                .fetch_all(self.pool())
                .await?;
        rows.into_iter().map(RecurrenceRule::try_from).collect()
    }

    async fn disable(&self, rule_id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("UPDATE rules SET is_active = 0, updated_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(rule_id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::RuleNotFound(rule_id));
        }
        Ok(())
    }
}

impl SqliteRepository {
    /// All rules of an account, inactive ones included.
    pub async fn find_rules(&self, account_scope: &str) -> Result<Vec<RecurrenceRule>, CoreError> {
        let rows: Vec<RuleRow> = sqlx::query_as("SELECT * FROM rules WHERE account_scope = $1 ORDER BY created_at")
            .bind(account_scope)
            .fetch_all(self.pool())
            .await?;
        rows.into_iter().map(RecurrenceRule::try_from).collect()
    }

    /// Rules of an account whose hyphenated id starts with `prefix`.
    pub async fn find_rules_by_id_prefix(
        &self,
        account_scope: &str,
        prefix: &str,
    ) -> Result<Vec<RecurrenceRule>, CoreError> {
        let rows: Vec<RuleRow> = sqlx::query_as("SELECT * FROM rules WHERE account_scope = $1 ORDER BY created_at")
            .bind(account_scope)
            .fetch_all(self.pool())
            .await?;
        rows.into_iter()
            .filter(|row| row.id.to_string().starts_with(prefix))
            .map(RecurrenceRule::try_from)
            .collect()
    }
}
