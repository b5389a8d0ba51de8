use crate::error::CoreError;
use crate::models::{NewTask, TaskId};
use crate::repository::SqliteRepository;
use crate::store::TaskStore;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A task in the local task list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LocalTask {
    pub id: String,
    pub title: String,
    pub notes: Option<String>,
    pub due_date: NaiveDate,
    pub list_id: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
impl TaskStore for SqliteRepository {
    async fn create_task(&self, task: NewTask) -> Result<TaskId, CoreError> {
        let id = Uuid::now_v7().to_string();
        sqlx::query(
            r#"INSERT INTO tasks (id, title, notes, due_date, list_id, completed, completed_at, created_at)
            VALUES ($1, $2, $3, $4, $5, 0, NULL, $6)"#,
        )
        .bind(&id)
        .bind(&task.title)
        .bind(&task.notes)
        .bind(task.due_date)
        .bind(&task.list_id)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;
        Ok(id)
    }

    async fn completion_status(&self, task_id: &str) -> Result<bool, CoreError> {
        let status: Option<(bool,)> = sqlx::query_as("SELECT completed FROM tasks WHERE id = $1")
            .bind(task_id)
            .fetch_optional(self.pool())
            .await?;
        status
            .map(|(completed,)| completed)
            .ok_or_else(|| CoreError::Persistence(format!("Task not found: {}", task_id)))
    }
}

impl SqliteRepository {
    pub async fn find_task_by_id(&self, task_id: &str) -> Result<Option<LocalTask>, CoreError> {
        let task = sqlx::query_as("SELECT * FROM tasks WHERE id = $1")
            .bind(task_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(task)
    }

    pub async fn find_tasks_by_id_prefix(&self, prefix: &str) -> Result<Vec<LocalTask>, CoreError> {
        let pattern = format!("{}%", prefix);
        let tasks = sqlx::query_as("SELECT * FROM tasks WHERE id LIKE $1 ORDER BY due_date")
            .bind(pattern)
            .fetch_all(self.pool())
            .await?;
        Ok(tasks)
    }

    /// Tasks ordered by due date, optionally including completed ones.
    pub async fn find_tasks(&self, include_completed: bool) -> Result<Vec<LocalTask>, CoreError> {
        let sql = if include_completed {
            "SELECT * FROM tasks ORDER BY due_date, created_at"
        } else {
            "SELECT * FROM tasks WHERE completed = 0 ORDER BY due_date, created_at"
        };
        let tasks = sqlx::query_as(sql).fetch_all(self.pool()).await?;
        Ok(tasks)
    }

    /// Marks a task as completed and returns it. Completing twice is harmless.
    pub async fn complete_task(&self, task_id: &str) -> Result<Option<LocalTask>, CoreError> {
        let task = sqlx::query_as(
            r#"UPDATE tasks
            SET completed = 1, completed_at = COALESCE(completed_at, $1)
            WHERE id = $2
            RETURNING *"#,
        )
        .bind(Utc::now())
        .bind(task_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(task)
    }
}
