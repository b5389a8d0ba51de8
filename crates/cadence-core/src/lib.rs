//! # Cadence Core Library
//!
//! A recurrence-rule scheduling engine: turns repeating-task patterns into
//! dated task instances, exactly once per rule and calendar day.
//!
//! ## Features
//!
//! - **Typed Rules**: each frequency variant carries only the fields it needs
//! - **Pure Occurrence Math**: daily, weekly/custom with week-cycle alignment,
//!   monthly and yearly with month-end clamping
//! - **Idempotent Generation**: completion-triggered and lookahead generation
//!   share one insert-if-absent dedup key, safe under concurrent calls
//! - **Pluggable Collaborators**: task store, rule persistence and instance
//!   ledger are traits, with SQLite and in-memory implementations
//!
//! ## Core Modules
//!
//! - [`models`]: Rules, instances and transfer objects
//! - [`recurrence`]: Occurrence calculator
//! - [`ledger`]: Query view over generated instances
//! - [`scheduler`]: Generation policy
//! - [`lifecycle`]: Rule validation gate
//! - [`store`]: Collaborator contracts
//! - [`repository`]: SQLite collaborators
//! - [`memory`]: In-memory collaborators
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cadence_core::{
//!     config::SchedulerConfig, db, lifecycle::RuleLifecycleManager,
//!     models::{Frequency, RuleSpec}, repository::SqliteRepository, scheduler::Scheduler,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::establish_connection("cadence.db").await?;
//!     let repo = Arc::new(SqliteRepository::new(pool));
//!
//!     let lifecycle = RuleLifecycleManager::new(repo.clone());
//!     let scheduler = Scheduler::new(repo.clone(), repo.clone(), repo, SchedulerConfig::default());
//!
//!     let rule = lifecycle.create_rule(RuleSpec {
//!         source_task_id: "task-42".to_string(),
//!         list_id: "inbox".to_string(),
//!         account_scope: "me".to_string(),
//!         frequency: Frequency::Weekly { weekdays: [0, 4].into_iter().collect() },
//!         interval: 1,
//!         start_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!         end_date: None,
//!         title: "Review inbox".to_string(),
//!         notes: None,
//!     }).await?;
//!
//!     let created = scheduler.refresh_upcoming("me", 14).await?;
//!     println!("rule {} produced {} tasks", rule.id, created.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod lifecycle;
pub mod memory;
pub mod models;
pub mod recurrence;
pub mod repository;
pub mod scheduler;
pub mod store;
