use std::sync::Arc;

use cadence_core::lifecycle::RuleLifecycleManager;
use cadence_core::repository::SqliteRepository;
use cadence_core::scheduler::Scheduler;

pub mod complete;
pub mod done;
pub mod preview;
pub mod refresh;
pub mod rule;
pub mod tasks;

/// Everything a command handler needs, wired once in `main`.
pub struct Context {
    pub repo: Arc<SqliteRepository>,
    pub lifecycle: RuleLifecycleManager,
    pub scheduler: Scheduler,
    pub account: String,
}
