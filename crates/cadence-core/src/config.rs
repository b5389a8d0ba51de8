use serde::Deserialize;

/// Tuning knobs for instance generation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Horizon used when the caller does not pass one
    pub lookahead_days: u32,
    /// Upper bound on instances created for a single rule in one refresh
    pub max_instances_per_rule: usize,
    /// Whether refresh materializes occurrences that are already in the past
    pub enable_catchup: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            lookahead_days: 30,
            max_instances_per_rule: 100,
            enable_catchup: true,
        }
    }
}
