use cadence_core::config::SchedulerConfig;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Config {
    /// SQLite file holding rules, instances and the local task list
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Account scope used when `--account` is not given
    #[serde(default = "default_account")]
    pub default_account: String,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

fn default_database_path() -> String {
    "cadence.db".to_string()
}

fn default_account() -> String {
    "default".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            default_account: default_account(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl Config {
    /// Merges `cadence.toml` with `CADENCE_*` environment variables.
    ///
    /// Nested keys use a double underscore, e.g. `CADENCE_SCHEDULER__LOOKAHEAD_DAYS=14`.
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file("cadence.toml"))
            .merge(Env::prefixed("CADENCE_").split("__"))
    }
}
