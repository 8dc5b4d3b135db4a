//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_busy_timeout_secs() -> u64 {
    30
}

fn default_max_pool_size() -> u32 {
    10
}

#[derive(Clone, Debug, Deserialize)]
/// Database settings shared by the library and the `migrate` binary.
pub struct DatabaseConfig {
    pub database_url: String,
    /// How long a connection waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,
}

impl DatabaseConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            busy_timeout_secs: default_busy_timeout_secs(),
            max_pool_size: default_max_pool_size(),
        }
    }
}
