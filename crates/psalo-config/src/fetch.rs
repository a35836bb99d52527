use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_max_redirects() -> u32 {
    5
}

fn default_temp_suffix() -> String {
    ".tmp".to_string()
}

fn default_stall_timeout_secs() -> u64 {
    60
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("psalo/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_progress_capacity() -> usize {
    64
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct FetchConfig {
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,
    /// Appended to the destination path while the body is streaming
    #[serde(default = "default_temp_suffix")]
    pub temp_suffix: String,
    /// Longest wait for the next body chunk before giving up
    #[serde(default = "default_stall_timeout_secs")]
    pub stall_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_progress_capacity")]
    pub progress_capacity: usize,
}

impl FetchConfig {
    pub fn new() -> Self {
        let stall_timeout_secs = env::var("PSALO_STALL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_stall_timeout_secs);

        Self {
            stall_timeout_secs,
            ..Self::default()
        }
    }

    pub fn stall_timeout(&self) -> Duration {
        Duration::from_secs(self.stall_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_redirects: default_max_redirects(),
            temp_suffix: default_temp_suffix(),
            stall_timeout_secs: default_stall_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
            progress_capacity: default_progress_capacity(),
        }
    }
}
