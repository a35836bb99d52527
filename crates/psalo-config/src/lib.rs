use std::env;

use serde::{Deserialize, Serialize};

use self::fetch::FetchConfig;
use self::search::SearchConfig;
use self::store::StoreConfig;

pub mod fetch;
pub mod search;
pub mod store;

fn default_ui_channel_capacity() -> usize {
    64
}

fn default_app_channel_capacity() -> usize {
    256
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub search: SearchConfig,
    pub fetch: FetchConfig,

    /// Requests from the UI to the backend
    #[serde(default = "default_ui_channel_capacity")]
    pub ui_channel_capacity: usize,
    /// Responses and progress from the backend to the UI
    #[serde(default = "default_app_channel_capacity")]
    pub app_channel_capacity: usize,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let app_channel_capacity = env::var("PSALO_APP_CHANNEL_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_app_channel_capacity);

        Config {
            store: StoreConfig::new(),
            search: SearchConfig::new(),
            fetch: FetchConfig::new(),

            ui_channel_capacity: default_ui_channel_capacity(),
            app_channel_capacity,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            search: SearchConfig::default(),
            fetch: FetchConfig::default(),
            ui_channel_capacity: default_ui_channel_capacity(),
            app_channel_capacity: default_app_channel_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"search":{"page_size":20}}"#).unwrap();

        assert_eq!(config.search.page_size, 20);
        assert_eq!(config.search.min_contains_chars, 3);
        assert_eq!(config.fetch.max_redirects, 5);
        assert_eq!(config.fetch.temp_suffix, ".tmp");
        assert_eq!(config.store.file_name, "dictionary.db");
        assert!(config.store.path_override.is_none());
    }

    #[test]
    fn empty_json_is_default_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.ui_channel_capacity, 64);
        assert_eq!(config.app_channel_capacity, 256);
        assert!(config.store.url.ends_with("/dictionary.db"));
    }
}
