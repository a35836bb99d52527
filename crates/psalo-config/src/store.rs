use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_url() -> String {
    "https://github.com/bihoqo/learn-circassian-dictionary-collection/releases/latest/download/dictionary.db"
        .to_string()
}

fn default_file_name() -> String {
    "dictionary.db".to_string()
}

fn default_app_dir_name() -> String {
    "psalo".to_string()
}

fn default_packaged() -> bool {
    !cfg!(debug_assertions)
}

/// Workspace root of a source checkout
fn default_dev_root() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../.."))
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    /// Where the assembled dictionary database is published
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// Directory created under the platform data dir in packaged mode
    #[serde(default = "default_app_dir_name")]
    pub app_dir_name: String,
    /// Packaged builds keep the store in the user's data dir,
    /// development builds under `<dev_root>/resources`
    #[serde(default = "default_packaged")]
    pub packaged: bool,
    #[serde(default = "default_dev_root")]
    pub dev_root: PathBuf,
    /// Explicit store location, wins over both modes
    pub path_override: Option<PathBuf>,
}

impl StoreConfig {
    pub fn new() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("PSALO_STORE_URL") {
            config.url = url;
        }
        if let Ok(path) = env::var("PSALO_STORE_PATH") {
            config.path_override = Some(PathBuf::from(path));
        }
        if let Some(packaged) = env::var("PSALO_PACKAGED").ok().and_then(|v| parse_flag(&v)) {
            config.packaged = packaged;
        }
        if let Ok(root) = env::var("PSALO_DEV_ROOT") {
            config.dev_root = PathBuf::from(root);
        }

        config
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            file_name: default_file_name(),
            app_dir_name: default_app_dir_name(),
            packaged: default_packaged(),
            dev_root: default_dev_root(),
            path_override: None,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
