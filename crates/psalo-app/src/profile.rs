use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use psalo_config::Config;

/// `<config dir>/psalo/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("psalo").join("config.json"))
}

fn read_config(path: &Path) -> anyhow::Result<Config> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

/// Load configuration.
///
/// An explicitly given file must load. Otherwise the user's config file is
/// used when present and valid, falling back to defaults with environment
/// overrides.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        tracing::info!("Loading config from {}", path.display());
        return read_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => match read_config(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) => {
                tracing::warn!("{e:#}, using defaults");
                Ok(Config::new())
            }
        },
        _ => Ok(Config::new()),
    }
}
