use std::path::PathBuf;

use psalo_config::store::StoreConfig;

/// Where the store file is expected to live. Only reads configuration and
/// the platform's data directory; never touches the filesystem.
pub fn resolve_store_path(config: &StoreConfig) -> PathBuf {
    if let Some(path) = &config.path_override {
        return path.clone();
    }

    if config.packaged {
        app_data_dir(&config.app_dir_name).join(&config.file_name)
    } else {
        config.dev_root.join("resources").join(&config.file_name)
    }
}

/// Per-user application data directory
fn app_data_dir(app_dir_name: &str) -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(app_dir_name))
        .unwrap_or_else(|| PathBuf::from(app_dir_name))
}
