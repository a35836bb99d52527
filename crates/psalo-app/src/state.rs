use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use psalo_config::Config;
use psalo_fetch::AssetFetcher;
use psalo_store::StoreManager;
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub store: Arc<StoreManager>,
    pub fetcher: AssetFetcher,
    pub fetch_running: AtomicBool,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let store = StoreManager::from_config(&config.store);
        let fetcher = AssetFetcher::new(config.fetch.clone())?;

        tracing::info!("Store path: {}", store.path().display());

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store: Arc::new(store),
            fetcher,
            fetch_running: AtomicBool::new(false),
        })
    }
}
