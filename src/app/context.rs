use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{NewsdeskError, Result};
use crate::config::Config;
use crate::connectivity::{ConnectivityProbe, RouteProbe, StaticProbe};
use crate::feed::FeedCoordinator;
use crate::fetcher::http_fetcher::HttpNewsClient;
use crate::fetcher::NewsClient;
use crate::store::sqlite::SqliteStore;

pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteStore>,
    pub client: Arc<dyn NewsClient + Send + Sync>,
    pub probe: Arc<dyn ConnectivityProbe + Send + Sync>,
    pub coordinator: FeedCoordinator<SqliteStore>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let db_path = match config.store.db_path.clone() {
            Some(p) => p,
            None => Self::default_db_path()?,
        };
        let store = Arc::new(SqliteStore::new(&db_path)?);
        tracing::debug!("Opened saved articles at {}", db_path.display());
        Self::with_store(config, store)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::with_store(config, store)
    }

    fn with_store(config: Config, store: Arc<SqliteStore>) -> Result<Self> {
        let client: Arc<dyn NewsClient + Send + Sync> =
            Arc::new(HttpNewsClient::new(&config.api, config.feed.page_size)?);
        let probe: Arc<dyn ConnectivityProbe + Send + Sync> = if config.connectivity.offline {
            Arc::new(StaticProbe::new(false))
        } else {
            Arc::new(RouteProbe::new(&config.connectivity.probe_addr))
        };

        let coordinator = FeedCoordinator::new(
            client.clone(),
            probe.clone(),
            store.clone(),
            config.feed.country.clone(),
            config.feed.page_size,
            config.feed.search_delay(),
        );

        Ok(Self {
            config,
            store,
            client,
            probe,
            coordinator,
        })
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| NewsdeskError::Other("Could not find data directory".into()))?;
        let newsdesk_dir = data_dir.join("newsdesk");
        std::fs::create_dir_all(&newsdesk_dir)?;
        Ok(newsdesk_dir.join("newsdesk.db"))
    }
}
