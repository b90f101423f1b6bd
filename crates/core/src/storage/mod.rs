//! Stock persistence: an explicit, ordered list of backends tried in turn.
//!
//! Load walks the list until a backend returns data and falls back to the
//! built-in collection. Save stops at the first backend that accepts the
//! write. There is no locking between writers; the last save wins.

pub mod file;
pub mod upstash;

use crate::domain::contract::parse_new_stock;
use crate::domain::defaults::default_stocks;
use crate::domain::stock::StockRecord;
use crate::error::{Result, StockError, StoreError};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum BackendConfig {
    /// Upstash Redis over its REST API.
    Upstash {
        url: String,
        token: String,
        key: String,
        timeout: Duration,
    },
    /// Indented JSON array on local disk.
    File { path: PathBuf },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreConfig {
    pub backends: Vec<BackendConfig>,
}

#[async_trait::async_trait]
pub trait StockBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` means the backend is reachable but holds no collection.
    async fn load(&self) -> anyhow::Result<Option<Vec<StockRecord>>>;

    async fn save(&self, stocks: &[StockRecord]) -> anyhow::Result<()>;
}

pub struct StockStore {
    backends: Vec<Box<dyn StockBackend>>,
}

impl StockStore {
    pub fn new(backends: Vec<Box<dyn StockBackend>>) -> Self {
        Self { backends }
    }

    pub fn from_config(config: &StoreConfig) -> anyhow::Result<Self> {
        let mut backends: Vec<Box<dyn StockBackend>> = Vec::with_capacity(config.backends.len());
        for backend in &config.backends {
            match backend {
                BackendConfig::Upstash {
                    url,
                    token,
                    key,
                    timeout,
                } => backends.push(Box::new(upstash::UpstashBackend::new(
                    url, token, key, *timeout,
                )?)),
                BackendConfig::File { path } => {
                    backends.push(Box::new(file::FileBackend::new(path.clone())))
                }
            }
        }

        tracing::info!(
            backends = ?backends.iter().map(|b| b.name()).collect::<Vec<_>>(),
            "stock store configured"
        );
        Ok(Self::new(backends))
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Always yields a collection: the first backend with data wins, else the
    /// built-in defaults. Stored records whose E, S or G score lies outside
    /// `0..=100` are left out.
    pub async fn load(&self) -> Vec<StockRecord> {
        let mut stocks = self.load_persisted().await;
        stocks.retain(|stock| {
            let ok = stock.scores_in_range();
            if !ok {
                tracing::warn!(
                    ticker = %stock.ticker,
                    e = stock.environmental,
                    s = stock.social,
                    g = stock.governance,
                    "stored stock has out-of-range scores; not serving it"
                );
            }
            ok
        });
        stocks
    }

    /// The stored collection as-is (or the defaults), without score filtering.
    /// Writes start from this collection.
    async fn load_persisted(&self) -> Vec<StockRecord> {
        match self.load_stored().await {
            Some(stocks) => stocks,
            None => {
                tracing::debug!("no stored stock collection; serving built-in defaults");
                default_stocks()
            }
        }
    }

    /// Collection from the first backend holding data; no defaults, no filtering.
    pub async fn load_stored(&self) -> Option<Vec<StockRecord>> {
        for backend in &self.backends {
            match backend.load().await {
                Ok(Some(stocks)) => {
                    tracing::debug!(backend = backend.name(), count = stocks.len(), "loaded stocks");
                    return Some(stocks);
                }
                Ok(None) => {
                    tracing::debug!(backend = backend.name(), "backend holds no stocks");
                }
                Err(err) => {
                    tracing::warn!(backend = backend.name(), error = %format!("{err:#}"), "stock load failed; trying next backend");
                }
            }
        }
        None
    }

    /// Returns the name of the backend that accepted the write.
    pub async fn save(&self, stocks: &[StockRecord]) -> std::result::Result<&'static str, StoreError> {
        let mut last_error = None;
        for backend in &self.backends {
            match backend.save(stocks).await {
                Ok(()) => {
                    tracing::info!(backend = backend.name(), count = stocks.len(), "saved stocks");
                    return Ok(backend.name());
                }
                Err(err) => {
                    tracing::warn!(backend = backend.name(), error = %format!("{err:#}"), "stock save failed; trying next backend");
                    last_error = Some(format!("{err:#}"));
                }
            }
        }

        match last_error {
            Some(last_error) => Err(StoreError::AllBackendsFailed {
                attempted: self.backend_names().join(", "),
                last_error,
            }),
            None => Err(StoreError::NoBackends),
        }
    }

    /// Validates a raw record, rejects duplicate tickers and appends it.
    ///
    /// The uniqueness check and the save are not atomic: two concurrent adds
    /// of the same ticker can both succeed.
    pub async fn add_stock(&self, body: Option<&Value>) -> Result<StockRecord> {
        let stock = parse_new_stock(body)?;

        let mut stocks = self.load_persisted().await;
        if stocks.iter().any(|s| s.ticker == stock.ticker) {
            return Err(StockError::Conflict {
                ticker: stock.ticker,
            });
        }

        stocks.push(stock.clone());
        self.save(&stocks).await?;

        tracing::info!(ticker = %stock.ticker, total = stocks.len(), "added stock");
        Ok(stock)
    }
}
