//! Source resolution: live feed first, embedded table as the backstop
//!
//! `SourceResolver::resolve` never fails. Any live-path problem (transport
//! error, non-success status, timeout, unreadable body, zero usable rows)
//! switches to the embedded table and labels the snapshot as non-live.

use crate::error::{AppError, Result};
use crate::ingest::rows::ApiPayload;
use crate::ingest::static_data::static_stocks;
use crate::ingest::types::StocksSnapshot;
use crate::store::SnapshotStore;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Budget for one live fetch
pub const LIVE_FETCH_TIMEOUT: Duration = Duration::from_secs(8);

/// Label used when the live payload names no source
pub const DEFAULT_LIVE_LABEL: &str = "yfinance";

/// Label used for snapshots built from the embedded table
pub const FALLBACK_LABEL: &str = "CSV estático (API indisponível)";

/// A source of the JSON feed document
#[async_trait]
pub trait LiveSource: Send + Sync {
    /// Short description for logs
    fn describe(&self) -> String;

    /// Fetch and decode the feed document
    async fn fetch(&self) -> Result<ApiPayload>;
}

/// Feed served over HTTP, e.g. `GET http://localhost:3001/api/stocks`
pub struct HttpLiveSource {
    client: Client,
    url: String,
}

impl HttpLiveSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl LiveSource for HttpLiveSource {
    fn describe(&self) -> String {
        format!("GET {}", self.url)
    }

    async fn fetch(&self) -> Result<ApiPayload> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!("HTTP {}", status)));
        }

        Ok(response.json::<ApiPayload>().await?)
    }
}

/// Feed read straight from the snapshot file the update script writes
pub struct SnapshotFileSource {
    store: Arc<SnapshotStore>,
}

impl SnapshotFileSource {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LiveSource for SnapshotFileSource {
    fn describe(&self) -> String {
        format!("file {}", self.store.path().display())
    }

    async fn fetch(&self) -> Result<ApiPayload> {
        self.store.read_payload().await
    }
}

/// Chooses between the live source and the embedded table
pub struct SourceResolver {
    live: Arc<dyn LiveSource>,
    timeout: Duration,
}

impl SourceResolver {
    pub fn new(live: Arc<dyn LiveSource>) -> Self {
        Self {
            live,
            timeout: LIVE_FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Always returns a usable snapshot
    pub async fn resolve(&self) -> StocksSnapshot {
        match self.try_live().await {
            Ok(snapshot) => {
                debug!(
                    "Resolved {} stocks from {}",
                    snapshot.len(),
                    self.live.describe()
                );
                snapshot
            }
            Err(e) => {
                warn!(
                    "Live source {} unavailable, using embedded table: {}",
                    self.live.describe(),
                    e
                );
                Self::fallback()
            }
        }
    }

    async fn try_live(&self) -> Result<StocksSnapshot> {
        let payload = tokio::time::timeout(self.timeout, self.live.fetch())
            .await
            .map_err(|_| {
                AppError::Timeout(format!("live fetch exceeded {:?}", self.timeout))
            })??;

        let last_update = payload.atualizado_em.clone().unwrap_or_default();
        let reference_date = payload.data_referencia.clone().unwrap_or_default();
        let source_label = payload
            .fonte
            .clone()
            .unwrap_or_else(|| DEFAULT_LIVE_LABEL.to_string());

        let stocks = payload.into_stocks();
        if stocks.is_empty() {
            return Err(AppError::Upstream("live source returned no stocks".to_string()));
        }

        Ok(StocksSnapshot {
            stocks,
            last_update,
            reference_date,
            source_label,
            is_live: true,
        })
    }

    /// Snapshot built from the embedded table
    pub fn fallback() -> StocksSnapshot {
        let stocks = static_stocks();
        let last_update = stocks
            .first()
            .map(|s| s.last_updated.clone())
            .unwrap_or_default();

        StocksSnapshot {
            stocks,
            last_update,
            reference_date: String::new(),
            source_label: FALLBACK_LABEL.to_string(),
            is_live: false,
        }
    }
}
