//! Application state management

use crate::config::ServerConfig;
use crate::error::Result;
use crate::ingest::resolver::{HttpLiveSource, LiveSource, SnapshotFileSource, SourceResolver};
use crate::refresh::{RefreshService, ScriptRunner, UpdateRunner};
use crate::store::SnapshotStore;
use std::sync::Arc;

/// State shared by the API handlers and the scheduler
pub struct AppState {
    pub config: ServerConfig,

    /// Snapshot file written by the update script
    pub store: Arc<SnapshotStore>,

    /// Live-or-fallback resolution for the dashboard view
    pub resolver: SourceResolver,

    /// Single-flight refresh runs
    pub refresh: Arc<RefreshService>,
}

impl AppState {
    /// Create state wired to the real script runner and live source
    pub fn new(config: ServerConfig) -> Result<Self> {
        let store = Arc::new(SnapshotStore::new(config.snapshot_path()));

        let live: Arc<dyn LiveSource> = match &config.feed_url {
            Some(url) => {
                Arc::new(HttpLiveSource::new(url.clone(), config.live_fetch_timeout)?)
            },
            None => Arc::new(SnapshotFileSource::new(store.clone())),
        };

        let runner = Arc::new(ScriptRunner {
            interpreter: config.update_interpreter.clone(),
            script: config.update_script(),
            working_dir: config.root_dir.clone(),
            timeout: config.update_timeout,
        });

        tracing::info!("Snapshot file: {:?}", store.path());
        tracing::info!("Live source: {}", live.describe());

        Ok(Self::with_parts(config, store, live, runner))
    }

    /// Create state from explicit parts
    pub fn with_parts(
        config: ServerConfig,
        store: Arc<SnapshotStore>,
        live: Arc<dyn LiveSource>,
        runner: Arc<dyn UpdateRunner>,
    ) -> Self {
        let resolver = SourceResolver::new(live).with_timeout(config.live_fetch_timeout);

        Self {
            config,
            store,
            resolver,
            refresh: Arc::new(RefreshService::new(runner)),
        }
    }

    pub fn is_update_in_progress(&self) -> bool {
        self.refresh.is_running()
    }
}
