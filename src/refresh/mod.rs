//! Out-of-band snapshot refresh
//!
//! A refresh runs the external update script in the background. Triggering
//! returns as soon as the run has started; completion is observable through
//! [`RefreshService::is_running`] and [`RefreshService::last_run`].

mod gate;
mod runner;

pub use gate::{RefreshGate, RefreshPermit};
pub use runner::{ScriptRunner, UpdateRequest, UpdateRunner};

use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Who asked for the refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshOrigin {
    Manual,
    Scheduled,
}

/// Outcome of the most recent run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub origin: RefreshOrigin,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub success: Option<bool>,
    pub message: Option<String>,
}

pub struct RefreshService {
    gate: RefreshGate,
    runner: Arc<dyn UpdateRunner>,
    last_run: Arc<RwLock<Option<RunRecord>>>,
}

impl RefreshService {
    pub fn new(runner: Arc<dyn UpdateRunner>) -> Self {
        Self {
            gate: RefreshGate::new(),
            runner,
            last_run: Arc::new(RwLock::new(None)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.gate.is_busy()
    }

    pub fn last_run(&self) -> Option<RunRecord> {
        self.last_run.read().clone()
    }

    /// Start a run in the background.
    ///
    /// Fails with [`AppError::UpdateInProgress`] while another run holds the
    /// gate. Must be called from within a Tokio runtime.
    pub fn trigger(&self, request: UpdateRequest, origin: RefreshOrigin) -> Result<()> {
        let permit = self.gate.try_acquire().ok_or(AppError::UpdateInProgress)?;

        info!("Starting {:?} update (max price: {:?})", origin, request.max_price);
        *self.last_run.write() = Some(RunRecord {
            origin,
            started_at: Utc::now(),
            finished_at: None,
            success: None,
            message: None,
        });

        let runner = self.runner.clone();
        let last_run = self.last_run.clone();
        tokio::spawn(async move {
            let result = runner.run(&request).await;

            let (success, message) = match result {
                Ok(stdout) => {
                    if !stdout.is_empty() {
                        info!("[update] {}", stdout);
                    }
                    info!("{:?} update completed", origin);
                    (true, None)
                }
                Err(e) => {
                    error!("{:?} update failed: {}", origin, e);
                    (false, Some(e.to_string()))
                }
            };

            if let Some(record) = last_run.write().as_mut() {
                record.finished_at = Some(Utc::now());
                record.success = Some(success);
                record.message = message;
            }
            permit.release();
        });

        Ok(())
    }
}
