//! Periodic refresh during B3 trading hours
//!
//! Every interval tick the scheduler checks the exchange clock and, if the
//! session is open and no refresh is already running, starts one.
//! B3 session: 10:00 to 18:20 in São Paulo.

use crate::error::AppError;
use crate::refresh::{RefreshOrigin, RefreshService, UpdateRequest};
use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::America::Sao_Paulo;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const SESSION_OPEN: (u32, u32) = (10, 0);
const SESSION_CLOSE: (u32, u32) = (18, 20);

/// Whether `now` falls inside the B3 session, bounds included
pub fn is_trading_hours(now: DateTime<Utc>) -> bool {
    let local = now.with_timezone(&Sao_Paulo).time();

    let (Some(open), Some(close)) = (
        NaiveTime::from_hms_opt(SESSION_OPEN.0, SESSION_OPEN.1, 0),
        NaiveTime::from_hms_opt(SESSION_CLOSE.0, SESSION_CLOSE.1, 59),
    ) else {
        return false;
    };

    local >= open && local <= close
}

/// Auto-update scheduler that ticks every `interval`.
///
/// Scheduled runs pass no arguments, so the script uses its own defaults.
pub struct AutoUpdateScheduler {
    refresh: Arc<RefreshService>,
    interval: Duration,
}

impl AutoUpdateScheduler {
    pub fn new(refresh: Arc<RefreshService>, interval: Duration) -> Self {
        Self { refresh, interval }
    }

    /// Start the scheduler on the current Tokio runtime
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "Auto-update scheduler started ({} min interval, trading hours only)",
                self.interval.as_secs() / 60
            );

            let mut ticker = tokio::time::interval(self.interval);
            // First tick completes immediately; first run is one period after startup
            ticker.tick().await;

            loop {
                ticker.tick().await;
                self.tick(Utc::now());
            }
        })
    }

    /// One scheduling decision; returns whether a refresh was started
    pub fn tick(&self, now: DateTime<Utc>) -> bool {
        if !is_trading_hours(now) {
            debug!("Auto-update skipped: outside trading hours");
            return false;
        }

        match self
            .refresh
            .trigger(UpdateRequest { max_price: None }, RefreshOrigin::Scheduled)
        {
            Ok(()) => {
                info!("[auto-update] Scheduled update started");
                true
            }
            Err(AppError::UpdateInProgress) => {
                debug!("Auto-update skipped: update already in progress");
                false
            }
            Err(e) => {
                warn!("[auto-update] Failed to start: {}", e);
                false
            }
        }
    }
}
