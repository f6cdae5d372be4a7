//! Scheduler module for Stock Radar
//!
//! Handles scheduled tasks including:
//! - Periodic snapshot refresh during B3 trading hours

mod auto_update;

pub use auto_update::{is_trading_hours, AutoUpdateScheduler};
