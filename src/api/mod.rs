//! REST API server module
//!
//! Provides:
//! - Snapshot access (`GET /api/stocks`, `GET /api/status`)
//! - Refresh trigger (`POST /api/update`)
//! - Resolved, filtered and sorted dashboard view (`GET /api/dashboard`)
//! - The built dashboard assets from `dist/`, when present

pub mod handlers;
mod server;
mod types;

pub use server::{router, ApiServer};
pub use types::{
    DashboardQuery, DashboardResponse, HealthResponse, StatusResponse, UpdateAccepted, UpdateBody,
};
