//! Request and response bodies for the REST API
//!
//! Field names follow the JSON the dashboard already consumes (Portuguese
//! keys, camelCase).

use crate::analytics::{SortConfig, StockStats};
use crate::ingest::types::{Stock, StocksSnapshot};
use crate::refresh::RunRecord;
use crate::store::SnapshotMetadata;
use serde::{Deserialize, Serialize};

/// GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// POST /api/update body; `maxPreco` may be a number or a numeric string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
    #[serde(default)]
    pub max_preco: Option<serde_json::Value>,
}

/// POST /api/update success
#[derive(Debug, Clone, Serialize)]
pub struct UpdateAccepted {
    pub success: bool,
    pub mensagem: String,
}

/// GET /api/status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub disponivel: bool,
    #[serde(flatten)]
    pub snapshot: Option<SnapshotMetadata>,
    pub update_in_progress: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ultima_execucao: Option<RunRecord>,
}

/// GET /api/dashboard query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub dir: Option<String>,
}

/// GET /api/dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub snapshot: StocksSnapshot,
    pub sort: SortConfig,
    pub view: Vec<Stock>,
    pub stats: StockStats,
}
