//! REST API endpoint handlers

use crate::analytics::{compute_stats, filter_and_sort, SortConfig};
use crate::api::types::*;
use crate::error::{AppError, Result};
use crate::refresh::{RefreshOrigin, UpdateRequest};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

// ============================================================================
// Health Check
// ============================================================================

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "success".to_string(),
        message: "Stock Radar API is running".to_string(),
    })
}

// ============================================================================
// Snapshot
// ============================================================================

/// GET /api/stocks - the snapshot file as written by the update script
pub async fn get_stocks(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    state.store.read_raw().await.map(Json).ok_or_else(|| {
        AppError::NotFound(
            "Stock data not available. Call POST /api/update to generate it.".to_string(),
        )
    })
}

/// GET /api/status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let snapshot = state.store.metadata().await;

    Json(StatusResponse {
        disponivel: snapshot.is_some(),
        snapshot,
        update_in_progress: state.is_update_in_progress(),
        ultima_execucao: state.refresh.last_run(),
    })
}

// ============================================================================
// Refresh
// ============================================================================

fn parse_max_price(value: Option<&Value>, default: f64) -> Result<f64> {
    let price = match value {
        None | Some(Value::Null) => return Ok(default),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(default),
        Some(Value::String(s)) => s.trim().replace(',', ".").parse::<f64>().ok(),
        Some(_) => None,
    };

    price
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| AppError::Validation("maxPreco must be a positive number".to_string()))
}

/// POST /api/update - starts the update script and returns immediately
pub async fn trigger_update(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<UpdateAccepted>> {
    // empty body and `null` both mean "use the default"
    let body: UpdateBody = if body.iter().all(u8::is_ascii_whitespace) {
        UpdateBody::default()
    } else {
        serde_json::from_slice::<Option<UpdateBody>>(&body)
            .map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))?
            .unwrap_or_default()
    };

    let max_price = parse_max_price(body.max_preco.as_ref(), state.config.default_max_price)?;

    state.refresh.trigger(
        UpdateRequest {
            max_price: Some(max_price),
        },
        RefreshOrigin::Manual,
    )?;

    info!("Manual update accepted (max price {})", max_price);
    Ok(Json(UpdateAccepted {
        success: true,
        mensagem: "Update started. Check GET /api/status.".to_string(),
    }))
}

// ============================================================================
// Dashboard view
// ============================================================================

/// GET /api/dashboard?search=&sort=&dir=
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>> {
    let default_sort = SortConfig::default();
    let sort = SortConfig {
        key: match query.sort.as_deref() {
            Some(key) if !key.is_empty() => key.parse()?,
            _ => default_sort.key,
        },
        direction: match query.dir.as_deref() {
            Some(dir) if !dir.is_empty() => dir.parse()?,
            _ => default_sort.direction,
        },
    };

    let snapshot = state.resolver.resolve().await;
    let view = filter_and_sort(
        &snapshot.stocks,
        query.search.as_deref().unwrap_or(""),
        Some(sort),
    );
    let stats = compute_stats(&snapshot.stocks);

    Ok(Json(DashboardResponse {
        snapshot,
        sort,
        view,
        stats,
    }))
}
