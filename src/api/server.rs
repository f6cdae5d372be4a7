//! HTTP server for the REST API and the dashboard assets

use crate::api::handlers;
use crate::error::Result;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Build the router with all routes
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let dist_dir = state.config.dist_dir();

    let mut app = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/stocks", get(handlers::get_stocks))
        .route("/api/status", get(handlers::get_status))
        .route("/api/update", post(handlers::trigger_update))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .with_state(state);

    // Single-page app: unknown paths get index.html
    if dist_dir.is_dir() {
        info!("Serving dashboard assets from {:?}", dist_dir);
        let index = dist_dir.join("index.html");
        app = app.fallback_service(ServeDir::new(&dist_dir).fallback(ServeFile::new(index)));
    }

    app.layer(cors).layer(TraceLayer::new_for_http())
}

/// API server manager
pub struct ApiServer {
    state: Arc<AppState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            shutdown_tx: None,
        }
    }

    /// Bind and serve in the background
    pub async fn start(&mut self) -> Result<JoinHandle<()>> {
        let addr: SocketAddr = self.state.config.listen_addr()?;
        let app = router(self.state.clone());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        self.shutdown_tx = Some(shutdown_tx);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let local = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("API server shutting down");
            });

            if let Err(e) = server.await {
                error!("API server error: {}", e);
            }
        });

        info!("Stock Radar API running on http://{}", local);
        info!("  GET  http://{}/api/stocks", local);
        info!("  GET  http://{}/api/status", local);
        info!("  POST http://{}/api/update", local);
        info!("  GET  http://{}/api/dashboard", local);

        Ok(handle)
    }

    /// Stop the server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            info!("API server stop signal sent");
        }
    }

    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }
}

impl Drop for ApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}
