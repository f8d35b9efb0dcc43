//! X-Detect Prediction Server
//!
//! HTTP interface over the X-Detect scoring pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    X-DETECT SERVER                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐        ┌─────────────────────────────────┐  │
//! │  │  API      │ ─────▶ │  PredictionPipeline             │  │
//! │  │  (Axum)   │        │  (spawn_blocking per request)   │  │
//! │  └───────────┘        └────────────────┬────────────────┘  │
//! │                                        ▼                    │
//! │                              ┌──────────────────┐          │
//! │                              │  Audit log (CSV) │          │
//! │                              └──────────────────┘          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod handlers;
mod error;


use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xdetect_core::PredictionPipeline;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (also captures `log` records from the core)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "xdetect_server=debug,xdetect_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    tracing::info!("X-Detect Server starting ({})...", config.environment);
    tracing::info!("Model: {}", config.detector.model_path.display());
    tracing::info!("Scaler: {}", config.detector.scaler_path.display());

    // Artifacts must load before the server accepts traffic
    let pipeline = PredictionPipeline::from_config(&config.detector)
        .map_err(|e| anyhow::anyhow!("failed to initialize prediction pipeline: {}", e))?;

    // Build application state
    let state = AppState {
        pipeline: Arc::new(pipeline),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PredictionPipeline>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/predict", post(handlers::predict::predict))
        .route("/api/v1/predict/batch", post(handlers::predict::predict_batch))
        .route("/api/v1/engine/status", get(handlers::engine::status))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
