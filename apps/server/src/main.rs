// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Lite Material Server - material quantities over one IFC model.
//!
//! The model named by `IFC_MODEL_PATH` is loaded once before the listener
//! binds and is shared read-only by every request.
//!
//! # Endpoints
//!
//! - `GET /` - API information
//! - `GET /api/v1/health` - Health check with the loaded model summary
//! - `GET /material?material_name=<name>` - Elements using a material, and its volume
//! - `GET /api/v1/material?material_name=<name>` - Same as `/material`

use anyhow::Context;
use axum::{http::HeaderValue, routing::get, Router};
use ifc_lite_materials::IfcModel;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod config;
mod error;
mod routes;

use config::Config;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<IfcModel>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(&config);

    tracing::info!(
        host = %config.host,
        port = config.port,
        model_path = %config.model_path,
        request_timeout_secs = config.request_timeout_secs,
        circle_segments = config.geometry_settings().circle_segments,
        "Starting IFC-Lite Material Server"
    );

    let model_path = config.model_path.clone();
    let model = tokio::task::spawn_blocking(move || IfcModel::open(&model_path))
        .await?
        .with_context(|| format!("Failed to load IFC model {}", config.model_path))?;

    let summary = model.summary();
    tracing::info!(
        schema = %summary.schema_version,
        entities = summary.entity_count,
        elements = summary.element_count,
        material_relations = summary.material_relation_count,
        void_relations = summary.void_relation_count,
        length_unit_scale = summary.length_unit_scale,
        "Model loaded"
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;

    let state = AppState {
        model: Arc::new(model),
        config: Arc::new(config),
    };
    let app = build_router(state);

    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,tower_http=debug,ifc_lite_material_server=debug".into());

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.log_json {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

/// Routes and middleware over the shared state.
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let cors = cors_layer(&state.config);

    Router::new()
        // Root endpoint - API information
        .route("/", get(routes::health::info))
        // Health check
        .route("/api/v1/health", get(routes::health::check))
        // Material queries
        .route("/material", get(routes::material::query_material))
        .route("/api/v1/material", get(routes::material::query_material))
        // Middleware
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([axum::http::Method::GET])
}
