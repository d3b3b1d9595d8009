//! Route configuration and setup

use crate::constants::{API_PREFIX, DEFAULT_HTTP_CONCURRENCY_LIMIT, MULTIPART_OVERHEAD_BYTES};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tally_core::Config;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let body_limit = request_body_limit(state.max_file_size_bytes)?;

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_HTTP_CONCURRENCY_LIMIT)
        .max(1);

    let app = api_routes(state)
        .route("/health", get(handlers::health::liveness_check))
        .nest_service(
            config.uploads_url_prefix(),
            ServeDir::new(config.uploads_dir()),
        )
        .nest_service(
            tally_core::constants::SAMPLES_URL_PREFIX,
            ServeDir::new(config.samples_dir()),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    tracing::info!(
        body_limit_bytes = body_limit,
        http_concurrency_limit,
        "Routes configured"
    );

    Ok(app)
}

/// Request body ceiling: the file limit plus room for multipart framing.
fn request_body_limit(max_file_size_bytes: usize) -> Result<usize, anyhow::Error> {
    max_file_size_bytes
        .checked_add(MULTIPART_OVERHEAD_BYTES)
        .ok_or_else(|| anyhow::anyhow!("Max file size leaves no room for multipart overhead"))
}

fn api_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route(
            &format!("{}/receipts/extract", API_PREFIX),
            post(handlers::receipts::extract_receipt),
        )
        .route(
            &format!("{}/receipts", API_PREFIX),
            get(handlers::receipts::list_receipts),
        )
        .route(
            &format!("{}/receipts/{{id}}", API_PREFIX),
            get(handlers::receipts::get_receipt),
        )
        .route(
            &format!("{}/samples", API_PREFIX),
            get(handlers::samples::list_samples),
        )
        .with_state(state)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", o))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
