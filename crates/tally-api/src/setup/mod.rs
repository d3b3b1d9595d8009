//! Application setup and initialization
//!
//! Everything `main` needs to go from a loaded `Config` to a running router.
//! Construction is explicit and fallible: a misconfigured AI gateway stops
//! startup instead of failing the first request.

pub mod routes;
pub mod server;

use crate::state::{AppState, SamplesConfig};
use anyhow::{Context, Result};
use std::sync::Arc;
use tally_core::constants::SAMPLES_URL_PREFIX;
use tally_core::Config;
use tally_db::{InMemoryReceiptRepository, ReceiptRepository};
use tally_extraction::{AiGateway, AnthropicConfig, AnthropicGateway, ReceiptExtractionService};
use tally_storage::LocalStorage;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())
        .context("Failed to initialize telemetry")?;

    tracing::info!(
        environment = %config.environment(),
        uploads_dir = %config.uploads_dir().display(),
        model = %config.anthropic_vision_model(),
        "Configuration loaded and validated successfully"
    );

    let gateway = AnthropicGateway::new(AnthropicConfig::from_config(&config))
        .context("Failed to initialize Anthropic gateway")?;

    let repository: Arc<dyn ReceiptRepository> = Arc::new(InMemoryReceiptRepository::new());

    let state = build_state(&config, Arc::new(gateway), repository);
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

/// Wire storage, gateway and repository into the shared state.
pub fn build_state(
    config: &Config,
    gateway: Arc<dyn AiGateway>,
    repository: Arc<dyn ReceiptRepository>,
) -> Arc<AppState> {
    let storage = Arc::new(LocalStorage::new(
        config.uploads_dir(),
        config.uploads_url_prefix(),
    ));

    let extraction = ReceiptExtractionService::new(storage, gateway, repository);

    Arc::new(AppState {
        extraction: Arc::new(extraction),
        samples: SamplesConfig {
            dir: config.samples_dir().to_path_buf(),
            url_prefix: SAMPLES_URL_PREFIX.to_string(),
        },
        max_file_size_bytes: config.max_file_size_bytes(),
    })
}
