//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p tally-api --test receipts_test`.
//! The AI gateway is replaced by a scripted one, so no network access is needed.

#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use axum_test::TestServer;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tally_api::setup::{build_state, routes};
use tally_core::constants::DEFAULT_VISION_MODEL;
use tally_core::{BaseConfig, Config, ExtractionConfig};
use tally_db::InMemoryReceiptRepository;
use tally_extraction::AiGateway;
use tempfile::TempDir;

/// What the scripted gateway answers with.
#[derive(Clone)]
pub enum GatewayReply {
    Text(String),
    Failure(String),
}

/// Gateway that returns a fixed reply and records the MIME types it was sent.
pub struct ScriptedGateway {
    reply: GatewayReply,
    mime_types: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new(reply: GatewayReply) -> Self {
        Self {
            reply,
            mime_types: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.mime_types.lock().unwrap().len()
    }

    pub fn mime_types(&self) -> Vec<String> {
        self.mime_types.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiGateway for ScriptedGateway {
    async fn infer(
        &self,
        _prompt: &str,
        _image_base64: &str,
        mime_type: &str,
    ) -> anyhow::Result<String> {
        self.mime_types.lock().unwrap().push(mime_type.to_string());
        match &self.reply {
            GatewayReply::Text(text) => Ok(text.clone()),
            GatewayReply::Failure(message) => Err(anyhow::anyhow!("{}", message)),
        }
    }
}

/// Test application: server plus the collaborators tests inspect directly.
pub struct TestApp {
    pub server: TestServer,
    pub gateway: Arc<ScriptedGateway>,
    pub repository: Arc<InMemoryReceiptRepository>,
    pub uploads_dir: PathBuf,
    pub samples_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of files written to the uploads directory.
    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(&self.uploads_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub fn create_test_config(temp_dir: &TempDir, max_file_size_bytes: usize) -> Config {
    Config(Box::new(ExtractionConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
            log_format: "text".to_string(),
        },
        uploads_dir: temp_dir.path().join("uploads"),
        uploads_url_prefix: "/uploads".to_string(),
        samples_dir: temp_dir.path().join("samples"),
        max_file_size_bytes,
        anthropic_api_key: "sk-ant-test-key-123456".to_string(),
        anthropic_vision_model: DEFAULT_VISION_MODEL.to_string(),
        anthropic_max_tokens: 1024,
        ai_request_timeout_secs: 5,
    }))
}

/// Setup test app with an isolated upload directory and repository.
pub async fn setup_test_app(reply: GatewayReply) -> TestApp {
    setup_test_app_with_limit(reply, 10 * 1024 * 1024).await
}

pub async fn setup_test_app_with_limit(reply: GatewayReply, max_file_size_bytes: usize) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = create_test_config(&temp_dir, max_file_size_bytes);

    let gateway = Arc::new(ScriptedGateway::new(reply));
    let repository = Arc::new(InMemoryReceiptRepository::new());

    let state = build_state(&config, gateway.clone(), repository.clone());
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");

    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        gateway,
        repository,
        uploads_dir: config.uploads_dir().to_path_buf(),
        samples_dir: config.samples_dir().to_path_buf(),
        _temp_dir: temp_dir,
    }
}
