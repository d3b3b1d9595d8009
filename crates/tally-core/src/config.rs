//! Configuration module
//!
//! This module provides configuration structures for the API server and the
//! extraction pipeline. Everything is read from the process environment (with
//! `.env` support) once at startup; a missing AI credential fails startup.

use std::env;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_UPLOADS_URL_PREFIX, DEFAULT_VISION_MODEL,
    MAX_FILE_SIZE_MB_CEILING,
};

// Common constants
const SERVER_PORT: u16 = 3000;
const ANTHROPIC_MAX_TOKENS: u32 = 1024;
const AI_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// "text" or "json"
    pub log_format: String,
}

/// Receipt extraction configuration
#[derive(Clone, Debug)]
pub struct ExtractionConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub uploads_dir: PathBuf,
    pub uploads_url_prefix: String,
    pub samples_dir: PathBuf,
    pub max_file_size_bytes: usize,
    // AI gateway configuration
    pub anthropic_api_key: String,
    pub anthropic_vision_model: String,
    pub anthropic_max_tokens: u32,
    pub ai_request_timeout_secs: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ExtractionConfig>);

impl Config {
    fn as_extraction(&self) -> &ExtractionConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.as_extraction().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ExtractionConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_extraction().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_extraction().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_extraction().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_extraction().base.environment
    }

    pub fn log_format(&self) -> &str {
        &self.as_extraction().base.log_format
    }

    pub fn uploads_dir(&self) -> &std::path::Path {
        &self.as_extraction().uploads_dir
    }

    pub fn uploads_url_prefix(&self) -> &str {
        &self.as_extraction().uploads_url_prefix
    }

    pub fn samples_dir(&self) -> &std::path::Path {
        &self.as_extraction().samples_dir
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.as_extraction().max_file_size_bytes
    }

    pub fn anthropic_api_key(&self) -> &str {
        &self.as_extraction().anthropic_api_key
    }

    pub fn anthropic_vision_model(&self) -> &str {
        &self.as_extraction().anthropic_vision_model
    }

    pub fn anthropic_max_tokens(&self) -> u32 {
        self.as_extraction().anthropic_max_tokens
    }

    pub fn ai_request_timeout_secs(&self) -> u64 {
        self.as_extraction().ai_request_timeout_secs
    }
}

/// Convert a `MAX_FILE_SIZE_MB` value to bytes, refusing values past the ceiling.
pub fn file_size_mb_to_bytes(mb: usize) -> Result<usize, anyhow::Error> {
    if mb > MAX_FILE_SIZE_MB_CEILING {
        return Err(anyhow::anyhow!(
            "MAX_FILE_SIZE_MB must be at most {}",
            MAX_FILE_SIZE_MB_CEILING
        ));
    }
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large"))
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

impl ExtractionConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB);

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "text".to_string())
                .to_lowercase(),
        };

        let config = ExtractionConfig {
            base,
            uploads_dir: env::var("UPLOADS_DIR")
                .unwrap_or_else(|_| "uploads".to_string())
                .into(),
            uploads_url_prefix: env::var("UPLOADS_URL_PREFIX")
                .unwrap_or_else(|_| DEFAULT_UPLOADS_URL_PREFIX.to_string()),
            samples_dir: env::var("SAMPLES_DIR")
                .unwrap_or_else(|_| "samples".to_string())
                .into(),
            max_file_size_bytes: file_size_mb_to_bytes(max_file_size_mb)?,
            anthropic_api_key: env::var("ANTHROPIC_API_KEY")
                .map_err(|_| anyhow::anyhow!("ANTHROPIC_API_KEY must be set for receipt extraction"))?,
            anthropic_vision_model: env::var("ANTHROPIC_VISION_MODEL")
                .unwrap_or_else(|_| DEFAULT_VISION_MODEL.to_string()),
            anthropic_max_tokens: env::var("ANTHROPIC_MAX_TOKENS")
                .unwrap_or_else(|_| ANTHROPIC_MAX_TOKENS.to_string())
                .parse()
                .unwrap_or(ANTHROPIC_MAX_TOKENS),
            ai_request_timeout_secs: env::var("AI_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| AI_REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(AI_REQUEST_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let api_key = self.anthropic_api_key.trim();
        if api_key.is_empty() {
            return Err(anyhow::anyhow!(
                "ANTHROPIC_API_KEY must be set for receipt extraction"
            ));
        }

        if api_key == "your-api-key" || api_key == "sk-ant-" || api_key.len() < 10 {
            return Err(anyhow::anyhow!(
                "ANTHROPIC_API_KEY appears to be invalid or a placeholder"
            ));
        }

        if is_production_name(&self.base.environment)
            && self.base.cors_origins.iter().any(|o| o == "*")
        {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("Max file size cannot be 0"));
        }

        if self.max_file_size_bytes > MAX_FILE_SIZE_MB_CEILING * 1024 * 1024 {
            return Err(anyhow::anyhow!(
                "Max file size cannot exceed {} MB",
                MAX_FILE_SIZE_MB_CEILING
            ));
        }

        if self.ai_request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("AI_REQUEST_TIMEOUT_SECS cannot be 0"));
        }

        if !self.uploads_url_prefix.starts_with('/') {
            return Err(anyhow::anyhow!(
                "UPLOADS_URL_PREFIX must be an absolute path such as /uploads"
            ));
        }

        // Served through a nested router, which cannot sit at the root
        if self.uploads_url_prefix == "/" || self.uploads_url_prefix.ends_with('/') {
            return Err(anyhow::anyhow!(
                "UPLOADS_URL_PREFIX must not be '/' or end with '/'"
            ));
        }

        if self.base.log_format != "text" && self.base.log_format != "json" {
            return Err(anyhow::anyhow!("LOG_FORMAT must be 'text' or 'json'"));
        }

        Ok(())
    }
}
