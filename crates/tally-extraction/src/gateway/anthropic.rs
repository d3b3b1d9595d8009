//! Anthropic Messages API gateway

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use super::AiGateway;

const API_BASE: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

#[derive(Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    /// Upper bound on one request, connect through body
    pub timeout: Duration,
}

impl Debug for AnthropicConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AnthropicConfig")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AnthropicConfig {
    pub fn from_config(config: &tally_core::Config) -> Self {
        Self {
            api_key: config.anthropic_api_key().to_string(),
            model: config.anthropic_vision_model().to_string(),
            max_tokens: config.anthropic_max_tokens(),
            timeout: Duration::from_secs(config.ai_request_timeout_secs()),
        }
    }
}

/// Vision model gateway backed by Anthropic's Messages API.
pub struct AnthropicGateway {
    http_client: reqwest::Client,
    config: AnthropicConfig,
    base_url: String,
}

impl Debug for AnthropicGateway {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AnthropicGateway")
            .field("model", &self.config.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<MessageParam<'a>>,
}

#[derive(Debug, Serialize)]
struct MessageParam<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock<'a> {
    Text { text: &'a str },
    Image { source: ImageSource<'a> },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    source_type: &'static str,
    media_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlockResponse>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlockResponse {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl AnthropicGateway {
    pub fn new(config: AnthropicConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            anyhow::bail!("Anthropic API key is required but not provided");
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client for Anthropic API")?;

        Ok(Self {
            http_client,
            config,
            base_url: API_BASE.to_string(),
        })
    }

    /// Point the gateway at a different API root (e.g. a local mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl AiGateway for AnthropicGateway {
    async fn infer(&self, prompt: &str, image_base64: &str, mime_type: &str) -> Result<String> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![MessageParam {
                role: "user",
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            source_type: "base64",
                            media_type: mime_type,
                            data: image_base64,
                        },
                    },
                    ContentBlock::Text { text: prompt },
                ],
            }],
        };

        let start = std::time::Instant::now();
        let response = self
            .http_client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Anthropic API request failed: {} - {}",
                status,
                error_text
            ));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .context("Failed to parse Anthropic API response")?;

        if let Some(usage) = &parsed.usage {
            tracing::info!(
                model = %self.config.model,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                duration_ms = start.elapsed().as_millis() as u64,
                "Anthropic API call completed"
            );
        }

        parsed
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlockResponse::Text { text } => Some(text),
                ContentBlockResponse::Other => None,
            })
            .context("Anthropic API response contained no text content")
    }
}
