//! AI gateway abstraction
//!
//! The extraction service only needs "send this prompt and image, get text
//! back". Keeping that behind a trait lets tests script the model reply.

mod anthropic;

use async_trait::async_trait;

pub use anthropic::{AnthropicConfig, AnthropicGateway};

#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Send the prompt and a base64-encoded image, returning the model's raw text.
    ///
    /// Any transport failure, non-success status or reply without text is an error.
    async fn infer(&self, prompt: &str, image_base64: &str, mime_type: &str)
        -> anyhow::Result<String>;
}
