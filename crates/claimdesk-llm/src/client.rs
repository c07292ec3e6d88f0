//! [`OpenAiClient`]: chat completions over HTTP.

use std::time::Duration;

use claimdesk_core::completion::{CompletionRequest, CompletionService};
use reqwest::Client;

use crate::{
  Error, Result,
  wire::{ChatBody, ChatResponse},
};

/// Connection settings for the completion endpoint.
#[derive(Debug, Clone)]
pub struct LlmConfig {
  /// e.g. `https://api.openai.com/v1`
  pub base_url: String,
  pub api_key:  String,
  pub model:    String,
  pub timeout:  Duration,
}

/// HTTP client for an OpenAI-compatible chat-completions API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct OpenAiClient {
  client: Client,
  config: LlmConfig,
}

impl OpenAiClient {
  pub fn new(config: LlmConfig) -> Result<Self> {
    if config.api_key.trim().is_empty() {
      return Err(Error::Config("api key is empty".into()));
    }
    if config.model.trim().is_empty() {
      return Err(Error::Config("model is empty".into()));
    }
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  pub fn model(&self) -> &str { &self.config.model }

  fn endpoint(&self) -> String {
    format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
  }
}

impl CompletionService for OpenAiClient {
  type Error = Error;

  async fn complete(&self, request: CompletionRequest) -> Result<String> {
    tracing::debug!(
      model = %self.config.model,
      messages = request.messages.len(),
      max_tokens = ?request.max_tokens,
      "requesting completion"
    );

    let resp = self
      .client
      .post(self.endpoint())
      .bearer_auth(&self.config.api_key)
      .json(&ChatBody::new(&self.config.model, &request))
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      tracing::warn!(status = status.as_u16(), "completion endpoint failed");
      return Err(Error::Status { status: status.as_u16(), body });
    }

    let text = resp.json::<ChatResponse>().await?.into_text()?;
    tracing::debug!(chars = text.len(), "completion received");
    Ok(text)
  }
}
