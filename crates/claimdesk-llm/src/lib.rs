//! Language-model backend for claimdesk.
//!
//! [`OpenAiClient`] implements [`claimdesk_core::completion::CompletionService`]
//! over any OpenAI-compatible `POST {base_url}/chat/completions` endpoint.
//! One HTTP call per completion; no retries, no streaming.

mod client;
mod wire;

pub mod error;

pub use client::{LlmConfig, OpenAiClient};
pub use error::{Error, Result};
