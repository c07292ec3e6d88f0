//! Request and response bodies of the chat-completions endpoint.

use claimdesk_core::completion::{ChatMessage, CompletionRequest};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Serialize)]
pub struct ChatBody<'a> {
  pub model:       &'a str,
  pub messages:    &'a [ChatMessage],
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_tokens:  Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub temperature: Option<f32>,
}

impl<'a> ChatBody<'a> {
  pub fn new(model: &'a str, request: &'a CompletionRequest) -> Self {
    Self {
      model,
      messages: &request.messages,
      max_tokens: request.max_tokens,
      temperature: request.temperature,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
  #[serde(default)]
  pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
  pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
  #[serde(default)]
  pub content: Option<String>,
}

impl ChatResponse {
  /// Text of the first choice. Blank text counts as a failure.
  pub fn into_text(self) -> Result<String> {
    let choice = self.choices.into_iter().next().ok_or(Error::NoChoices)?;
    match choice.message.content {
      Some(text) if !text.trim().is_empty() => Ok(text),
      _ => Err(Error::EmptyCompletion),
    }
  }
}
