//! The language-model collaborator, reduced to a text-completion service.
//!
//! A request is an ordered list of role-tagged messages plus sampling limits;
//! the response is a single text string. Implemented by `claimdesk-llm` over
//! an OpenAI-compatible HTTP API.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// Who authored a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  System,
  User,
  Assistant,
}

impl Role {
  pub fn as_str(self) -> &'static str {
    match self {
      Role::System => "system",
      Role::User => "user",
      Role::Assistant => "assistant",
    }
  }
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role:    Role,
  pub content: String,
}

impl ChatMessage {
  pub fn system(content: impl Into<String>) -> Self {
    Self { role: Role::System, content: content.into() }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Self { role: Role::User, content: content.into() }
  }

  pub fn assistant(content: impl Into<String>) -> Self {
    Self { role: Role::Assistant, content: content.into() }
  }
}

/// A single completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
  pub messages:    Vec<ChatMessage>,
  /// Upper bound on generated tokens; `None` leaves it to the service.
  pub max_tokens:  Option<u32>,
  pub temperature: Option<f32>,
}

impl CompletionRequest {
  pub fn new(messages: Vec<ChatMessage>) -> Self {
    Self { messages, max_tokens: None, temperature: None }
  }

  pub fn max_tokens(mut self, max_tokens: u32) -> Self {
    self.max_tokens = Some(max_tokens);
    self
  }

  pub fn temperature(mut self, temperature: f32) -> Self {
    self.temperature = Some(temperature);
    self
  }
}

/// Abstraction over the text-completion backend.
///
/// No retries are expected from implementations: a failed call is reported
/// to the caller as-is.
pub trait CompletionService: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Run one completion and return the generated text.
  fn complete(
    &self,
    request: CompletionRequest,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;
}
