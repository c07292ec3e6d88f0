use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid LLM configuration: {0}")]
  Config(String),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("completion endpoint returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("completion response had no choices")]
  NoChoices,

  #[error("LLM returned empty text")]
  EmptyCompletion,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
