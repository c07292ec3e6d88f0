//! Error types for `claimdesk-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown claim status: {0:?}")]
  UnknownStatus(String),

  #[error("malformed claim number: {0:?}")]
  InvalidClaimNumber(String),

  /// Every five-digit sequence number for the prefix has been issued.
  #[error("claim numbers exhausted for prefix {0}")]
  SequenceExhausted(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
