//! Human-readable claim numbers of the form `PREFIX-NNNNN`.
//!
//! The prefix is derived from the claim's category; the sequence is scoped to
//! that prefix and zero-padded to five digits. Assigning the *next* number
//! needs the store (see [`ClaimStore::next_claim_number`]); everything that
//! can be decided without it lives here.
//!
//! [`ClaimStore::next_claim_number`]: crate::store::ClaimStore::next_claim_number

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Highest sequence number that still fits the five-digit format.
pub const MAX_SEQUENCE: u32 = 99_999;

/// Prefix used when a category contains no letters at all.
pub const FALLBACK_PREFIX: &str = "GEN";

/// Derive the three-letter prefix for `category`.
///
/// Takes the first three ASCII letters, uppercased. Short categories are
/// right-padded with `X`; a category without letters maps to
/// [`FALLBACK_PREFIX`].
pub fn prefix_for(category: &str) -> String {
  let mut prefix: String = category
    .chars()
    .filter(char::is_ascii_alphabetic)
    .take(3)
    .map(|c| c.to_ascii_uppercase())
    .collect();

  if prefix.is_empty() {
    return FALLBACK_PREFIX.to_owned();
  }
  while prefix.len() < 3 {
    prefix.push('X');
  }
  prefix
}

/// A parsed claim number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClaimNumber {
  prefix:   String,
  sequence: u32,
}

impl ClaimNumber {
  /// Build a number from a prefix and sequence, validating both.
  pub fn new(prefix: impl Into<String>, sequence: u32) -> Result<Self> {
    let prefix = prefix.into();
    let prefix_ok =
      prefix.len() == 3 && prefix.chars().all(|c| c.is_ascii_uppercase());
    if !prefix_ok {
      return Err(Error::InvalidClaimNumber(format!("{prefix}-{sequence}")));
    }
    if sequence == 0 || sequence > MAX_SEQUENCE {
      return Err(Error::SequenceExhausted(prefix));
    }
    Ok(Self { prefix, sequence })
  }

  /// The number that follows the highest issued sequence `last` (0 when none
  /// has been issued yet).
  pub fn after(prefix: impl Into<String>, last: u32) -> Result<Self> {
    let prefix = prefix.into();
    match last.checked_add(1) {
      Some(next) if next <= MAX_SEQUENCE => Self::new(prefix, next),
      _ => Err(Error::SequenceExhausted(prefix)),
    }
  }

  pub fn prefix(&self) -> &str { &self.prefix }

  pub fn sequence(&self) -> u32 { self.sequence }
}

impl fmt::Display for ClaimNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{:05}", self.prefix, self.sequence)
  }
}

impl FromStr for ClaimNumber {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::InvalidClaimNumber(s.to_owned());
    let (prefix, digits) = s.split_once('-').ok_or_else(invalid)?;
    if digits.len() != 5 || !digits.chars().all(|c| c.is_ascii_digit()) {
      return Err(invalid());
    }
    let sequence = digits.parse().map_err(|_| invalid())?;
    Self::new(prefix, sequence).map_err(|_| invalid())
  }
}

impl Serialize for ClaimNumber {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for ClaimNumber {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
  }
}
