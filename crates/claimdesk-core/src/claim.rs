//! Claims: published assertions submitted for fact-checking.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, number::ClaimNumber};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Where a claim is in its investigation.
///
/// The vocabulary is closed, but transitions are not enforced: any
/// authenticated update may set any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClaimStatus {
  #[default]
  #[serde(rename = "Opened")]
  Opened,
  #[serde(rename = "Validation Report Created")]
  ValidationReportCreated,
  #[serde(rename = "Claim Successfully Validated")]
  SuccessfullyValidated,
  #[serde(rename = "RTI Request Created")]
  RtiRequestCreated,
  #[serde(rename = "RTI Information Received")]
  RtiInformationReceived,
  #[serde(rename = "Claim Validation Failed")]
  ValidationFailed,
  #[serde(rename = "Closed")]
  Closed,
}

impl ClaimStatus {
  pub const ALL: [ClaimStatus; 7] = [
    ClaimStatus::Opened,
    ClaimStatus::ValidationReportCreated,
    ClaimStatus::SuccessfullyValidated,
    ClaimStatus::RtiRequestCreated,
    ClaimStatus::RtiInformationReceived,
    ClaimStatus::ValidationFailed,
    ClaimStatus::Closed,
  ];

  /// The label stored in the database and sent over the wire.
  pub fn as_str(self) -> &'static str {
    match self {
      ClaimStatus::Opened => "Opened",
      ClaimStatus::ValidationReportCreated => "Validation Report Created",
      ClaimStatus::SuccessfullyValidated => "Claim Successfully Validated",
      ClaimStatus::RtiRequestCreated => "RTI Request Created",
      ClaimStatus::RtiInformationReceived => "RTI Information Received",
      ClaimStatus::ValidationFailed => "Claim Validation Failed",
      ClaimStatus::Closed => "Closed",
    }
  }

  /// Closed claims count as completed; everything else is active.
  pub fn is_closed(self) -> bool { matches!(self, Self::Closed) }
}

impl fmt::Display for ClaimStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ClaimStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|status| status.as_str() == s)
      .ok_or_else(|| Error::UnknownStatus(s.to_owned()))
  }
}

// ─── Claim view ──────────────────────────────────────────────────────────────

/// A claim row joined with its creator's username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
  pub id:                  i64,
  pub claim_nb_tx:         ClaimNumber,
  pub claim_title:         String,
  pub description:         String,
  pub published_url:       String,
  pub category:            String,
  pub status:              ClaimStatus,
  pub comments:            Option<String>,
  pub created_by:          i64,
  pub created_by_username: String,
  pub created_at:          DateTime<Utc>,
  pub updated_at:          Option<DateTime<Utc>>,
  pub date_published:      NaiveDate,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Everything needed to create a claim. The number, creator and timestamps
/// are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewClaim {
  pub claim_title:    String,
  pub description:    String,
  pub published_url:  String,
  pub category:       String,
  pub status:         ClaimStatus,
  pub date_published: NaiveDate,
}

/// A partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaimUpdate {
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub comments:    Option<String>,
  #[serde(default)]
  pub status:      Option<ClaimStatus>,
}

// ─── Queries ─────────────────────────────────────────────────────────────────

/// Filters for [`ClaimStore::list_claims`](crate::store::ClaimStore::list_claims).
/// Every set field must match.
#[derive(Debug, Clone, Default)]
pub struct ClaimQuery {
  /// Case-insensitive substring of the claim number or title.
  pub search:    Option<String>,
  /// Exact category.
  pub category:  Option<String>,
  pub status:    Option<ClaimStatus>,
  /// Inclusive lower bound on `date_published`.
  pub date_from: Option<NaiveDate>,
  /// Inclusive upper bound on `date_published`.
  pub date_to:   Option<NaiveDate>,
}

/// Claim counts for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClaimStats {
  pub total:     u64,
  /// Claims whose status is anything but `Closed`.
  pub active:    u64,
  pub completed: u64,
}
