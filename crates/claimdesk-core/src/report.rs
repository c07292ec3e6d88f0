//! Validation reports and RTI requests: the generated artefacts attached to
//! a claim.
//!
//! Both are append-only: rows are inserted once and never updated. A
//! validation report may be deleted individually; both kinds are removed when
//! their claim is deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status tag written on every generated validation report.
pub const REPORT_GENERATED: &str = "REPORT_GENERATED";

/// Status tag written on every generated RTI request.
pub const REQUEST_GENERATED: &str = "GENERATED";

// ─── Validation reports ──────────────────────────────────────────────────────

/// A validation report joined with its author's username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
  pub id:                       i64,
  pub claim_id:                 i64,
  pub validator_id:             i64,
  pub validator_username:       String,
  pub status:                   String,
  pub notes:                    String,
  pub ai_generated_full_report: String,
  pub ai_generated_conclusion:  String,
  pub created_at:               DateTime<Utc>,
}

/// A freshly generated report, ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewValidationReport {
  pub claim_id:     i64,
  pub validator_id: i64,
  pub full_report:  String,
  pub conclusion:   String,
}

// ─── RTI requests ────────────────────────────────────────────────────────────

/// A drafted Right to Information request joined with its author's username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtiRequest {
  pub id:                       i64,
  pub claim_id:                 i64,
  pub validator_id:             i64,
  pub validator_username:       String,
  pub status:                   String,
  pub notes:                    String,
  pub ai_generated_rti_request: String,
  pub created_at:               DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRtiRequest {
  pub claim_id:     i64,
  pub validator_id: i64,
  pub request_text: String,
}
