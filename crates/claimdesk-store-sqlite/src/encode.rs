//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that lexical order equals chronological order.
//! Publication dates are stored as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use claimdesk_core::{
  account::User,
  claim::{Claim, ClaimStatus},
  report::{RtiRequest, ValidationReport},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// Wrap `needle` in `%…%`, escaping LIKE metacharacters with `\`.
pub fn contains_pattern(needle: &str) -> String {
  let mut out = String::with_capacity(needle.len() + 2);
  out.push('%');
  for c in needle.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:         i64,
  pub username:   String,
  pub password:   String,
  pub created_at: String,
}

impl RawUser {
  pub const COLUMNS: &'static str = "id, username, password, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      username:   row.get(1)?,
      password:   row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            self.id,
      username:      self.username,
      password_hash: self.password,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read from a `claims` row joined with the creator's username.
pub struct RawClaim {
  pub id:                  i64,
  pub claim_nb_tx:         String,
  pub claim_title:         String,
  pub description:         String,
  pub published_url:       String,
  pub category:            String,
  pub status:              String,
  pub comments:            Option<String>,
  pub created_by:          i64,
  pub created_by_username: String,
  pub created_at:          String,
  pub updated_at:          Option<String>,
  pub date_published:      String,
}

impl RawClaim {
  /// Select list matching [`RawClaim::from_row`]; alias `c` is `claims`.
  pub const SELECT: &'static str = "SELECT
      c.id, c.claim_nb_tx, c.claim_title, c.description, c.published_url,
      c.category, c.status, c.comments, c.created_by, u.username,
      c.created_at, c.updated_at, c.date_published
    FROM claims c
    JOIN users u ON u.id = c.created_by";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                  row.get(0)?,
      claim_nb_tx:         row.get(1)?,
      claim_title:         row.get(2)?,
      description:         row.get(3)?,
      published_url:       row.get(4)?,
      category:            row.get(5)?,
      status:              row.get(6)?,
      comments:            row.get(7)?,
      created_by:          row.get(8)?,
      created_by_username: row.get(9)?,
      created_at:          row.get(10)?,
      updated_at:          row.get(11)?,
      date_published:      row.get(12)?,
    })
  }

  pub fn into_claim(self) -> Result<Claim> {
    Ok(Claim {
      id:                  self.id,
      claim_nb_tx:         self.claim_nb_tx.parse()?,
      claim_title:         self.claim_title,
      description:         self.description,
      published_url:       self.published_url,
      category:            self.category,
      status:              self.status.parse::<ClaimStatus>()?,
      comments:            self.comments,
      created_by:          self.created_by,
      created_by_username: self.created_by_username,
      created_at:          decode_dt(&self.created_at)?,
      updated_at:          self.updated_at.as_deref().map(decode_dt).transpose()?,
      date_published:      decode_date(&self.date_published)?,
    })
  }
}

/// Raw values read from a `validations` row joined with the validator's
/// username.
pub struct RawValidation {
  pub id:                 i64,
  pub claim_id:           i64,
  pub validator_id:       i64,
  pub validator_username: String,
  pub status:             String,
  pub notes:              String,
  pub full_report:        String,
  pub conclusion:         String,
  pub created_at:         String,
}

impl RawValidation {
  /// Alias `v` is `validations`.
  pub const SELECT: &'static str = "SELECT
      v.id, v.claim_id, v.validator_id, u.username, v.status, v.notes,
      v.ai_generated_full_report, v.ai_generated_conclusion, v.created_at
    FROM validations v
    JOIN users u ON u.id = v.validator_id";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      claim_id:           row.get(1)?,
      validator_id:       row.get(2)?,
      validator_username: row.get(3)?,
      status:             row.get(4)?,
      notes:              row.get(5)?,
      full_report:        row.get(6)?,
      conclusion:         row.get(7)?,
      created_at:         row.get(8)?,
    })
  }

  pub fn into_report(self) -> Result<ValidationReport> {
    Ok(ValidationReport {
      id:                       self.id,
      claim_id:                 self.claim_id,
      validator_id:             self.validator_id,
      validator_username:       self.validator_username,
      status:                   self.status,
      notes:                    self.notes,
      ai_generated_full_report: self.full_report,
      ai_generated_conclusion:  self.conclusion,
      created_at:               decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read from an `rti_requests` row joined with the author's
/// username.
pub struct RawRtiRequest {
  pub id:                 i64,
  pub claim_id:           i64,
  pub validator_id:       i64,
  pub validator_username: String,
  pub status:             String,
  pub notes:              String,
  pub request_text:       String,
  pub created_at:         String,
}

impl RawRtiRequest {
  /// Alias `r` is `rti_requests`.
  pub const SELECT: &'static str = "SELECT
      r.id, r.claim_id, r.validator_id, u.username, r.status, r.notes,
      r.ai_generated_rti_request, r.created_at
    FROM rti_requests r
    JOIN users u ON u.id = r.validator_id";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      claim_id:           row.get(1)?,
      validator_id:       row.get(2)?,
      validator_username: row.get(3)?,
      status:             row.get(4)?,
      notes:              row.get(5)?,
      request_text:       row.get(6)?,
      created_at:         row.get(7)?,
    })
  }

  pub fn into_request(self) -> Result<RtiRequest> {
    Ok(RtiRequest {
      id:                       self.id,
      claim_id:                 self.claim_id,
      validator_id:             self.validator_id,
      validator_username:       self.validator_username,
      status:                   self.status,
      notes:                    self.notes,
      ai_generated_rti_request: self.request_text,
      created_at:               decode_dt(&self.created_at)?,
    })
  }
}
