//! [`SqliteStore`], the SQLite implementation of [`ClaimStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use claimdesk_core::{
  account::User,
  claim::{Claim, ClaimQuery, ClaimStats, ClaimStatus, ClaimUpdate, NewClaim},
  number::{ClaimNumber, prefix_for},
  report::{
    NewRtiRequest, NewValidationReport, REPORT_GENERATED, REQUEST_GENERATED, RtiRequest,
    ValidationReport,
  },
  store::ClaimStore,
};

use crate::{
  Result,
  encode::{
    RawClaim, RawRtiRequest, RawUser, RawValidation, contains_pattern, encode_date, encode_dt,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A claimdesk store backed by a single SQLite file.
///
/// Clones share one connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation. The
  /// parent directory is created if missing.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(dir).await?;
    }
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::info!(path = %path.display(), "opened claim store");
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Flush the WAL and close the connection thread.
  pub async fn close(self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch("PRAGMA wal_checkpoint(FULL);")?;
        Ok(())
      })
      .await?;
    self.conn.close().await?;
    Ok(())
  }
}

// ─── Connection-thread helpers ───────────────────────────────────────────────
//
// These run inside `Connection::call` closures and therefore take a plain
// `rusqlite::Connection`.

/// Highest sequence issued so far for `prefix`: the larger of the recorded
/// high-water mark and the numeric maximum among existing claims.
fn last_issued(conn: &rusqlite::Connection, prefix: &str) -> rusqlite::Result<u32> {
  let last: i64 = conn.query_row(
    "SELECT MAX(
       COALESCE((SELECT last_value FROM claim_sequences WHERE prefix = ?1), 0),
       COALESCE((SELECT MAX(CAST(substr(claim_nb_tx, 5) AS INTEGER))
                   FROM claims WHERE claim_nb_tx LIKE ?1 || '-%'), 0)
     )",
    rusqlite::params![prefix],
    |row| row.get(0),
  )?;
  Ok(u32::try_from(last).unwrap_or(u32::MAX))
}

fn select_claim(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<Option<RawClaim>> {
  conn
    .query_row(
      &format!("{} WHERE c.id = ?1", RawClaim::SELECT),
      rusqlite::params![id],
      RawClaim::from_row,
    )
    .optional()
}

fn select_validation(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<RawValidation>> {
  conn
    .query_row(
      &format!("{} WHERE v.id = ?1", RawValidation::SELECT),
      rusqlite::params![id],
      RawValidation::from_row,
    )
    .optional()
}

fn select_rti_request(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<RawRtiRequest>> {
  conn
    .query_row(
      &format!("{} WHERE r.id = ?1", RawRtiRequest::SELECT),
      rusqlite::params![id],
      RawRtiRequest::from_row,
    )
    .optional()
}

/// Rows that were just inserted inside the same call; absence means the
/// connection thread lost them, which SQLite does not do.
fn inserted<T>(row: Option<T>) -> rusqlite::Result<T> {
  row.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

// ─── ClaimStore impl ─────────────────────────────────────────────────────────

impl ClaimStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, username: String, password_hash: String) -> Result<Option<User>> {
    let at_str = encode_dt(Utc::now());

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT INTO users (username, password, created_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(username) DO NOTHING",
          rusqlite::params![username, password_hash, at_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let id = conn.last_insert_rowid();
        Ok(Some(conn.query_row(
          &format!("SELECT {} FROM users WHERE id = ?1", RawUser::COLUMNS),
          rusqlite::params![id],
          RawUser::from_row,
        )?))
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_user(&self, username: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {} FROM users WHERE username = ?1", RawUser::COLUMNS),
            rusqlite::params![username],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Claims ────────────────────────────────────────────────────────────────

  async fn next_claim_number(&self, category: String) -> Result<ClaimNumber> {
    let prefix = prefix_for(&category);
    let probe = prefix.clone();
    let last = self
      .conn
      .call(move |conn| Ok(last_issued(conn, &probe)?))
      .await?;
    Ok(ClaimNumber::after(prefix, last)?)
  }

  async fn create_claim(&self, input: NewClaim, created_by: i64) -> Result<Claim> {
    let prefix   = prefix_for(&input.category);
    let at_str   = encode_dt(Utc::now());
    let date_str = encode_date(input.date_published);
    let status   = input.status.as_str();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let number = match ClaimNumber::after(prefix.clone(), last_issued(&tx, &prefix)?) {
          Ok(n) => n,
          Err(e) => return Ok(Err(e)),
        };

        tx.execute(
          "INSERT INTO claims (
             claim_nb_tx, claim_title, description, published_url, category,
             status, created_by, created_at, date_published
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            number.to_string(),
            input.claim_title,
            input.description,
            input.published_url,
            input.category,
            status,
            created_by,
            at_str,
            date_str,
          ],
        )?;
        let id = tx.last_insert_rowid();

        tx.execute(
          "INSERT INTO claim_sequences (prefix, last_value) VALUES (?1, ?2)
           ON CONFLICT(prefix) DO UPDATE SET last_value = excluded.last_value",
          rusqlite::params![number.prefix(), number.sequence()],
        )?;

        let raw = inserted(select_claim(&tx, id)?)?;
        tx.commit()?;
        Ok(Ok((number, raw)))
      })
      .await?;

    let (number, raw) = outcome?;
    tracing::debug!(claim_nb_tx = %number, "assigned claim number");
    raw.into_claim()
  }

  async fn get_claim(&self, id: i64) -> Result<Option<Claim>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_claim(conn, id)?))
      .await?;
    raw.map(RawClaim::into_claim).transpose()
  }

  async fn list_claims<'a>(&'a self, query: &'a ClaimQuery) -> Result<Vec<Claim>> {
    // Every filter binds a text parameter; build WHERE clause dynamically.
    let mut conds: Vec<String> = vec![];
    let mut args: Vec<String> = vec![];

    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
      args.push(contains_pattern(search));
      let n = args.len();
      conds.push(format!(
        "(c.claim_nb_tx LIKE ?{n} ESCAPE '\\' OR c.claim_title LIKE ?{n} ESCAPE '\\')"
      ));
    }
    if let Some(category) = query.category.as_deref().filter(|s| !s.is_empty()) {
      args.push(category.to_owned());
      conds.push(format!("c.category = ?{}", args.len()));
    }
    if let Some(status) = query.status {
      args.push(status.as_str().to_owned());
      conds.push(format!("c.status = ?{}", args.len()));
    }
    if let Some(from) = query.date_from {
      args.push(encode_date(from));
      conds.push(format!("c.date_published >= ?{}", args.len()));
    }
    if let Some(to) = query.date_to {
      args.push(encode_date(to));
      conds.push(format!("c.date_published <= ?{}", args.len()));
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };
    let sql = format!(
      "{} {where_clause} ORDER BY c.created_at DESC, c.id DESC",
      RawClaim::SELECT
    );

    let raws: Vec<RawClaim> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(args.iter()), RawClaim::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawClaim::into_claim).collect()
  }

  async fn update_claim(&self, id: i64, update: ClaimUpdate) -> Result<Option<Claim>> {
    let at_str = encode_dt(Utc::now());
    let status = update.status.map(ClaimStatus::as_str);

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE claims
              SET description = COALESCE(?1, description),
                  comments    = COALESCE(?2, comments),
                  status      = COALESCE(?3, status),
                  updated_at  = ?4
            WHERE id = ?5",
          rusqlite::params![update.description, update.comments, status, at_str, id],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_claim(conn, id)?)
      })
      .await?;

    raw.map(RawClaim::into_claim).transpose()
  }

  async fn delete_claim(&self, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM validations WHERE claim_id = ?1", rusqlite::params![id])?;
        tx.execute("DELETE FROM rti_requests WHERE claim_id = ?1", rusqlite::params![id])?;
        let removed = tx.execute("DELETE FROM claims WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(removed > 0)
      })
      .await?;
    Ok(deleted)
  }

  async fn claim_stats(&self) -> Result<ClaimStats> {
    let (total, active, completed): (i64, i64, i64) = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*),
                  COALESCE(SUM(status != 'Closed'), 0),
                  COALESCE(SUM(status = 'Closed'), 0)
             FROM claims",
          [],
          |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?)
      })
      .await?;

    Ok(ClaimStats {
      total:     total.max(0) as u64,
      active:    active.max(0) as u64,
      completed: completed.max(0) as u64,
    })
  }

  // ── Validation reports ────────────────────────────────────────────────────

  async fn record_validation(&self, input: NewValidationReport) -> Result<ValidationReport> {
    let at_str = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO validations (
             claim_id, validator_id, status, notes,
             ai_generated_full_report, ai_generated_conclusion, created_at
           ) VALUES (?1, ?2, ?3, '', ?4, ?5, ?6)",
          rusqlite::params![
            input.claim_id,
            input.validator_id,
            REPORT_GENERATED,
            input.full_report,
            input.conclusion,
            at_str,
          ],
        )?;
        let id = tx.last_insert_rowid();
        tx.execute(
          "UPDATE claims SET status = ?1, updated_at = ?2 WHERE id = ?3",
          rusqlite::params![ClaimStatus::ValidationReportCreated.as_str(), at_str, input.claim_id],
        )?;
        let raw = inserted(select_validation(&tx, id)?)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_report()
  }

  async fn list_validations(&self, claim_id: i64) -> Result<Vec<ValidationReport>> {
    let raws: Vec<RawValidation> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{} WHERE v.claim_id = ?1 ORDER BY v.created_at DESC, v.id DESC",
          RawValidation::SELECT
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![claim_id], RawValidation::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawValidation::into_report).collect()
  }

  async fn get_validation(&self, claim_id: i64, report_id: i64) -> Result<Option<ValidationReport>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{} WHERE v.claim_id = ?1 AND v.id = ?2", RawValidation::SELECT),
            rusqlite::params![claim_id, report_id],
            RawValidation::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawValidation::into_report).transpose()
  }

  async fn delete_validation(&self, claim_id: i64, report_id: i64) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM validations WHERE claim_id = ?1 AND id = ?2",
          rusqlite::params![claim_id, report_id],
        )?)
      })
      .await?;
    Ok(removed > 0)
  }

  // ── RTI requests ──────────────────────────────────────────────────────────

  async fn record_rti_request(&self, input: NewRtiRequest) -> Result<RtiRequest> {
    let at_str = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO rti_requests (
             claim_id, validator_id, status, notes, ai_generated_rti_request, created_at
           ) VALUES (?1, ?2, ?3, '', ?4, ?5)",
          rusqlite::params![
            input.claim_id,
            input.validator_id,
            REQUEST_GENERATED,
            input.request_text,
            at_str,
          ],
        )?;
        let id = tx.last_insert_rowid();
        tx.execute(
          "UPDATE claims SET status = ?1, updated_at = ?2 WHERE id = ?3",
          rusqlite::params![ClaimStatus::RtiRequestCreated.as_str(), at_str, input.claim_id],
        )?;
        let raw = inserted(select_rti_request(&tx, id)?)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_request()
  }

  async fn list_rti_requests(&self, claim_id: i64) -> Result<Vec<RtiRequest>> {
    let raws: Vec<RawRtiRequest> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{} WHERE r.claim_id = ?1 ORDER BY r.created_at DESC, r.id DESC",
          RawRtiRequest::SELECT
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![claim_id], RawRtiRequest::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRtiRequest::into_request).collect()
  }

  async fn get_rti_request(&self, claim_id: i64, request_id: i64) -> Result<Option<RtiRequest>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{} WHERE r.claim_id = ?1 AND r.id = ?2", RawRtiRequest::SELECT),
            rusqlite::params![claim_id, request_id],
            RawRtiRequest::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawRtiRequest::into_request).transpose()
  }
}
