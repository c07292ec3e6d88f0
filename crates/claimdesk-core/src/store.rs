//! The `ClaimStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `claimdesk-store-sqlite`). The API layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  account::User,
  claim::{Claim, ClaimQuery, ClaimStats, ClaimUpdate, NewClaim},
  number::ClaimNumber,
  report::{NewRtiRequest, NewValidationReport, RtiRequest, ValidationReport},
};

/// Abstraction over the relational store holding users, claims, validation
/// reports and RTI requests.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ClaimStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Returns `None` if the username is already taken.
  fn create_user(
    &self,
    username: String,
    password_hash: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look a user up by username.
  fn find_user(
    &self,
    username: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Claims ────────────────────────────────────────────────────────────

  /// The number the next claim in `category` would receive. A pure read:
  /// calling it twice without an intervening insert yields the same value.
  fn next_claim_number(
    &self,
    category: String,
  ) -> impl Future<Output = Result<ClaimNumber, Self::Error>> + Send + '_;

  /// Assign the next claim number for the claim's category and insert it,
  /// atomically. Returns the stored claim view.
  fn create_claim(
    &self,
    input: NewClaim,
    created_by: i64,
  ) -> impl Future<Output = Result<Claim, Self::Error>> + Send + '_;

  /// Retrieve a claim by id. Returns `None` if not found.
  fn get_claim(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Claim>, Self::Error>> + Send + '_;

  /// Claims matching `query`, newest first.
  fn list_claims<'a>(
    &'a self,
    query: &'a ClaimQuery,
  ) -> impl Future<Output = Result<Vec<Claim>, Self::Error>> + Send + 'a;

  /// Apply a partial update and stamp `updated_at`. Returns `None` if the
  /// claim does not exist.
  fn update_claim(
    &self,
    id: i64,
    update: ClaimUpdate,
  ) -> impl Future<Output = Result<Option<Claim>, Self::Error>> + Send + '_;

  /// Delete a claim together with its validation reports and RTI requests.
  /// Returns `false` if the claim did not exist.
  fn delete_claim(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn claim_stats(&self) -> impl Future<Output = Result<ClaimStats, Self::Error>> + Send + '_;

  // ── Validation reports ────────────────────────────────────────────────

  /// Insert a generated report and set the claim's status to
  /// `Validation Report Created`, in one transaction.
  fn record_validation(
    &self,
    input: NewValidationReport,
  ) -> impl Future<Output = Result<ValidationReport, Self::Error>> + Send + '_;

  /// Reports for a claim, newest first.
  fn list_validations(
    &self,
    claim_id: i64,
  ) -> impl Future<Output = Result<Vec<ValidationReport>, Self::Error>> + Send + '_;

  fn get_validation(
    &self,
    claim_id: i64,
    report_id: i64,
  ) -> impl Future<Output = Result<Option<ValidationReport>, Self::Error>> + Send + '_;

  /// Returns `false` if no such report exists for the claim.
  fn delete_validation(
    &self,
    claim_id: i64,
    report_id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── RTI requests ──────────────────────────────────────────────────────

  /// Insert a generated request and set the claim's status to
  /// `RTI Request Created`, in one transaction.
  fn record_rti_request(
    &self,
    input: NewRtiRequest,
  ) -> impl Future<Output = Result<RtiRequest, Self::Error>> + Send + '_;

  /// Requests for a claim, newest first.
  fn list_rti_requests(
    &self,
    claim_id: i64,
  ) -> impl Future<Output = Result<Vec<RtiRequest>, Self::Error>> + Send + '_;

  fn get_rti_request(
    &self,
    claim_id: i64,
    request_id: i64,
  ) -> impl Future<Output = Result<Option<RtiRequest>, Self::Error>> + Send + '_;
}
