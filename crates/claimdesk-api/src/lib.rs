//! JSON REST API for claimdesk.
//!
//! Exposes an axum [`Router`] backed by any [`ClaimStore`] and any
//! [`CompletionService`]. TLS, CORS, and static hosting are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", claimdesk_api::api_router(state))
//! ```
//!
//! Every route except `/auth/register` and `/auth/login` requires an
//! `Authorization: Bearer <token>` header.

pub mod accounts;
pub mod auth;
pub mod claims;
pub mod error;
pub mod extract;
pub mod rti;
pub mod validate;

use std::sync::Arc;

use axum::{
  Router,
  extract::FromRef,
  routing::{get, post},
};
use claimdesk_core::{completion::CompletionService, store::ClaimStore};

pub use auth::TokenIssuer;
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S, C> {
  pub store:      Arc<S>,
  pub completion: Arc<C>,
  pub tokens:     Arc<TokenIssuer>,
}

impl<S, C> Clone for ApiState<S, C> {
  fn clone(&self) -> Self {
    Self {
      store:      self.store.clone(),
      completion: self.completion.clone(),
      tokens:     self.tokens.clone(),
    }
  }
}

impl<S, C> FromRef<ApiState<S, C>> for Arc<TokenIssuer> {
  fn from_ref(state: &ApiState<S, C>) -> Self { state.tokens.clone() }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type. Unknown paths answer 404 with a JSON body.
pub fn api_router<S, C>(state: ApiState<S, C>) -> Router<()>
where
  S: ClaimStore + 'static,
  C: CompletionService + 'static,
{
  Router::new()
    // Accounts
    .route("/auth/register", post(accounts::register::<S, C>))
    .route("/auth/login", post(accounts::login::<S, C>))
    // Claims
    .route("/claims", get(claims::list::<S, C>).post(claims::create::<S, C>))
    .route("/claims/stats", get(claims::stats::<S, C>))
    .route(
      "/claims/{id}",
      get(claims::get_one::<S, C>)
        .put(claims::update::<S, C>)
        .delete(claims::delete::<S, C>),
    )
    .route("/claims/{id}/validations", get(claims::list_validations::<S, C>))
    .route(
      "/claims/{id}/validations/{report_id}",
      get(claims::get_validation::<S, C>).delete(claims::delete_validation::<S, C>),
    )
    .route("/claims/{id}/rti-requests", get(claims::list_rti_requests::<S, C>))
    // Validation workflow
    .route("/validate/start", post(validate::start::<S, C>))
    .route("/validate/chat", post(validate::chat::<S, C>))
    .route("/validate/generate-report", post(validate::generate_report::<S, C>))
    // RTI workflow
    .route("/rti", get(rti::list::<S, C>))
    .route("/rti/start", post(rti::start::<S, C>))
    .route("/rti/chat", post(rti::chat::<S, C>))
    .route("/rti/generate", post(rti::generate_draft::<S, C>))
    .route("/rti/generate-request", post(rti::generate_request::<S, C>))
    .route("/rti/{id}", get(rti::get_one::<S, C>))
    .fallback(not_found)
    .with_state(state)
}

async fn not_found() -> ApiError { ApiError::NotFound("API endpoint not found".into()) }
