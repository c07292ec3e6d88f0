//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/register` | 201; 400 if the username is taken or a field is empty |
//! | `POST` | `/auth/login` | 401 on unknown user or wrong password |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use claimdesk_core::{account::Identity, completion::CompletionService, store::ClaimStore};
use serde::{Deserialize, Serialize};

use crate::{
  ApiState,
  auth::{hash_password, verify_password},
  error::ApiError,
  extract::ApiJson,
};

#[derive(Debug, Deserialize)]
pub struct Credentials {
  #[serde(default)]
  pub username: String,
  #[serde(default)]
  pub password: String,
}

/// Body returned by both register and login.
#[derive(Debug, Serialize)]
pub struct Session {
  pub message: &'static str,
  pub token:   String,
  pub user:    Identity,
}

/// Run argon2 work on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
  F: FnOnce() -> T + Send + 'static,
  T: Send + 'static,
{
  tokio::task::spawn_blocking(f)
    .await
    .map_err(|e| ApiError::Internal(format!("password task failed: {e}")))
}

// ─── Register ─────────────────────────────────────────────────────────────────

/// `POST /auth/register` with body `{"username":"alice","password":"pw123"}`
pub async fn register<S, C>(
  State(state): State<ApiState<S, C>>,
  ApiJson(body): ApiJson<Credentials>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let username = body.username.trim().to_owned();
  if username.is_empty() || body.password.is_empty() {
    return Err(ApiError::BadRequest("Username and password are required".into()));
  }

  let taken = || ApiError::Conflict("Username already exists".into());
  if state
    .store
    .find_user(username.clone())
    .await
    .map_err(ApiError::store)?
    .is_some()
  {
    return Err(taken());
  }

  let password = body.password;
  let password_hash = blocking(move || hash_password(&password)).await??;

  // A concurrent registration can still win between the check and the insert.
  let user = state
    .store
    .create_user(username, password_hash)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(taken)?;

  tracing::info!(user_id = user.id, username = %user.username, "registered user");
  let identity = user.identity();
  let token = state.tokens.issue(&identity)?;
  Ok((
    StatusCode::CREATED,
    Json(Session { message: "User registered successfully", token, user: identity }),
  ))
}

// ─── Login ────────────────────────────────────────────────────────────────────

/// `POST /auth/login` with body `{"username":"alice","password":"pw123"}`
pub async fn login<S, C>(
  State(state): State<ApiState<S, C>>,
  ApiJson(body): ApiJson<Credentials>,
) -> Result<Json<Session>, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let invalid = || ApiError::Unauthorized("Invalid credentials".into());

  let user = state
    .store
    .find_user(body.username.trim().to_owned())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      tracing::warn!(username = %body.username, "login for unknown user");
      invalid()
    })?;

  let password = body.password;
  let stored = user.password_hash.clone();
  if !blocking(move || verify_password(&password, &stored)).await? {
    tracing::warn!(username = %user.username, "login with wrong password");
    return Err(invalid());
  }

  let identity = user.identity();
  let token = state.tokens.issue(&identity)?;
  Ok(Json(Session { message: "Logged in successfully", token, user: identity }))
}
