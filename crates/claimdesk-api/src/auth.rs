//! Bearer-token authentication and password hashing.
//!
//! Tokens are HS256 JWTs carrying the caller's [`Identity`]. A request with
//! no usable `Authorization: Bearer` header is rejected with 401; a token that
//! fails verification (bad signature, expired, malformed) with 403.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::{FromRef, FromRequestParts},
  http::{HeaderMap, header, request::Parts},
};
use chrono::{Duration, Utc};
use claimdesk_core::account::Identity;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ─── Tokens ───────────────────────────────────────────────────────────────────

/// JWT payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
  /// User id, as a string.
  pub sub:      String,
  #[serde(rename = "userId")]
  pub user_id:  i64,
  pub username: String,
  pub iat:      i64,
  pub exp:      i64,
}

/// Signs and verifies session tokens with a shared secret.
pub struct TokenIssuer {
  encoding:   EncodingKey,
  decoding:   DecodingKey,
  validation: Validation,
  ttl:        Duration,
}

impl TokenIssuer {
  pub fn new(secret: &[u8], ttl: Duration) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      validation: Validation::default(),
      ttl,
    }
  }

  /// Sign a token for `identity`, valid for the configured lifetime.
  pub fn issue(&self, identity: &Identity) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = TokenClaims {
      sub:      identity.user_id.to_string(),
      user_id:  identity.user_id,
      username: identity.username.clone(),
      iat:      now.timestamp(),
      exp:      (now + self.ttl).timestamp(),
    };
    encode(&Header::default(), &claims, &self.encoding)
      .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
  }

  /// Check signature and expiry and recover the identity.
  pub fn verify(&self, token: &str) -> Result<Identity, ApiError> {
    let data = decode::<TokenClaims>(token, &self.decoding, &self.validation).map_err(|e| {
      tracing::warn!(error = %e, "rejected bearer token");
      ApiError::Forbidden("Invalid token".into())
    })?;
    Ok(Identity {
      user_id:  data.claims.user_id,
      username: data.claims.username,
    })
  }
}

// ─── Passwords ────────────────────────────────────────────────────────────────

/// Hash `password` into an argon2 PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}

/// `true` if `password` matches the stored PHC string.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(password_hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Extractor ────────────────────────────────────────────────────────────────

/// The authenticated caller. Present in a handler's arguments means the
/// request carried a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
}

impl<S> FromRequestParts<S> for AuthUser
where
  Arc<TokenIssuer>: FromRef<S>,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers).ok_or_else(|| {
      tracing::warn!(path = %parts.uri.path(), "request without bearer token");
      ApiError::Unauthorized("Access token required".into())
    })?;
    let tokens = Arc::<TokenIssuer>::from_ref(state);
    tokens.verify(token).map(AuthUser)
  }
}

#[cfg(test)]
mod tests {
  use axum::http::Request;

  use super::*;

  fn alice() -> Identity {
    Identity { user_id: 7, username: "alice".into() }
  }

  fn issuer() -> Arc<TokenIssuer> {
    Arc::new(TokenIssuer::new(b"test-secret", Duration::hours(24)))
  }

  async fn extract(auth: Option<&str>, tokens: &Arc<TokenIssuer>) -> Result<AuthUser, ApiError> {
    let mut builder = Request::builder().uri("/api/claims");
    if let Some(value) = auth {
      builder = builder.header(header::AUTHORIZATION, value);
    }
    let (mut parts, _) = builder.body(()).unwrap().into_parts();
    AuthUser::from_request_parts(&mut parts, tokens).await
  }

  #[test]
  fn issued_token_verifies() {
    let tokens = issuer();
    let token = tokens.issue(&alice()).unwrap();
    assert_eq!(token.split('.').count(), 3);
    assert_eq!(tokens.verify(&token).unwrap(), alice());
  }

  #[test]
  fn token_payload_names_user() {
    let tokens = issuer();
    let token = tokens.issue(&alice()).unwrap();
    let data = decode::<TokenClaims>(&token, &tokens.decoding, &tokens.validation).unwrap();
    assert_eq!(data.claims.sub, "7");
    assert_eq!(data.claims.username, "alice");
    assert_eq!(data.claims.exp - data.claims.iat, 24 * 3600);
  }

  #[test]
  fn foreign_or_expired_tokens_are_forbidden() {
    let tokens = issuer();
    let other = TokenIssuer::new(b"other-secret", Duration::hours(24));
    let foreign = other.issue(&alice()).unwrap();
    assert!(matches!(tokens.verify(&foreign), Err(ApiError::Forbidden(_))));

    let stale = TokenIssuer::new(b"test-secret", Duration::hours(-2));
    let expired = stale.issue(&alice()).unwrap();
    assert!(matches!(tokens.verify(&expired), Err(ApiError::Forbidden(_))));

    assert!(matches!(tokens.verify("not-a-jwt"), Err(ApiError::Forbidden(_))));
  }

  #[test]
  fn password_hash_round_trip() {
    let hash = hash_password("pw123").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("pw123", &hash));
    assert!(!verify_password("wrong", &hash));
    assert!(!verify_password("pw123", "not-a-phc-string"));
  }

  #[tokio::test]
  async fn extractor_accepts_bearer_token() {
    let tokens = issuer();
    let header = format!("Bearer {}", tokens.issue(&alice()).unwrap());
    let AuthUser(identity) = extract(Some(&header), &tokens).await.unwrap();
    assert_eq!(identity, alice());
  }

  #[tokio::test]
  async fn extractor_distinguishes_missing_from_invalid() {
    let tokens = issuer();
    assert!(matches!(extract(None, &tokens).await, Err(ApiError::Unauthorized(_))));
    assert!(matches!(
      extract(Some("Basic dXNlcjpwdw=="), &tokens).await,
      Err(ApiError::Unauthorized(_))
    ));
    assert!(matches!(extract(Some("Bearer "), &tokens).await, Err(ApiError::Unauthorized(_))));
    assert!(matches!(
      extract(Some("Bearer garbage"), &tokens).await,
      Err(ApiError::Forbidden(_))
    ));
  }
}
