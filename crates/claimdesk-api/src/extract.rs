//! JSON body and query-string extractors whose rejections keep the
//! `{"error": ...}` shape.

use axum::{
  Json,
  extract::{FromRequest, FromRequestParts, Path, Query, Request},
  http::request::Parts,
};
use serde::{Deserialize, Deserializer, de::{self, DeserializeOwned}};

use crate::error::ApiError;

/// [`axum::Json`] with an [`ApiError::BadRequest`] rejection.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = Json::<T>::from_request(req, state)
      .await
      .map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(Self(value))
  }
}

/// [`axum::extract::Query`] with an [`ApiError::BadRequest`] rejection.
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let Query(value) = Query::<T>::from_request_parts(parts, state)
      .await
      .map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(Self(value))
  }
}

/// [`axum::extract::Path`] with an [`ApiError::BadRequest`] rejection.
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
  T: DeserializeOwned + Send,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let Path(value) = Path::<T>::from_request_parts(parts, state)
      .await
      .map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(Self(value))
  }
}

// ─── Ids ──────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
  Int(i64),
  Text(String),
}

/// Deserialize an optional record id sent either as a JSON number or as a
/// numeric string. Blank strings count as absent.
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<IdRepr>::deserialize(deserializer)? {
    None => Ok(None),
    Some(IdRepr::Int(id)) => Ok(Some(id)),
    Some(IdRepr::Text(s)) if s.trim().is_empty() => Ok(None),
    Some(IdRepr::Text(s)) => s
      .trim()
      .parse()
      .map(Some)
      .map_err(|_| de::Error::custom(format!("invalid id {s:?}"))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Deserialize)]
  struct Body {
    #[serde(default, deserialize_with = "optional_id")]
    claim_id: Option<i64>,
  }

  fn parse(json: &str) -> Result<Option<i64>, serde_json::Error> {
    serde_json::from_str::<Body>(json).map(|b| b.claim_id)
  }

  #[test]
  fn ids_accept_numbers_and_numeric_strings() {
    assert_eq!(parse(r#"{"claim_id": 5}"#).unwrap(), Some(5));
    assert_eq!(parse(r#"{"claim_id": "12"}"#).unwrap(), Some(12));
    assert_eq!(parse(r#"{"claim_id": ""}"#).unwrap(), None);
    assert_eq!(parse(r#"{"claim_id": null}"#).unwrap(), None);
    assert_eq!(parse("{}").unwrap(), None);
    assert!(parse(r#"{"claim_id": "abc"}"#).is_err());
  }
}
