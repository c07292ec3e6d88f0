//! Handlers for `/claims` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/claims` | `?search&category&status&dateFrom&dateTo`, newest first |
//! | `POST`   | `/claims` | 201; number assigned from the category |
//! | `GET`    | `/claims/stats` | `{total, active, completed}` |
//! | `GET`    | `/claims/:id` | 404 if not found |
//! | `PUT`    | `/claims/:id` | Partial `{description?, comments?, status?}` |
//! | `DELETE` | `/claims/:id` | Cascades to reports and RTI requests |
//! | `GET`    | `/claims/:id/validations` | Newest first |
//! | `GET`    | `/claims/:id/validations/:report_id` | |
//! | `DELETE` | `/claims/:id/validations/:report_id` | |
//! | `GET`    | `/claims/:id/rti-requests` | Newest first |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, NaiveDate, Utc};
use claimdesk_core::{
  claim::{Claim, ClaimQuery, ClaimStats, ClaimStatus, ClaimUpdate, NewClaim},
  completion::CompletionService,
  report::{RtiRequest, ValidationReport},
  store::ClaimStore,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  ApiState,
  auth::AuthUser,
  error::ApiError,
  extract::{ApiJson, ApiPath, ApiQuery},
};

/// Accept `YYYY-MM-DD` or a full RFC 3339 timestamp (its UTC date is used).
pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
  NaiveDate::parse_from_str(value, "%Y-%m-%d")
    .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc).date_naive()))
    .map_err(|_| ApiError::BadRequest(format!("{field} must be a date (YYYY-MM-DD), got {value:?}")))
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

fn claim_not_found(id: i64) -> ApiError { ApiError::NotFound(format!("Claim {id} not found")) }

// ─── List ─────────────────────────────────────────────────────────────────────

/// Query string of `GET /claims`. Blank values are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub search:    Option<String>,
  pub category:  Option<String>,
  pub status:    Option<String>,
  pub date_from: Option<String>,
  pub date_to:   Option<String>,
}

impl ListParams {
  fn into_query(self) -> Result<ClaimQuery, ApiError> {
    let status = non_empty(self.status)
      .map(|s| {
        s.parse::<ClaimStatus>()
          .map_err(|_| ApiError::BadRequest(format!("unknown status {s:?}")))
      })
      .transpose()?;
    let date_from = non_empty(self.date_from)
      .map(|d| parse_date("dateFrom", &d))
      .transpose()?;
    let date_to = non_empty(self.date_to)
      .map(|d| parse_date("dateTo", &d))
      .transpose()?;

    Ok(ClaimQuery {
      search: non_empty(self.search),
      category: non_empty(self.category),
      status,
      date_from,
      date_to,
    })
  }
}

/// `GET /claims`
pub async fn list<S, C>(
  State(state): State<ApiState<S, C>>,
  _user: AuthUser,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<Claim>>, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let query = params.into_query()?;
  let claims = state
    .store
    .list_claims(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(claims))
}

/// `GET /claims/stats`
pub async fn stats<S, C>(
  State(state): State<ApiState<S, C>>,
  _user: AuthUser,
) -> Result<Json<ClaimStats>, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let stats = state.store.claim_stats().await.map_err(ApiError::store)?;
  Ok(Json(stats))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(default)]
  pub claim_title:    String,
  #[serde(default)]
  pub description:    String,
  #[serde(default)]
  pub published_url:  String,
  #[serde(default)]
  pub category:       String,
  /// Defaults to `Opened`.
  #[serde(default)]
  pub status:         Option<ClaimStatus>,
  /// Defaults to today (UTC).
  #[serde(default)]
  pub date_published: Option<String>,
}

/// `POST /claims`
pub async fn create<S, C>(
  State(state): State<ApiState<S, C>>,
  AuthUser(user): AuthUser,
  ApiJson(body): ApiJson<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let claim_title = body.claim_title.trim().to_owned();
  if claim_title.is_empty() {
    return Err(ApiError::BadRequest("claim_title is required".into()));
  }
  let date_published = match non_empty(body.date_published) {
    Some(d) => parse_date("date_published", &d)?,
    None => Utc::now().date_naive(),
  };

  let input = NewClaim {
    claim_title,
    description: body.description,
    published_url: body.published_url,
    category: body.category,
    status: body.status.unwrap_or_default(),
    date_published,
  };
  let claim = state
    .store
    .create_claim(input, user.user_id)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(
    claim_id = claim.id,
    claim_nb_tx = %claim.claim_nb_tx,
    created_by = %user.username,
    "created claim"
  );
  Ok((StatusCode::CREATED, Json(claim)))
}

// ─── Get / update / delete ────────────────────────────────────────────────────

/// `GET /claims/:id`
pub async fn get_one<S, C>(
  State(state): State<ApiState<S, C>>,
  _user: AuthUser,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Claim>, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let claim = state
    .store
    .get_claim(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| claim_not_found(id))?;
  Ok(Json(claim))
}

/// `PUT /claims/:id` with body `{"status":"Closed"}`
pub async fn update<S, C>(
  State(state): State<ApiState<S, C>>,
  AuthUser(user): AuthUser,
  ApiPath(id): ApiPath<i64>,
  ApiJson(update): ApiJson<ClaimUpdate>,
) -> Result<Json<Claim>, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let claim = state
    .store
    .update_claim(id, update)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| claim_not_found(id))?;
  tracing::info!(claim_id = id, status = %claim.status, by = %user.username, "updated claim");
  Ok(Json(claim))
}

/// `DELETE /claims/:id`
pub async fn delete<S, C>(
  State(state): State<ApiState<S, C>>,
  AuthUser(user): AuthUser,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  if !state.store.delete_claim(id).await.map_err(ApiError::store)? {
    return Err(claim_not_found(id));
  }
  tracing::info!(claim_id = id, by = %user.username, "deleted claim");
  Ok(Json(json!({ "message": "Claim deleted successfully" })))
}

// ─── Validation reports ───────────────────────────────────────────────────────

/// `GET /claims/:id/validations`
pub async fn list_validations<S, C>(
  State(state): State<ApiState<S, C>>,
  _user: AuthUser,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<ValidationReport>>, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let reports = state
    .store
    .list_validations(id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(reports))
}

/// `GET /claims/:id/validations/:report_id`
pub async fn get_validation<S, C>(
  State(state): State<ApiState<S, C>>,
  _user: AuthUser,
  ApiPath((id, report_id)): ApiPath<(i64, i64)>,
) -> Result<Json<ValidationReport>, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let report = state
    .store
    .get_validation(id, report_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Validation report not found".into()))?;
  Ok(Json(report))
}

/// `DELETE /claims/:id/validations/:report_id`
pub async fn delete_validation<S, C>(
  State(state): State<ApiState<S, C>>,
  AuthUser(user): AuthUser,
  ApiPath((id, report_id)): ApiPath<(i64, i64)>,
) -> Result<Json<Value>, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let removed = state
    .store
    .delete_validation(id, report_id)
    .await
    .map_err(ApiError::store)?;
  if !removed {
    return Err(ApiError::NotFound("Validation report not found".into()));
  }
  tracing::info!(claim_id = id, report_id, by = %user.username, "deleted validation report");
  Ok(Json(json!({ "message": "Validation report deleted successfully" })))
}

// ─── RTI requests ─────────────────────────────────────────────────────────────

/// `GET /claims/:id/rti-requests`
pub async fn list_rti_requests<S, C>(
  State(state): State<ApiState<S, C>>,
  _user: AuthUser,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<RtiRequest>>, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let requests = state
    .store
    .list_rti_requests(id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(requests))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_accept_plain_and_timestamp_forms() {
    let expected = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    assert_eq!(parse_date("d", "2024-01-01").unwrap(), expected);
    assert_eq!(parse_date("d", "2024-01-01T10:30:00.000Z").unwrap(), expected);
    assert!(matches!(parse_date("d", "01/01/2024"), Err(ApiError::BadRequest(_))));
  }

  #[test]
  fn blank_list_params_are_ignored() {
    let params = ListParams {
      search:    Some("  ".into()),
      category:  Some(String::new()),
      status:    Some(String::new()),
      date_from: None,
      date_to:   Some(String::new()),
    };
    let query = params.into_query().unwrap();
    assert!(query.search.is_none());
    assert!(query.category.is_none());
    assert!(query.status.is_none());
    assert!(query.date_to.is_none());
  }

  #[test]
  fn list_params_parse_status_and_dates() {
    let params = ListParams {
      status: Some("RTI Request Created".into()),
      date_from: Some("2024-02-01".into()),
      ..Default::default()
    };
    let query = params.into_query().unwrap();
    assert_eq!(query.status, Some(ClaimStatus::RtiRequestCreated));
    assert_eq!(query.date_from, NaiveDate::from_ymd_opt(2024, 2, 1));

    let bad = ListParams { status: Some("Archived".into()), ..Default::default() };
    assert!(matches!(bad.into_query(), Err(ApiError::BadRequest(_))));
  }
}
