//! Handlers for the Right to Information flow under `/rti`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/rti/start` | Claim fields + `claim_id` → `{response}` |
//! | `POST` | `/rti/chat` | `{message, claim_id, messages}` → `{response}` |
//! | `POST` | `/rti/generate` | Claim fields → `{rtiRequest}`; nothing stored |
//! | `POST` | `/rti/generate-request` | `{claim_id, messages}` → stored request |
//! | `GET`  | `/rti?claimId=` | Requests for a claim, newest first |
//! | `GET`  | `/rti/:id?claimId=` | 404 unless the request belongs to the claim |

use axum::{Json, extract::State};
use claimdesk_core::{
  completion::{ChatMessage, CompletionRequest, CompletionService},
  prompt::{self, ClaimBrief},
  report::{NewRtiRequest, RtiRequest},
  store::ClaimStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  ApiState,
  auth::AuthUser,
  error::ApiError,
  extract::{ApiJson, ApiPath, ApiQuery, optional_id},
  validate::{
    ChatBody, GenerateBody, LONG_FORM_MAX_TOKENS, Reply, TEMPERATURE, chat_messages, complete,
    load_claim, require_claim_id,
  },
};

#[derive(Debug, Deserialize)]
pub struct StartBody {
  #[serde(default, deserialize_with = "optional_id")]
  pub claim_id: Option<i64>,
  #[serde(flatten)]
  pub brief:    ClaimBrief,
}

#[derive(Debug, Deserialize)]
pub struct ClaimParam {
  #[serde(rename = "claimId", default, deserialize_with = "optional_id")]
  pub claim_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
  pub rti_request: String,
}

// ─── Conversation ─────────────────────────────────────────────────────────────

/// `POST /rti/start`
pub async fn start<S, C>(
  State(state): State<ApiState<S, C>>,
  _user: AuthUser,
  ApiJson(body): ApiJson<StartBody>,
) -> Result<Json<Reply>, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let claim_id = require_claim_id(body.claim_id)?;
  let validations = state
    .store
    .list_validations(claim_id)
    .await
    .map_err(ApiError::store)?;
  let latest = validations.first();
  tracing::debug!(claim_id, has_validation = latest.is_some(), "starting RTI conversation");

  let text = prompt::rti_start(&body.brief, latest);
  tracing::debug!(prompt = %text, "RTI start prompt");
  let response = complete(
    state.completion.as_ref(),
    CompletionRequest::new(vec![ChatMessage::user(text)]),
  )
  .await?;
  Ok(Json(Reply { response }))
}

/// `POST /rti/chat`
pub async fn chat<S, C>(
  State(state): State<ApiState<S, C>>,
  _user: AuthUser,
  ApiJson(body): ApiJson<ChatBody>,
) -> Result<Json<Reply>, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let claim_id = require_claim_id(body.claim_id)?;
  let claim = load_claim(state.store.as_ref(), claim_id).await?;

  let messages = chat_messages(prompt::rti_chat_system(&claim), body)?;
  let response = complete(state.completion.as_ref(), CompletionRequest::new(messages)).await?;
  Ok(Json(Reply { response }))
}

// ─── Generation ───────────────────────────────────────────────────────────────

/// `POST /rti/generate`
pub async fn generate_draft<S, C>(
  State(state): State<ApiState<S, C>>,
  _user: AuthUser,
  ApiJson(brief): ApiJson<ClaimBrief>,
) -> Result<Json<Draft>, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let text = prompt::rti_draft(&brief);
  let rti_request = complete(
    state.completion.as_ref(),
    CompletionRequest::new(vec![ChatMessage::user(text)]),
  )
  .await?;
  Ok(Json(Draft { rti_request }))
}

/// `POST /rti/generate-request`
///
/// The completion runs before anything is written; the request row and the
/// claim's new status are then stored together.
pub async fn generate_request<S, C>(
  State(state): State<ApiState<S, C>>,
  AuthUser(user): AuthUser,
  ApiJson(body): ApiJson<GenerateBody>,
) -> Result<Json<RtiRequest>, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let claim_id = require_claim_id(body.claim_id)?;
  let claim = load_claim(state.store.as_ref(), claim_id).await?;
  let validations = state
    .store
    .list_validations(claim_id)
    .await
    .map_err(ApiError::store)?;

  let text = prompt::rti_request(&claim, validations.first(), &body.messages);
  tracing::debug!(claim_id, prompt = %text, "RTI request prompt");
  let request_text = complete(
    state.completion.as_ref(),
    CompletionRequest::new(vec![
      ChatMessage::system(prompt::REQUEST_PERSONA),
      ChatMessage::user(text),
    ])
    .max_tokens(LONG_FORM_MAX_TOKENS)
    .temperature(TEMPERATURE),
  )
  .await?;

  let request = state
    .store
    .record_rti_request(NewRtiRequest {
      claim_id,
      validator_id: user.user_id,
      request_text,
    })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(
    claim_id,
    request_id = request.id,
    validator = %user.username,
    "generated RTI request"
  );
  Ok(Json(request))
}

// ─── Lookup ───────────────────────────────────────────────────────────────────

/// `GET /rti?claimId=<id>`
pub async fn list<S, C>(
  State(state): State<ApiState<S, C>>,
  _user: AuthUser,
  ApiQuery(param): ApiQuery<ClaimParam>,
) -> Result<Json<Vec<RtiRequest>>, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let claim_id = require_claim_id(param.claim_id)?;
  let requests = state
    .store
    .list_rti_requests(claim_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(requests))
}

/// `GET /rti/:id?claimId=<id>`
pub async fn get_one<S, C>(
  State(state): State<ApiState<S, C>>,
  _user: AuthUser,
  ApiPath(id): ApiPath<i64>,
  ApiQuery(param): ApiQuery<ClaimParam>,
) -> Result<Json<RtiRequest>, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let claim_id = require_claim_id(param.claim_id)?;
  let request = state
    .store
    .get_rti_request(claim_id, id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("RTI request not found".into()))?;
  Ok(Json(request))
}
