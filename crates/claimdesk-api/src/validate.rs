//! Handlers for the validation conversation under `/validate`.
//!
//! The conversation is stateless: the client resends the full history on
//! every turn. Only `generate-report` writes anything.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/validate/start` | Claim fields → `{response}` |
//! | `POST` | `/validate/chat` | `{message, claim_id, messages}` → `{response}` |
//! | `POST` | `/validate/generate-report` | `{claim_id, messages}` → `{report, conclusion, validation}` |

use axum::{Json, extract::State};
use claimdesk_core::{
  claim::Claim,
  completion::{ChatMessage, CompletionRequest, CompletionService},
  prompt::{self, ClaimBrief},
  report::{NewValidationReport, ValidationReport},
  store::ClaimStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  ApiState,
  auth::AuthUser,
  error::ApiError,
  extract::{ApiJson, optional_id},
};

pub(crate) const TEMPERATURE: f32 = 0.7;
pub(crate) const LONG_FORM_MAX_TOKENS: u32 = 2000;
const CONCLUSION_MAX_TOKENS: u32 = 200;

// ─── Shared request/response shapes ───────────────────────────────────────────

/// A chat turn: the new user message plus everything said so far.
#[derive(Debug, Deserialize)]
pub struct ChatBody {
  #[serde(default)]
  pub message:  String,
  #[serde(default, deserialize_with = "optional_id")]
  pub claim_id: Option<i64>,
  #[serde(default)]
  pub messages: Vec<ChatMessage>,
}

/// Body of the generate-report and generate-request calls.
#[derive(Debug, Deserialize)]
pub struct GenerateBody {
  #[serde(default, deserialize_with = "optional_id")]
  pub claim_id: Option<i64>,
  #[serde(default)]
  pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct Reply {
  pub response: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratedReport {
  pub report:     String,
  pub conclusion: String,
  pub validation: ValidationReport,
}

pub(crate) fn require_claim_id(claim_id: Option<i64>) -> Result<i64, ApiError> {
  claim_id.ok_or_else(|| ApiError::BadRequest("Claim ID is required".into()))
}

pub(crate) async fn load_claim<S: ClaimStore>(store: &S, id: i64) -> Result<Claim, ApiError> {
  store
    .get_claim(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Claim not found".into()))
}

pub(crate) async fn complete<C: CompletionService>(
  completion: &C,
  request: CompletionRequest,
) -> Result<String, ApiError> {
  completion.complete(request).await.map_err(ApiError::upstream)
}

/// `[system, ...history, user(message)]`
pub(crate) fn chat_messages(system: String, body: ChatBody) -> Result<Vec<ChatMessage>, ApiError> {
  if body.message.trim().is_empty() {
    return Err(ApiError::BadRequest("message is required".into()));
  }
  let mut messages = Vec::with_capacity(body.messages.len() + 2);
  messages.push(ChatMessage::system(system));
  messages.extend(body.messages);
  messages.push(ChatMessage::user(body.message));
  Ok(messages)
}

// ─── Start ────────────────────────────────────────────────────────────────────

/// `POST /validate/start`
pub async fn start<S, C>(
  State(state): State<ApiState<S, C>>,
  _user: AuthUser,
  ApiJson(brief): ApiJson<ClaimBrief>,
) -> Result<Json<Reply>, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let text = prompt::validation_start(&brief);
  tracing::debug!(prompt = %text, "validation start prompt");

  let request = CompletionRequest::new(vec![ChatMessage::user(text)]).temperature(TEMPERATURE);
  let response = complete(state.completion.as_ref(), request).await?;
  Ok(Json(Reply { response }))
}

// ─── Chat ─────────────────────────────────────────────────────────────────────

/// `POST /validate/chat`
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

  let messages = chat_messages(prompt::validation_chat_system(&claim), body)?;
  let request = CompletionRequest::new(messages).temperature(TEMPERATURE);
  let response = complete(state.completion.as_ref(), request).await?;
  Ok(Json(Reply { response }))
}

// ─── Generate report ──────────────────────────────────────────────────────────

/// `POST /validate/generate-report`
///
/// Both completions run before anything is written; the report row and the
/// claim's new status are then stored together.
pub async fn generate_report<S, C>(
  State(state): State<ApiState<S, C>>,
  AuthUser(user): AuthUser,
  ApiJson(body): ApiJson<GenerateBody>,
) -> Result<Json<GeneratedReport>, ApiError>
where
  S: ClaimStore,
  C: CompletionService,
{
  let claim_id = require_claim_id(body.claim_id)?;
  let claim = load_claim(state.store.as_ref(), claim_id).await?;
  let previous = state
    .store
    .list_validations(claim_id)
    .await
    .map_err(ApiError::store)?;

  let text = prompt::validation_report(&claim, &body.messages, &previous);
  tracing::debug!(claim_id, prompt = %text, "validation report prompt");
  let report = complete(
    state.completion.as_ref(),
    CompletionRequest::new(vec![
      ChatMessage::system(prompt::REPORT_PERSONA),
      ChatMessage::user(text),
    ])
    .max_tokens(LONG_FORM_MAX_TOKENS)
    .temperature(TEMPERATURE),
  )
  .await?;

  let conclusion = complete(
    state.completion.as_ref(),
    CompletionRequest::new(vec![
      ChatMessage::system(prompt::CONCLUSION_PERSONA),
      ChatMessage::user(prompt::conclusion(&report)),
    ])
    .max_tokens(CONCLUSION_MAX_TOKENS)
    .temperature(TEMPERATURE),
  )
  .await?;

  let validation = state
    .store
    .record_validation(NewValidationReport {
      claim_id,
      validator_id: user.user_id,
      full_report: report.clone(),
      conclusion: conclusion.clone(),
    })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(
    claim_id,
    report_id = validation.id,
    validator = %user.username,
    "generated validation report"
  );
  Ok(Json(GeneratedReport { report, conclusion, validation }))
}
