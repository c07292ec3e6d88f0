//! HTTP host for claimdesk.
//!
//! Wraps the JSON API from `claimdesk-api` with a health probe, CORS for the
//! browser client, optional hosting of the built client, and request
//! tracing.

use std::{path::PathBuf, time::Duration};

use anyhow::{Context as _, bail};
use axum::{
  Json, Router,
  http::{HeaderValue, Method, header},
  routing::get,
};
use claimdesk_api::{ApiState, api_router};
use claimdesk_core::{completion::CompletionService, store::ClaimStore};
use claimdesk_llm::LlmConfig;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::{
  cors::{AllowOrigin, CorsLayer},
  services::{ServeDir, ServeFile},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CLAIMDESK_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub database_path:    PathBuf,
  pub jwt_secret:       String,
  pub token_ttl_hours:  i64,
  pub llm_base_url:     String,
  pub llm_api_key:      String,
  pub llm_model:        String,
  pub llm_timeout_secs: u64,
  pub cors_origins:     Vec<String>,
  /// Directory holding the built browser client, if it should be served.
  pub static_dir:       Option<PathBuf>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "0.0.0.0".into(),
      port:             3000,
      database_path:    PathBuf::from("db/claimdesk.sqlite"),
      jwt_secret:       String::new(),
      token_ttl_hours:  24,
      llm_base_url:     "https://api.openai.com/v1".into(),
      llm_api_key:      String::new(),
      llm_model:        "gpt-4".into(),
      llm_timeout_secs: 120,
      cors_origins:     vec!["http://localhost:5173".into()],
      static_dir:       None,
    }
  }
}

impl ServerConfig {
  /// Reject configurations the server cannot start with.
  pub fn validate(&self) -> anyhow::Result<()> {
    if self.jwt_secret.trim().is_empty() {
      bail!("jwt_secret must be set (CLAIMDESK_JWT_SECRET)");
    }
    if self.llm_api_key.trim().is_empty() {
      bail!("llm_api_key must be set (CLAIMDESK_LLM_API_KEY)");
    }
    if self.token_ttl_hours <= 0 {
      bail!("token_ttl_hours must be positive, got {}", self.token_ttl_hours);
    }
    Ok(())
  }

  pub fn token_ttl(&self) -> chrono::Duration { chrono::Duration::hours(self.token_ttl_hours) }

  pub fn llm_config(&self) -> LlmConfig {
    LlmConfig {
      base_url: self.llm_base_url.clone(),
      api_key:  self.llm_api_key.clone(),
      model:    self.llm_model.clone(),
      timeout:  Duration::from_secs(self.llm_timeout_secs),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application: `/health`, the API under `/api`, and the
/// static client (if configured) for everything else.
pub fn app<S, C>(state: ApiState<S, C>, config: &ServerConfig) -> anyhow::Result<Router>
where
  S: ClaimStore + 'static,
  C: CompletionService + 'static,
{
  let mut router = Router::new()
    .route("/health", get(health))
    .nest("/api", api_router(state));

  if let Some(dir) = &config.static_dir {
    let index = ServeFile::new(dir.join("index.html"));
    router = router.fallback_service(ServeDir::new(dir).fallback(index));
  }

  Ok(
    router
      .layer(cors_layer(&config.cors_origins)?)
      .layer(TraceLayer::new_for_http()),
  )
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
  let origins = origins
    .iter()
    .map(|o| HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin {o:?}")))
    .collect::<anyhow::Result<Vec<_>>>()?;

  Ok(
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(origins))
      .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
      .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
      .allow_credentials(true),
  )
}
