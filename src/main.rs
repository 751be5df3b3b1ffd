//! QuizForge · Quiz Generation Backend
//!
//! - Axum HTTP API
//! - OpenAI integration (via environment variables)
//! - Static marketing/privacy page (./static/index.html)
//!
//! Important env variables:
//!   PORT          : u16 (default 3000)
//!   OPENAI_API_KEY    : enables OpenAI integration if present
//!   OPENAI_BASE_URL    : default "https://api.openai.com/v1"
//!   OPENAI_TEXT_MODEL  : default "gpt-4o-mini"
//!   OPENAI_VISION_MODEL   : default "gpt-4o"
//!   OPENAI_TIMEOUT_SECS   : provider HTTP timeout in seconds (default 30)
//!   QUIZFORGE_CONFIG_PATH : path to TOML config (prompt overrides)
//!   LOG_LEVEL    : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT      : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use quizforge_backend::routes::build_router;
use quizforge_backend::state::AppState;
use quizforge_backend::telemetry;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (schema registry, prompts, OpenAI client).
  let state = Arc::new(AppState::new());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "quizforge_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

/// Resolve when ctrl-c arrives so in-flight generations can finish draining.
async fn shutdown_signal() {
  let _ = tokio::signal::ctrl_c().await;
  info!(target: "quizforge_backend", "Shutdown signal received");
}
