//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::AppError;
use crate::logic;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(quiz_type = %body.quiz_type, prompt_len = body.prompt.len()))]
pub async fn http_post_quiz(
  State(state): State<Arc<AppState>>,
  Json(body): Json<QuizIn>,
) -> Result<impl IntoResponse, AppError> {
  let quiz = logic::generate_from_text(&state, &body.quiz_type, &body.prompt).await?;
  info!(target: "generation", quiz_type = %body.quiz_type, "HTTP quiz generated from text");
  Ok(Json(quiz))
}

#[instrument(level = "info", skip(state, body), fields(quiz_type = %body.quiz_type, image_count = body.images.len()))]
pub async fn http_post_quiz_from_images(
  State(state): State<Arc<AppState>>,
  Json(body): Json<QuizFromImagesIn>,
) -> Result<impl IntoResponse, AppError> {
  let quiz =
    logic::generate_from_images(&state, &body.quiz_type, &body.images, body.prompt.as_deref()).await?;
  info!(target: "generation", quiz_type = %body.quiz_type, "HTTP quiz generated from images");
  Ok(Json(quiz))
}
