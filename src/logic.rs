//! Core generation behaviors shared by the HTTP handlers.
//!
//! This includes:
//!   - resolving the requested quiz type against the schema registry
//!   - validating prompts and image payloads before any provider call
//!   - assembling the system/user turns from configurable templates
//!   - dispatching the single provider call and mapping failures
//!
//! Each call is stateless request/response: one outbound provider request,
//! no retry, no fallback content, nothing persisted.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::domain::{GeneratedQuiz, MatchingQuiz, MultipleChoiceQuiz, QuizType, TrueFalseQuiz};
use crate::error::AppError;
use crate::openai::{ContentPart, ImageUrl, MessageContent, OpenAI};
use crate::registry::QuizTypeDescriptor;
use crate::state::AppState;
use crate::util::fill_template;

/// Upper bound on image entries per request, matching the request contract.
pub const MAX_IMAGES: usize = 10;

/// Generate a quiz of `type_code` from a free-text prompt.
#[instrument(level = "info", skip(state, prompt), fields(quiz_type = %type_code, prompt_len = prompt.len()))]
pub async fn generate_from_text(
  state: &AppState,
  type_code: &str,
  prompt: &str,
) -> Result<GeneratedQuiz, AppError> {
  let (ty, desc) = state.registry.resolve(type_code)?;
  if prompt.trim().is_empty() {
    return Err(AppError::BadRequest("prompt must be a non-empty string".into()));
  }
  let oa = provider(state)?;

  let system = system_turn(state, desc);
  let generation_id = Uuid::new_v4();
  info!(target: "generation", %generation_id, quiz_type = ty.code(), "Dispatching text generation");

  let quiz = dispatch(oa, &oa.text_model, ty, desc, &system, MessageContent::Text(prompt.to_string())).await?;
  info!(target: "generation", %generation_id, quiz_type = ty.code(), "Quiz generated from text");
  Ok(quiz)
}

/// Generate a quiz of `type_code` from 1..=10 base64 images, with an optional
/// extra instruction appended to the base one.
#[instrument(level = "info", skip(state, images, prompt), fields(quiz_type = %type_code, image_count = images.len()))]
pub async fn generate_from_images(
  state: &AppState,
  type_code: &str,
  images: &[serde_json::Value],
  prompt: Option<&str>,
) -> Result<GeneratedQuiz, AppError> {
  let (ty, desc) = state.registry.resolve(type_code)?;
  let payloads = validate_images(images)?;
  let oa = provider(state)?;

  let system = system_turn(state, desc);
  let mut instruction = state.prompts.image_base_instruction.clone();
  if let Some(extra) = prompt.map(str::trim).filter(|s| !s.is_empty()) {
    instruction.push_str("\n\n");
    instruction.push_str(extra);
  }

  let mut parts = Vec::with_capacity(payloads.len() + 1);
  parts.push(ContentPart::Text { text: instruction });
  for (payload, mime) in &payloads {
    parts.push(ContentPart::ImageUrl {
      image_url: ImageUrl { url: format!("data:{};base64,{}", mime, payload) },
    });
  }

  let generation_id = Uuid::new_v4();
  info!(target: "generation", %generation_id, quiz_type = ty.code(), image_count = payloads.len(), "Dispatching image generation");

  let quiz = dispatch(oa, &oa.vision_model, ty, desc, &system, MessageContent::Parts(parts)).await?;
  info!(target: "generation", %generation_id, quiz_type = ty.code(), "Quiz generated from images");
  Ok(quiz)
}

fn provider(state: &AppState) -> Result<&OpenAI, AppError> {
  state.openai.as_ref().ok_or_else(|| {
    AppError::GenerationFailed("OpenAI provider is not configured (OPENAI_API_KEY is unset)".into())
  })
}

fn system_turn(state: &AppState, desc: &QuizTypeDescriptor) -> String {
  fill_template(&state.prompts.system_template, &[
    ("generator_name", desc.generator_name),
    ("task_description", desc.task_description),
  ])
}

/// One provider call, parsed into the typed quiz for the resolved type.
/// All provider-side failures collapse into `GenerationFailed`.
async fn dispatch(
  oa: &OpenAI,
  model: &str,
  ty: QuizType,
  desc: &QuizTypeDescriptor,
  system: &str,
  user: MessageContent,
) -> Result<GeneratedQuiz, AppError> {
  let result = match ty {
    QuizType::MultipleChoice => oa
      .chat_schema::<MultipleChoiceQuiz>(model, system, user, desc.schema_name, &desc.output_schema)
      .await
      .map(GeneratedQuiz::MultipleChoice),
    QuizType::TrueFalse => oa
      .chat_schema::<TrueFalseQuiz>(model, system, user, desc.schema_name, &desc.output_schema)
      .await
      .map(GeneratedQuiz::TrueFalse),
    QuizType::Matching => oa
      .chat_schema::<MatchingQuiz>(model, system, user, desc.schema_name, &desc.output_schema)
      .await
      .map(GeneratedQuiz::Matching),
  };

  result.map_err(|e| {
    error!(target: "generation", quiz_type = ty.code(), error = %e, "Provider call failed");
    AppError::GenerationFailed(e)
  })
}

/// Check every entry is a non-empty base64 string and sniff its MIME type.
/// Entries arrive as raw JSON values so a non-string entry gets the distinct
/// `INVALID_IMAGE_DATA` code instead of a generic body parse failure.
fn validate_images(images: &[serde_json::Value]) -> Result<Vec<(String, &'static str)>, AppError> {
  if images.is_empty() {
    return Err(AppError::InvalidImageData("images must contain at least one entry".into()));
  }
  if images.len() > MAX_IMAGES {
    return Err(AppError::InvalidImageData(format!(
      "images must contain at most {} entries, got {}",
      MAX_IMAGES,
      images.len()
    )));
  }

  let mut out = Vec::with_capacity(images.len());
  for (i, entry) in images.iter().enumerate() {
    let s = entry
      .as_str()
      .ok_or_else(|| AppError::InvalidImageData(format!("images[{}] is not a string", i)))?;
    if s.is_empty() {
      return Err(AppError::InvalidImageData(format!("images[{}] is empty", i)));
    }
    let bytes = BASE64
      .decode(s)
      .map_err(|e| AppError::InvalidImageData(format!("images[{}] is not valid base64: {}", i, e)))?;
    out.push((s.to_string(), sniff_mime(&bytes)));
  }
  Ok(out)
}

/// Magic-byte MIME detection for the data URLs sent to the vision model.
/// Unrecognized formats are labeled JPEG, which the provider tolerates.
fn sniff_mime(bytes: &[u8]) -> &'static str {
  if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
    "image/png"
  } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
    "image/jpeg"
  } else if bytes.starts_with(b"GIF8") {
    "image/gif"
  } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
    "image/webp"
  } else {
    "image/jpeg"
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn empty_image_list_is_rejected() {
    match validate_images(&[]) {
      Err(AppError::InvalidImageData(msg)) => assert!(msg.contains("at least one")),
      other => panic!("expected InvalidImageData, got {:?}", other),
    }
  }

  #[test]
  fn more_than_ten_images_are_rejected() {
    let images: Vec<_> = (0..11).map(|_| json!("aGVsbG8=")).collect();
    assert!(matches!(validate_images(&images), Err(AppError::InvalidImageData(_))));
  }

  #[test]
  fn non_string_entry_is_rejected() {
    let images = vec![json!("aGVsbG8="), json!(123)];
    match validate_images(&images) {
      Err(AppError::InvalidImageData(msg)) => assert!(msg.contains("images[1]")),
      other => panic!("expected InvalidImageData, got {:?}", other),
    }
  }

  #[test]
  fn invalid_base64_is_rejected() {
    let images = vec![json!("!!not-base64!!")];
    assert!(matches!(validate_images(&images), Err(AppError::InvalidImageData(_))));
  }

  #[test]
  fn valid_entries_pass_and_keep_order() {
    let images = vec![json!("aGVsbG8="), json!("d29ybGQ=")];
    let out = validate_images(&images).expect("valid");
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].0, "aGVsbG8=");
    assert_eq!(out[1].0, "d29ybGQ=");
  }

  #[test]
  fn mime_sniffing_recognizes_common_formats() {
    assert_eq!(sniff_mime(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A]), "image/png");
    assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
    assert_eq!(sniff_mime(b"GIF89a"), "image/gif");
    assert_eq!(sniff_mime(b"RIFF\x00\x00\x00\x00WEBPVP8 "), "image/webp");
    assert_eq!(sniff_mime(b"plain text"), "image/jpeg");
  }
}
