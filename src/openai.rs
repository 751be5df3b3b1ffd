//! Minimal OpenAI client for our use-cases.
//!
//! We only call chat.completions and always request schema-constrained JSON
//! (`response_format: json_schema` with `strict: true`). Calls are
//! instrumented and log model names, latencies, and response sizes (not
//! contents).
//!
//! NOTE: We never log the API key and we keep payload truncations short to
//! avoid leaking quiz material into logs.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{info, instrument};

use crate::util::trunc_for_log;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub text_model: String,
  pub vision_model: String,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok()?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let text_model =
      std::env::var("OPENAI_TEXT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
    let vision_model =
      std::env::var("OPENAI_VISION_MODEL").unwrap_or_else(|_| "gpt-4o".into());
    let timeout_secs = std::env::var("OPENAI_TIMEOUT_SECS")
      .ok()
      .and_then(|s| s.parse::<u64>().ok())
      .unwrap_or(DEFAULT_TIMEOUT_SECS);

    Self::with_settings(api_key, base_url, text_model, vision_model, timeout_secs)
  }

  /// Construct with explicit settings. Used by `from_env` and by tests that
  /// point the client at a stub server.
  pub fn with_settings(
    api_key: String,
    base_url: String,
    text_model: String,
    vision_model: String,
    timeout_secs: u64,
  ) -> Option<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout_secs))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, text_model, vision_model })
  }

  /// Schema-constrained chat completion. Generic over the target type T,
  /// which must mirror the supplied JSON Schema.
  #[instrument(level = "info", skip(self, system, user, schema), fields(model = %model, schema = %schema_name))]
  pub async fn chat_schema<T: DeserializeOwned>(
    &self,
    model: &str,
    system: &str,
    user: MessageContent,
    schema_name: &str,
    schema: &serde_json::Value,
  ) -> Result<T, String> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: model.to_string(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: MessageContent::Text(system.into()) },
        ChatMessageReq { role: "user".into(), content: user },
      ],
      temperature: 0.7,
      response_format: Some(ResponseFormat::JsonSchema {
        json_schema: JsonSchemaFormat {
          name: schema_name.to_string(),
          strict: true,
          schema: schema.clone(),
        },
      }),
      max_tokens: None,
    };

    let start = std::time::Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "quizforge-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_openai_error(&body).unwrap_or_else(|| trunc_for_log(&body, 300));
      return Err(format!("OpenAI HTTP {}: {}", status, msg));
    }

    let body: ChatCompletionResponse = res.json().await.map_err(|e| e.to_string())?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.first()
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default();
    if text.trim().is_empty() {
      return Err("OpenAI returned no parsed output".into());
    }
    info!(elapsed = ?start.elapsed(), response_len = text.len(), "Model response received");

    serde_json::from_str::<T>(&text).map_err(|e| format!("JSON parse error: {}", e))
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: MessageContent }

/// User/system turn payload: plain text, or an ordered list of content parts
/// (text followed by inline images) for the vision path.
#[derive(Serialize)]
#[serde(untagged)]
pub enum MessageContent {
  Text(String),
  Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
  Text { text: String },
  ImageUrl { image_url: ImageUrl },
}
#[derive(Serialize)]
pub struct ImageUrl { pub url: String }

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseFormat {
  JsonSchema { json_schema: JsonSchemaFormat },
}
#[derive(Serialize)]
struct JsonSchemaFormat {
  name: String,
  strict: bool,
  schema: serde_json::Value,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn image_parts_serialize_to_openai_wire_shape() {
    let msg = ChatMessageReq {
      role: "user".into(),
      content: MessageContent::Parts(vec![
        ContentPart::Text { text: "Make a quiz.".into() },
        ContentPart::ImageUrl {
          image_url: ImageUrl { url: "data:image/png;base64,aGVsbG8=".into() },
        },
      ]),
    };
    let v = serde_json::to_value(&msg).expect("serializes");
    assert_eq!(v["role"], "user");
    assert_eq!(v["content"][0], json!({ "type": "text", "text": "Make a quiz." }));
    assert_eq!(
      v["content"][1],
      json!({ "type": "image_url", "image_url": { "url": "data:image/png;base64,aGVsbG8=" } })
    );
  }

  #[test]
  fn response_format_carries_strict_schema() {
    let fmt = ResponseFormat::JsonSchema {
      json_schema: JsonSchemaFormat {
        name: "true_false_quiz".into(),
        strict: true,
        schema: json!({ "type": "object" }),
      },
    };
    let v = serde_json::to_value(&fmt).expect("serializes");
    assert_eq!(v["type"], "json_schema");
    assert_eq!(v["json_schema"]["name"], "true_false_quiz");
    assert_eq!(v["json_schema"]["strict"], true);
  }

  #[test]
  fn error_bodies_unwrap_to_messages() {
    let body = r#"{"error":{"message":"Rate limit exceeded","type":"rate_limit"}}"#;
    assert_eq!(extract_openai_error(body).as_deref(), Some("Rate limit exceeded"));
    assert_eq!(extract_openai_error("not json"), None);
  }
}
