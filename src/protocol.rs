//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and clients independently.

use serde::{Deserialize, Serialize};

/// Body for `POST /api/v1/quiz`.
#[derive(Debug, Deserialize)]
pub struct QuizIn {
    pub prompt: String,
    #[serde(rename = "type")]
    pub quiz_type: String,
}

/// Body for `POST /api/v1/quiz/from-images`.
///
/// `images` entries are kept as raw JSON values so a non-string entry can be
/// rejected with the `INVALID_IMAGE_DATA` code instead of a body parse error.
#[derive(Debug, Deserialize)]
pub struct QuizFromImagesIn {
    pub images: Vec<serde_json::Value>,
    #[serde(rename = "type")]
    pub quiz_type: String,
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
