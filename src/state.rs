//! Application state: schema registry, prompts, and the OpenAI client.
//!
//! This module owns:
//!   - the read-only schema registry (one descriptor per quiz type)
//!   - the prompts struct (from TOML or defaults)
//!   - the optional OpenAI client, constructed once and shared by all
//!     requests
//!
//! There is no shared mutable state between requests; everything here is
//! read-only after construction, so no synchronization is needed.

use tracing::{info, instrument, warn};

use crate::config::{GeneratorPrompts, load_generator_config_from_env};
use crate::openai::OpenAI;
use crate::registry::SchemaRegistry;

#[derive(Clone)]
pub struct AppState {
    pub registry: SchemaRegistry,
    pub prompts: GeneratorPrompts,
    pub openai: Option<OpenAI>,
}

impl AppState {
    /// Build state from env: load config, build the registry, init OpenAI.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        // Load TOML config if provided (prompt overrides).
        let prompts = load_generator_config_from_env()
            .map(|c| c.prompts)
            .unwrap_or_default();

        let registry = SchemaRegistry::new();
        for (ty, desc) in registry.iter() {
            info!(target: "generation", quiz_type = ty.code(), generator = desc.generator_name, "Registered quiz generator");
        }

        // Build optional OpenAI client (if API key present).
        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "quizforge_backend", base_url = %oa.base_url, text_model = %oa.text_model, vision_model = %oa.vision_model, "OpenAI enabled.");
        } else {
            warn!(target: "quizforge_backend", "OpenAI disabled (no OPENAI_API_KEY). Generation requests will fail.");
        }

        Self { registry, prompts, openai }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
