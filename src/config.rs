//! Loading generator configuration (prompt overrides) from TOML.
//!
//! See `GeneratorConfig` and `GeneratorPrompts` for the expected schema.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub prompts: GeneratorPrompts,
}

/// Prompts used by the OpenAI client. Defaults are what the mobile client
/// was built against; override them in TOML if you need to tune tone/structure.
#[derive(Clone, Debug, Deserialize)]
pub struct GeneratorPrompts {
    /// System turn for every generation. `{generator_name}` and
    /// `{task_description}` are filled from the resolved type descriptor.
    #[serde(default = "default_system_template")]
    pub system_template: String,
    /// Base instruction opening the user turn on the image path. The caller's
    /// optional extra prompt is appended after it.
    #[serde(default = "default_image_instruction")]
    pub image_base_instruction: String,
}

impl Default for GeneratorPrompts {
    fn default() -> Self {
        Self {
            system_template: default_system_template(),
            image_base_instruction: default_image_instruction(),
        }
    }
}

fn default_system_template() -> String {
    "You are {generator_name}. {task_description} \
     Respond ONLY with a JSON object matching the required schema exactly."
        .into()
}

fn default_image_instruction() -> String {
    "Read all text and diagrams in the attached images and identify the key \
     concepts they teach. Write quiz questions grounded only in content that \
     is visible in the images; do not invent facts the images do not support."
        .into()
}

/// Attempt to load `GeneratorConfig` from QUIZFORGE_CONFIG_PATH. On any
/// parsing/IO error, returns None.
pub fn load_generator_config_from_env() -> Option<GeneratorConfig> {
    let path = std::env::var("QUIZFORGE_CONFIG_PATH").ok()?;
    match std::fs::read_to_string(&path) {
        Ok(s) => match toml::from_str::<GeneratorConfig>(&s) {
            Ok(cfg) => {
                info!(target: "quizforge_backend", %path, "Loaded generator config (TOML)");
                Some(cfg)
            }
            Err(e) => {
                error!(target: "quizforge_backend", %path, error = %e, "Failed to parse TOML config");
                None
            }
        },
        Err(e) => {
            error!(target: "quizforge_backend", %path, error = %e, "Failed to read TOML config file");
            None
        }
    }
}
