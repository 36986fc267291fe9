//! Generative model settings (Ollama-compatible endpoint).

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2:3b".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_temperature() -> f32 {
    0.3
}

const fn default_max_tokens() -> u32 {
    200
}

const fn default_true() -> bool {
    true
}

const fn default_draft_temperature() -> f32 {
    0.7
}

const fn default_draft_max_tokens() -> u32 {
    150
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Off by default: without a model the engine uses voting and heuristics.
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature for analysis and decisions.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Produce a draft reply alongside each suggestion.
    #[serde(default = "default_true")]
    pub draft: bool,

    #[serde(default = "default_draft_temperature")]
    pub draft_temperature: f32,

    #[serde(default = "default_draft_max_tokens")]
    pub draft_max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            draft: true,
            draft_temperature: default_draft_temperature(),
            draft_max_tokens: default_draft_max_tokens(),
        }
    }
}

impl LlmConfig {
    /// Returns `true` if the model is enabled and reachable by URL and name.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.base_url.is_empty() && !self.model.is_empty()
    }

    /// Error out when the section is enabled but incomplete.
    pub fn ensure_configured(&self) -> Result<(), ConfigError> {
        if self.enabled && !self.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "llm".to_string(),
            });
        }
        Ok(())
    }
}
