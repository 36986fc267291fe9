//! # inbox-llm
//!
//! Text generation behind the [`Generator`] trait. [`OllamaClient`] talks to
//! an Ollama-compatible `/api/chat` endpoint; [`ScriptedGenerator`] replays
//! canned replies for tests and offline runs.
//!
//! Callers treat every error as "no model output" and fall back; nothing in
//! here retries.

pub mod error;
mod http;
pub mod mock;
pub mod ollama;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use error::LlmError;
pub use mock::ScriptedGenerator;
pub use ollama::OllamaClient;

/// One completion request: an optional system prompt plus one user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerateRequest {
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            temperature: 0.7,
            max_tokens: 500,
        }
    }

    #[must_use]
    pub fn system(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    #[must_use]
    pub const fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub const fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// A text generation backend.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Model identifier, for logs.
    fn id(&self) -> &str;

    /// Whether the backend answers at all.
    async fn is_available(&self) -> bool;

    /// Generate the assistant reply for `request`.
    async fn generate(&self, request: GenerateRequest) -> Result<String, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_builder_defaults_and_overrides() {
        let req = GenerateRequest::new("hi");
        assert_eq!(req.system_prompt, None);
        assert_eq!(req.max_tokens, 500);

        let req = GenerateRequest::new("hi")
            .system("be brief")
            .temperature(0.3)
            .max_tokens(200);
        assert_eq!(req.system_prompt.as_deref(), Some("be brief"));
        assert!((req.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(req.max_tokens, 200);
    }
}
