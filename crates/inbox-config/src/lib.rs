//! # inbox-config
//!
//! Layered configuration loading using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`INBOX_*` prefix, `__` as separator)
//! 2. Project-level `.inbox/config.toml`
//! 3. User-level `~/.config/inbox/config.toml`
//! 4. Built-in defaults
//!
//! `INBOX_RETRIEVAL__TOP_K=8` maps to `retrieval.top_k`,
//! `INBOX_LLM__ENABLED=true` to `llm.enabled`.
//!
//! ```no_run
//! use inbox_config::InboxConfig;
//!
//! let config = InboxConfig::load_with_dotenv().expect("config");
//! if config.llm.is_configured() {
//!     println!("model: {}", config.llm.model);
//! }
//! ```

mod embeddings;
mod error;
mod llm;
mod retrieval;
mod store;

pub use embeddings::EmbeddingsConfig;
pub use error::ConfigError;
pub use llm::LlmConfig;
pub use retrieval::RetrievalConfig;
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InboxConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

impl InboxConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does not read `.env`; use [`Self::load_with_dotenv`] for that.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` first, then every other source.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".inbox/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("INBOX_").split("__"))
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retrieval.top_k == 0 {
            return Err(invalid("retrieval.top_k", "must be at least 1"));
        }
        if self.retrieval.rrf_k == 0 {
            return Err(invalid("retrieval.rrf_k", "must be at least 1"));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(invalid("llm.temperature", "must be between 0.0 and 2.0"));
        }
        self.llm.ensure_configured()
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("inbox").join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = InboxConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.llm.is_configured());
        assert!(config.embeddings.enabled);
        assert_eq!(config.store.db_path, ".inbox/inbox.db");
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let mut config = InboxConfig::default();
        config.retrieval.top_k = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "retrieval.top_k"
        ));
    }
}
