use inbox_config::InboxConfig;

/// Warn about settings that look intended but did not take effect.
pub fn warn_unconfigured(config: &InboxConfig) {
    for warning in collect_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_warnings<I>(config: &InboxConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    if !config.llm.enabled && has_single_underscore(&keys, "INBOX_LLM") {
        warnings.push(
            "LLM is disabled while INBOX_LLM_* env vars exist. Use double underscores (example: INBOX_LLM__ENABLED=true)."
                .to_string(),
        );
    }
    if config.llm.enabled && !config.llm.is_configured() {
        warnings.push(
            "llm.enabled is set but base_url or model is empty; suggestions will skip the model tier."
                .to_string(),
        );
    }
    if !config.embeddings.enabled && config.retrieval.vector {
        warnings.push(
            "Embeddings are disabled; the vector source will contribute nothing.".to_string(),
        );
    }

    warnings
}

fn has_single_underscore(keys: &[String], prefix: &str) -> bool {
    let nested = format!("{prefix}__");
    keys.iter()
        .any(|key| key.starts_with(prefix) && !key.starts_with(&nested))
}
