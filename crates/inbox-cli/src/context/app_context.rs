use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use inbox_agent::{DecisionEngine, DraftOptions, EngineOptions};
use inbox_config::InboxConfig;
use inbox_db::service::InboxService;
use inbox_embeddings::{SharedEmbedder, SharedReranker, default_cache_dir};
use inbox_lake::VectorLake;
use inbox_llm::OllamaClient;
use inbox_search::adapters::LakeIndex;
use inbox_search::{Capabilities, HybridRetriever, Indexer, RetrieverOptions, SourceToggles};

/// Every capability handle, built once at startup and shared by reference.
///
/// Models load lazily on first use; nothing here downloads or connects.
pub struct AppContext {
    pub config: InboxConfig,
    pub service: Arc<InboxService>,
    pub retriever: Arc<HybridRetriever>,
    pub engine: DecisionEngine,
    pub indexer: Indexer,
}

impl AppContext {
    pub async fn init(config: InboxConfig) -> anyhow::Result<Self> {
        ensure_parent(&config.store.db_path)?;
        let service = Arc::new(
            InboxService::new_local(
                &config.store.db_path,
                Some(PathBuf::from(&config.store.trail_dir)),
            )
            .await
            .context("failed to open inbox store")?,
        );

        let mut caps = Capabilities::new(service.clone(), service.clone());
        if config.embeddings.enabled {
            ensure_parent(&config.store.vector_path)?;
            let lake = VectorLake::open_local(&config.store.vector_path)
                .context("failed to open vector index")?;
            let cache_dir = config
                .embeddings
                .cache_dir
                .as_ref()
                .map_or_else(default_cache_dir, PathBuf::from);
            let timeout = Duration::from_millis(config.embeddings.timeout_ms);

            caps = caps.with_vectors(
                Arc::new(SharedEmbedder::new(cache_dir.clone(), timeout)),
                Arc::new(LakeIndex::new(Arc::new(lake))),
            );
            if config.embeddings.rerank {
                caps = caps.with_reranker(Arc::new(SharedReranker::new(cache_dir, timeout)));
            }
        } else {
            tracing::debug!("embeddings disabled; vector source and rerank are off");
        }

        let indexer = Indexer::new(&caps);
        let retriever = Arc::new(HybridRetriever::new(
            caps,
            RetrieverOptions {
                rrf_k: config.retrieval.rrf_k,
                source_timeout: Duration::from_millis(config.retrieval.source_timeout_ms),
            },
        ));

        let mut engine = DecisionEngine::new(retriever.clone(), engine_options(&config));
        if config.llm.is_configured() {
            let client = OllamaClient::new(
                config.llm.base_url.clone(),
                config.llm.model.clone(),
                Duration::from_secs(config.llm.timeout_secs),
            )
            .context("failed to build generator client")?;
            engine = engine.with_generator(Arc::new(client));
        }

        Ok(Self {
            config,
            service,
            retriever,
            engine,
            indexer,
        })
    }
}

fn engine_options(config: &InboxConfig) -> EngineOptions {
    let retrieval = &config.retrieval;
    let llm = &config.llm;
    let llm_timeout = Duration::from_secs(llm.timeout_secs);
    EngineOptions {
        top_k: retrieval.top_k,
        precedent_limit: retrieval.precedent_limit,
        fusion: retrieval.fusion,
        sources: SourceToggles {
            vector: retrieval.vector,
            keyword: retrieval.keyword,
            graph: retrieval.graph,
        },
        llm_timeout,
        temperature: llm.temperature,
        max_tokens: llm.max_tokens,
        draft: llm.draft.then_some(DraftOptions {
            temperature: llm.draft_temperature,
            max_tokens: llm.draft_max_tokens,
            timeout: llm_timeout,
        }),
    }
}

fn ensure_parent(path: &str) -> anyhow::Result<()> {
    if path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use inbox_config::InboxConfig;
    use pretty_assertions::assert_eq;

    use super::engine_options;

    #[test]
    fn engine_options_follow_config() {
        let mut config = InboxConfig::default();
        config.retrieval.top_k = 8;
        config.retrieval.keyword = false;
        config.llm.draft = false;
        config.llm.timeout_secs = 7;

        let options = engine_options(&config);
        assert_eq!(options.top_k, 8);
        assert!(!options.sources.keyword && options.sources.vector);
        assert_eq!(options.draft, None);
        assert_eq!(options.llm_timeout.as_secs(), 7);
    }
}
