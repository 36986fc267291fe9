//! Lazily loaded, process-wide model handles for async callers.
//!
//! Each handle loads its model at most once, on first use, and serializes
//! inference behind a mutex on the blocking pool. Clones share the model.
//! Call deadlines bound the wait, not the load itself.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::OnceCell;

use crate::{EmbeddingEngine, EmbeddingError, RerankEngine};

type Slot<T> = Arc<OnceCell<Arc<Mutex<T>>>>;

/// Fill `slot` with `init` unless it is already filled.
///
/// The load runs in its own task that owns a handle to the slot, so a caller
/// dropped by a deadline does not cancel it: the model still lands in the
/// slot and later callers reuse it instead of starting another load.
async fn load<T, F>(slot: &Slot<T>, init: F) -> Result<Arc<Mutex<T>>, EmbeddingError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, EmbeddingError> + Send + 'static,
{
    if let Some(engine) = slot.get() {
        return Ok(Arc::clone(engine));
    }
    let slot = Arc::clone(slot);
    tokio::spawn(async move {
        slot.get_or_try_init(|| async move {
            let engine = tokio::task::spawn_blocking(init).await??;
            tracing::debug!("model loaded");
            Ok::<_, EmbeddingError>(Arc::new(Mutex::new(engine)))
        })
        .await
        .cloned()
    })
    .await?
}

async fn run<T, R, F>(engine: Arc<Mutex<T>>, f: F) -> Result<R, EmbeddingError>
where
    T: Send + 'static,
    R: Send + 'static,
    F: FnOnce(&mut T) -> Result<R, EmbeddingError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = engine
            .lock()
            .map_err(|_| EmbeddingError::EmbedFailed("model lock poisoned".into()))?;
        f(&mut guard)
    })
    .await?
}

async fn with_deadline<R>(
    timeout: Duration,
    fut: impl Future<Output = Result<R, EmbeddingError>>,
) -> Result<R, EmbeddingError> {
    tokio::time::timeout(timeout, fut).await.map_err(|_| {
        EmbeddingError::Timeout(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
    })?
}

/// Shared [`EmbeddingEngine`].
#[derive(Clone)]
pub struct SharedEmbedder {
    cache_dir: PathBuf,
    timeout: Duration,
    slot: Slot<EmbeddingEngine>,
}

impl SharedEmbedder {
    #[must_use]
    pub fn new(cache_dir: PathBuf, timeout: Duration) -> Self {
        Self {
            cache_dir,
            timeout,
            slot: Arc::new(OnceCell::new()),
        }
    }

    /// Whether the model has been loaded yet.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.slot.initialized()
    }

    /// Embed texts, loading the model first if needed.
    ///
    /// # Errors
    ///
    /// Returns the load or inference error, or [`EmbeddingError::Timeout`].
    pub async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        with_deadline(self.timeout, async {
            let cache_dir = self.cache_dir.clone();
            let engine = load(&self.slot, move || EmbeddingEngine::new(&cache_dir)).await?;
            run(engine, move |e| e.embed_batch(&texts)).await
        })
        .await
    }

    /// # Errors
    ///
    /// Same as [`Self::embed`].
    pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed(vec![text.to_string()])
            .await?
            .pop()
            .ok_or(EmbeddingError::EmptyResult)
    }
}

/// Shared [`RerankEngine`].
#[derive(Clone)]
pub struct SharedReranker {
    cache_dir: PathBuf,
    timeout: Duration,
    slot: Slot<RerankEngine>,
}

impl SharedReranker {
    #[must_use]
    pub fn new(cache_dir: PathBuf, timeout: Duration) -> Self {
        Self {
            cache_dir,
            timeout,
            slot: Arc::new(OnceCell::new()),
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.slot.initialized()
    }

    /// Score passages against `query`, in passage order.
    ///
    /// # Errors
    ///
    /// Returns the load or inference error, or [`EmbeddingError::Timeout`].
    pub async fn score(
        &self,
        query: &str,
        passages: Vec<String>,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let query = query.to_string();
        with_deadline(self.timeout, async {
            let cache_dir = self.cache_dir.clone();
            let engine = load(&self.slot, move || RerankEngine::new(&cache_dir)).await?;
            run(engine, move |e| e.score(&query, &passages)).await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn slot_initializes_once() {
        let slot: Slot<u32> = Arc::new(OnceCell::new());
        let counter = Arc::new(std::sync::atomic::AtomicU32::new(0));
        for _ in 0..3 {
            let counter = Arc::clone(&counter);
            let engine = load(&slot, move || {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Ok(7)
            })
            .await
            .unwrap();
            let value = run(engine, |n| Ok(*n)).await.unwrap();
            assert_eq!(value, 7);
        }
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_load_is_retried() {
        let slot: Slot<u32> = Arc::new(OnceCell::new());
        let err = load(&slot, || Err(EmbeddingError::InitFailed("offline".into())))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, EmbeddingError::InitFailed(_)));
        assert!(load(&slot, || Ok(1)).await.is_ok());
    }

    #[tokio::test]
    async fn load_outlives_callers_that_time_out() {
        use std::sync::atomic::{AtomicU32, Ordering};

        let slot: Slot<u32> = Arc::new(OnceCell::new());
        let inits = Arc::new(AtomicU32::new(0));
        for _ in 0..2 {
            let inits = Arc::clone(&inits);
            let err = with_deadline(
                Duration::from_millis(50),
                load(&slot, move || {
                    inits.fetch_add(1, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(300));
                    Ok(9)
                }),
            )
            .await
            .err()
            .unwrap();
            assert!(matches!(err, EmbeddingError::Timeout(50)));
        }

        for _ in 0..50 {
            if slot.initialized() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(slot.initialized());
        assert_eq!(inits.load(Ordering::SeqCst), 1);

        let engine = load(&slot, || Ok(0)).await.unwrap();
        assert_eq!(run(engine, |n| Ok(*n)).await.unwrap(), 9);
        assert_eq!(inits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn deadline_maps_to_timeout() {
        let err = with_deadline(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, EmbeddingError>(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, EmbeddingError::Timeout(10)));
    }

    #[test]
    fn handles_start_unloaded() {
        let dir = tempfile::tempdir().unwrap();
        let embedder = SharedEmbedder::new(dir.path().to_path_buf(), Duration::from_secs(1));
        let reranker = SharedReranker::new(dir.path().to_path_buf(), Duration::from_secs(1));
        assert!(!embedder.is_loaded());
        assert!(!reranker.clone().is_loaded());
    }
}
