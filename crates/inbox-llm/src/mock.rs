//! Canned-reply generator.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use crate::{GenerateRequest, Generator, LlmError};

/// Returns queued replies in order, then the fallback reply (or an error if none).
///
/// Every request is recorded for inspection.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, String>>>,
    fallback: Option<String>,
    requests: Mutex<Vec<GenerateRequest>>,
    calls: AtomicU32,
}

impl Default for ScriptedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
            calls: AtomicU32::new(0),
        }
    }

    /// Queue a successful reply.
    #[must_use]
    pub fn reply(self, text: impl Into<String>) -> Self {
        if let Ok(mut q) = self.replies.lock() {
            q.push_back(Ok(text.into()));
        }
        self
    }

    /// Queue a failure; it surfaces as [`LlmError::Unavailable`].
    #[must_use]
    pub fn fail(self, message: impl Into<String>) -> Self {
        if let Ok(mut q) = self.replies.lock() {
            q.push_back(Err(message.into()));
        }
        self
    }

    /// Reply used once the queue is empty.
    #[must_use]
    pub fn always(mut self, text: impl Into<String>) -> Self {
        self.fallback = Some(text.into());
        self
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests seen so far.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request);
        }
        let next = self.replies.lock().ok().and_then(|mut q| q.pop_front());
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(LlmError::Unavailable(message)),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| LlmError::Unavailable("no scripted reply left".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn replays_queue_then_fallback() {
        let generator = ScriptedGenerator::new()
            .reply("first")
            .fail("down")
            .always("again");
        let req = GenerateRequest::new("x");
        assert_eq!(generator.generate(req.clone()).await.unwrap(), "first");
        assert!(matches!(
            generator.generate(req.clone()).await,
            Err(LlmError::Unavailable(_))
        ));
        assert_eq!(generator.generate(req.clone()).await.unwrap(), "again");
        assert_eq!(generator.generate(req).await.unwrap(), "again");
        assert_eq!(generator.call_count(), 4);
        assert_eq!(generator.requests().len(), 4);
    }

    #[tokio::test]
    async fn empty_script_errors() {
        let generator = ScriptedGenerator::new();
        assert!(generator.generate(GenerateRequest::new("x")).await.is_err());
    }
}
