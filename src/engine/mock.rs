use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Engine, EngineFactory, EngineInfo};

/// A scripted reply: `Ok` is an answer, `Err` is a failure message.
pub type Reply = std::result::Result<String, String>;

/// A scripted engine for tests. Returns pre-defined replies in order.
///
/// Handles started from the same [`MockFactory`] share the script and the
/// call counter, so a test can count calls across requests.
pub struct MockEngine {
    replies: Arc<Vec<Reply>>,
    asked: Arc<AtomicUsize>,
}

impl MockEngine {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Arc::new(replies),
            asked: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times `ask` has been called.
    pub fn calls(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Engine for MockEngine {
    async fn ask(&mut self, _query: &str) -> Result<String> {
        let i = self.asked.fetch_add(1, Ordering::SeqCst);
        match self.replies.get(i) {
            Some(Ok(answer)) => Ok(answer.clone()),
            Some(Err(message)) => Err(anyhow!("{message}")),
            None => Err(anyhow!(
                "MockEngine: no more replies (called {} times)",
                i + 1
            )),
        }
    }
}

/// Factory for [`MockEngine`] handles that counts how often it is started.
pub struct MockFactory {
    replies: Arc<Vec<Reply>>,
    asked: Arc<AtomicUsize>,
    started: AtomicUsize,
}

impl MockFactory {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Arc::new(replies),
            asked: Arc::new(AtomicUsize::new(0)),
            started: AtomicUsize::new(0),
        }
    }

    /// A factory whose handles always give the same answer.
    pub fn answering(answer: &str, times: usize) -> Self {
        Self::new(vec![Ok(answer.to_string()); times])
    }

    /// A factory whose first `ask` fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self::new(vec![Err(message.to_string())])
    }

    /// Number of handles handed out so far.
    pub fn starts(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Number of `ask` calls across every handle.
    pub fn calls(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl EngineFactory for MockFactory {
    fn start(&self) -> Box<dyn Engine> {
        self.started.fetch_add(1, Ordering::SeqCst);
        Box::new(MockEngine {
            replies: Arc::clone(&self.replies),
            asked: Arc::clone(&self.asked),
        })
    }

    fn describe(&self) -> EngineInfo {
        EngineInfo {
            provider: "mock".to_string(),
            model: "scripted".to_string(),
        }
    }
}
