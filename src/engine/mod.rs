pub mod anthropic;
pub mod echo;
pub mod mock;

use anyhow::Result;
use async_trait::async_trait;

/// A conversation handle. Both front ends only know this trait.
///
/// A handle may keep whatever context it likes between calls to `ask`;
/// the HTTP gateway throws it away after one question, the chat session
/// keeps it for its whole lifetime.
#[async_trait]
pub trait Engine: Send + Sync {
    async fn ask(&mut self, query: &str) -> Result<String>;
}

/// Hands out fresh engine handles.
///
/// `start` cannot fail: anything that would stop an engine from working
/// (missing credentials, unreachable API) is reported by `ask` instead.
pub trait EngineFactory: Send + Sync {
    fn start(&self) -> Box<dyn Engine>;

    /// Provider and model, for banners and logs.
    fn describe(&self) -> EngineInfo;
}

/// Human-readable description of what a factory produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInfo {
    pub provider: String,
    pub model: String,
}
