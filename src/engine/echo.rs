use anyhow::Result;
use async_trait::async_trait;

use super::{Engine, EngineFactory, EngineInfo};

/// Offline engine: answers with the question. Useful for trying the
/// gateway without credentials.
#[derive(Default)]
pub struct EchoEngine {
    turns: usize,
}

#[async_trait]
impl Engine for EchoEngine {
    async fn ask(&mut self, query: &str) -> Result<String> {
        self.turns += 1;
        Ok(format!("[{}] {}", self.turns, query))
    }
}

pub struct EchoFactory;

impl EngineFactory for EchoFactory {
    fn start(&self) -> Box<dyn Engine> {
        Box::new(EchoEngine::default())
    }

    fn describe(&self) -> EngineInfo {
        EngineInfo {
            provider: "echo".to_string(),
            model: "—".to_string(),
        }
    }
}
