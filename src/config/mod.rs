//! Typed runtime configuration.
//!
//! Values come from CLI flags with environment fallbacks (see `main.rs`);
//! this module turns them into engine factories and listen addresses.

use clap::ValueEnum;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use crate::engine::EngineFactory;
use crate::engine::anthropic::AnthropicFactory;
use crate::engine::echo::EchoFactory;

/// Which engine answers questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    Anthropic,
    Echo,
}

/// Everything needed to build an engine factory.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub provider: Provider,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub system: String,
}

impl EngineConfig {
    /// Build the factory for the configured provider.
    pub fn factory(&self) -> Arc<dyn EngineFactory> {
        match self.provider {
            Provider::Anthropic => Arc::new(AnthropicFactory::new(
                self.model.clone(),
                self.api_key.clone().filter(|k| !k.is_empty()),
                self.max_tokens,
                self.system.clone(),
            )),
            Provider::Echo => Arc::new(EchoFactory),
        }
    }

    /// Short auth status for the banner.
    pub fn auth_status(&self) -> &'static str {
        match self.provider {
            Provider::Echo => "N/A",
            Provider::Anthropic => match self.api_key.as_deref() {
                Some(k) if !k.is_empty() => "API key ✓",
                _ => "not authenticated",
            },
        }
    }
}

/// Where the HTTP gateway listens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
