use std::io;
use std::net::IpAddr;

use clap::{Parser, Subcommand};
use tokio::io::BufReader;

use jarvis::banner::{BannerInfo, print_banner};
use jarvis::config::{EngineConfig, Provider, ServerConfig};
use jarvis::consts::{
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_PORT, DEFAULT_SYSTEM_PROMPT, FAREWELL,
};
use jarvis::gateway::{self, AppState};
use jarvis::session::{Session, SessionOptions};

#[derive(Parser)]
#[command(
    name = "jarvis",
    version,
    about = "Ask a question, get an answer: over HTTP or in the terminal.",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Engine provider
    #[arg(short, long, value_enum, env = "JARVIS_PROVIDER", default_value_t = Provider::Anthropic)]
    provider: Provider,

    /// Model name (ignored for echo)
    #[arg(long, env = "JARVIS_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Maximum tokens per answer
    #[arg(long, env = "JARVIS_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// System prompt sent with every question
    #[arg(long, env = "JARVIS_SYSTEM_PROMPT", default_value = DEFAULT_SYSTEM_PROMPT)]
    system: String,
}

#[derive(Subcommand)]
enum Command {
    /// Serve POST /api/chat over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, env = "JARVIS_HOST", default_value = "0.0.0.0")]
        host: IpAddr,

        /// Port to listen on
        #[arg(long, env = "JARVIS_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Start an interactive chat session
    Chat,
    /// Ask a single question and exit
    Ask {
        /// The question
        query: String,
    },
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            provider: self.provider,
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            max_tokens: self.max_tokens,
            system: self.system.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to the chat transcript.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let engine_config = cli.engine_config();
    let factory = engine_config.factory();
    let engine_info = factory.describe();

    match cli.command {
        Command::Serve { host, port } => {
            let server = ServerConfig { host, port };
            let listen = server.addr().to_string();
            print_banner(&BannerInfo {
                mode: "serve",
                engine: &engine_info,
                auth_status: engine_config.auth_status(),
                listen: Some(&listen),
            });

            let listener = gateway::bind(server.addr()).await.inspect_err(|e| {
                tracing::error!(error = %e, "cannot start server");
            })?;
            gateway::serve(listener, AppState::new(factory), shutdown_signal()).await?;
        }

        Command::Chat => {
            print_banner(&BannerInfo {
                mode: "chat",
                engine: &engine_info,
                auth_status: engine_config.auth_status(),
                listen: None,
            });

            let session = Session::start(
                factory.as_ref(),
                BufReader::new(tokio::io::stdin()),
                io::stdout(),
                SessionOptions { spinner: true },
            );

            // Ctrl+C ends the session the same way end of input does.
            let result = tokio::select! {
                result = session.run() => result,
                _ = tokio::signal::ctrl_c() => {
                    println!("\n{FAREWELL}");
                    return Ok(());
                }
            };

            match result {
                Ok(summary) => tracing::debug!(turns = summary.turns, "session ended"),
                Err(e) => {
                    tracing::error!(error = %e, "chat session failed");
                    return Err(e);
                }
            }
        }

        Command::Ask { query } => {
            if query.trim().is_empty() {
                anyhow::bail!("query is empty");
            }
            let mut engine = factory.start();
            let answer = engine.ask(query.trim()).await?;
            println!("{answer}");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutting down");
    }
}
