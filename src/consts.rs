//! Project-wide constants.

/// The single HTTP route served by the gateway.
pub const CHAT_ROUTE: &str = "/api/chat";

/// Port the gateway listens on when none is configured.
pub const DEFAULT_PORT: u16 = 8080;

/// Default Anthropic model when none is specified.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default reply length cap for the Anthropic engine.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Persona used when no system prompt is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are Jarvis, a helpful assistant. Answer clearly and concisely.";

/// Printed before every read in a chat session.
pub const PROMPT: &str = "> ";

/// Label in front of every answer in a chat session.
pub const ANSWER_LABEL: &str = "Jarvis";

/// Printed when the chat input runs out.
pub const FAREWELL: &str = "Exiting chat.";

/// Error envelope message for blank queries.
pub const MISSING_QUERY: &str = "Query is missing";
