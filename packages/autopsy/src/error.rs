//! Typed errors for the agent library.
//!
//! Uses `thiserror` for library errors (not `anyhow`); the binary wraps
//! bootstrap failures with `anyhow` context instead.

use thiserror::Error;

/// Errors that can occur during agent operations.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Storage operation failed
    #[error("storage error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Web search provider failed
    #[error("search error: {0}")]
    Search(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// LLM service unavailable or returned an unusable response
    #[error("AI service error: {0}")]
    Ai(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Embedding generation failed
    #[error("embedding error: {0}")]
    Embedding(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;
