//! Error types for the Tavily client.

use thiserror::Error;

/// Result type for Tavily client operations.
pub type Result<T> = std::result::Result<T, TavilyError>;

/// Tavily client errors.
#[derive(Debug, Error)]
pub enum TavilyError {
    /// Transport failure (connection refused, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the Tavily API.
    #[error("Tavily API error ({status}): {message}")]
    Api { status: u16, message: String },
}
