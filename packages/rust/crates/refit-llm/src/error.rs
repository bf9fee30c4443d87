//! Error types for model calls.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use thiserror::Error;

/// Failure modes of a completion request.
#[derive(Error, Debug)]
pub enum LlmError {
    /// The environment variable holding the API key is unset or empty.
    #[error("API key not found in environment variable {0}")]
    MissingApiKey(String),

    /// Transport-level failure (connect, timeout, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("LLM API error {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The response carried no candidates (blocked or empty).
    #[error("LLM response blocked or empty")]
    EmptyResponse,

    /// The response body did not have the expected shape.
    #[error("LLM response parse error: {0}")]
    Parse(String),

    /// The prompt does not fit in the model's input window.
    #[error("Input tokens: {tokens} exceeds the maximum allowed tokens: {limit}")]
    InputTooLarge {
        /// Counted prompt tokens.
        tokens: usize,
        /// Model input limit.
        limit: usize,
    },

    /// A scripted model has no reply left.
    #[error("Scripted model has no replies left")]
    Exhausted,

    /// Model name not present in the registry.
    #[error("Unknown model: {0}")]
    UnknownModel(String),
}
