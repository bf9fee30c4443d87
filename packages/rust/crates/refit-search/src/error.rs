//! Error types for ripgrep searches.

use refit_core::EditError;
use refit_llm::LlmError;
use thiserror::Error;

/// Error types for search operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// `rg` is not installed or not on `PATH`.
    #[error("ripgrep (rg) not found; install it from https://github.com/BurntSushi/ripgrep")]
    RgNotFound,

    /// `rg` could not be started.
    #[error("Failed to run rg: {0}")]
    Spawn(#[from] std::io::Error),

    /// `rg` exited with an error status (2 or above).
    #[error("rg failed with exit code {code:?}: {stderr}")]
    RgFailed {
        /// Exit code, absent when killed by a signal.
        code: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },

    /// A flag the report parser depends on is absent.
    #[error("Missing required flag '{flag}' in rg arguments: {args}")]
    MissingFlag {
        /// The missing flag.
        flag: &'static str,
        /// Arguments as given.
        args: String,
    },

    /// Arguments could not be split or contain a forbidden flag.
    #[error("Invalid rg arguments: {0}")]
    InvalidArguments(String),

    /// The model gave no usable argument suggestion.
    #[error("No rg arguments suggested: {0}")]
    NoSuggestion(String),

    /// A numbered line appeared before any file heading.
    #[error("Found code line without preceding filepath: {0}")]
    LineWithoutFile(String),

    /// A parsed block was malformed.
    #[error(transparent)]
    Block(#[from] EditError),

    /// The model call behind a suggestion failed.
    #[error(transparent)]
    Llm(#[from] LlmError),
}
