#![allow(clippy::doc_markdown)]

//! refit-tokenizer - Token counting for batch budgeting
//!
//! Uses tiktoken-rs for BPE tokenization (cl100k_base by default).
//! The dispatcher only needs an estimate that grows with the text, so the
//! counter never fails: when the BPE tables cannot be initialised it falls
//! back to a whitespace heuristic.
//!
//! # Example
//!
//! ```rust,ignore
//! use refit_tokenizer::count_tokens;
//!
//! let count = count_tokens("fn main() {}");
//! ```

use std::sync::OnceLock;
use thiserror::Error;

/// Errors for tokenization operations.
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// The requested encoding name is not known.
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),
    /// Failed to initialize the BPE tables for an encoding.
    #[error("Tokenization model initialization failed: {0}")]
    ModelInit(String),
}

/// Cached cl100k_base BPE instance. `None` records a failed initialisation
/// so we do not retry on every call.
static CL100K_BASE: OnceLock<Option<tiktoken_rs::CoreBPE>> = OnceLock::new();

fn cl100k_base() -> Option<&'static tiktoken_rs::CoreBPE> {
    CL100K_BASE
        .get_or_init(|| match tiktoken_rs::cl100k_base() {
            Ok(bpe) => Some(bpe),
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    "cl100k_base unavailable; falling back to estimated token counts"
                );
                None
            }
        })
        .as_ref()
}

/// Count tokens in text using cl100k_base.
///
/// The BPE model is cached globally. If it cannot be loaded the count is
/// estimated from whitespace-separated words.
#[must_use]
pub fn count_tokens(text: &str) -> usize {
    cl100k_base().map_or_else(
        || estimate_token_count(text),
        |bpe| bpe.encode_with_special_tokens(text).len(),
    )
}

/// Count tokens using a specific encoding.
///
/// Supported encodings:
/// - "cl100k_base" - GPT-4 / GPT-3.5 Turbo
/// - "o200k_base"  - GPT-4o
/// - "p50k_base"   - GPT-3 (Codex)
/// - "r50k_base"   - GPT-2
///
/// # Errors
/// Returns [`TokenizerError::UnknownEncoding`] for any other name and
/// [`TokenizerError::ModelInit`] when the tables fail to load.
pub fn count_tokens_with_encoding(text: &str, encoding: &str) -> Result<usize, TokenizerError> {
    if encoding == "cl100k_base" {
        return Ok(count_tokens(text));
    }
    let bpe = match encoding {
        "o200k_base" => tiktoken_rs::o200k_base(),
        "p50k_base" => tiktoken_rs::p50k_base(),
        "r50k_base" => tiktoken_rs::r50k_base(),
        _ => return Err(TokenizerError::UnknownEncoding(encoding.to_string())),
    };

    bpe.map(|bpe| bpe.encode_with_special_tokens(text).len())
        .map_err(|e| TokenizerError::ModelInit(e.to_string()))
}

/// Rough token estimate: two tokens per whitespace-separated word.
#[must_use]
pub fn estimate_token_count(text: &str) -> usize {
    text.split_whitespace().count() * 2
}

/// Get the encoding name used to approximate a model family.
///
/// Models without a published tokenizer (Gemini among them) are
/// approximated with cl100k_base.
#[must_use]
pub fn encoding_for_model(model: &str) -> &'static str {
    match model {
        m if m.starts_with("gpt-4o") || m.starts_with("o1") || m.starts_with("o3") => "o200k_base",
        "gpt-3" | "code-davinci-002" | "p50k_base" => "p50k_base",
        "gpt-2" | "r50k_base" => "r50k_base",
        _ => "cl100k_base",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_tokens_simple() {
        let text = "Hello, world! This is a test.";
        assert!(count_tokens(text) > 0);
    }

    #[test]
    fn test_count_tokens_empty() {
        assert_eq!(count_tokens(""), 0);
    }

    #[test]
    fn test_estimate_token_count() {
        assert_eq!(estimate_token_count("one two  three\n"), 6);
        assert_eq!(estimate_token_count("   "), 0);
    }

    #[test]
    fn test_encoding_for_gemini_defaults_to_cl100k() {
        assert_eq!(encoding_for_model("gemini-2.5-pro-preview-03-25"), "cl100k_base");
        assert_eq!(encoding_for_model("gpt-4o-mini"), "o200k_base");
    }
}
