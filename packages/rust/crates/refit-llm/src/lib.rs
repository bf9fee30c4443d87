#![allow(clippy::doc_markdown)]

//! refit-llm - Model transport and token accounting for Refit
//!
//! The edit pipeline treats a model as a blocking `complete(prompt) -> text`
//! call with a token counter and per-model limits. This crate provides that
//! seam ([`LanguageModel`]), the closed registry of supported models, a
//! Gemini HTTP client, and usage/cost tracking.
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! refit-llm/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # LlmError enum (thiserror)
//! ├── model.rs    # GeminiModel registry, ModelLimits, LanguageModel trait
//! ├── pricing.rs  # ModelPricing (flat and tiered)
//! ├── usage.rs    # UsageTracker
//! ├── gemini.rs   # Blocking generateContent client
//! └── mock.rs     # ScriptedModel for tests and offline runs
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use refit_llm::{GeminiClient, GeminiModel, LanguageModel, UsageTracker};
//!
//! let client = GeminiClient::from_env(GeminiModel::Gemini25Pro, "GOOGLE_API_KEY")?;
//! let reply = client.complete("Say hi")?;
//! let mut usage = UsageTracker::new();
//! usage.track(client.name(), client.count_tokens("Say hi"), client.count_tokens(&reply));
//! println!("${:.4}", usage.approximate_cost());
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

mod error;
mod gemini;
mod mock;
mod model;
mod pricing;
mod usage;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use error::LlmError;
pub use gemini::{DEFAULT_GEMINI_ENDPOINT, GeminiClient, GeminiConfig};
pub use mock::ScriptedModel;
pub use model::{GeminiModel, LanguageModel, ModelLimits};
pub use pricing::ModelPricing;
pub use usage::{TokenUsage, UsageTracker};

/// Reserved prefix of a completion that reports a failure in-band.
pub const ERROR_SENTINEL: &str = "Error:";
