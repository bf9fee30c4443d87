#![allow(clippy::doc_markdown)]

//! refit-cli - Command-line front end for Refit
//!
//! Loads YAML settings, builds the model client and drives the search,
//! plan, confirm and apply flow.
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! refit-cli/src/
//! ├── lib.rs          # Re-exports (this file)
//! ├── main.rs         # `refit` binary: tracing init and command dispatch
//! ├── cli.rs          # clap definitions
//! ├── config/
//! │   └── settings.rs # System/user YAML settings merge
//! └── pipeline.rs     # Edit flow, confirmation, usage summary
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

pub mod config;
mod pipeline;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use config::{RefitSettings, load_settings, set_config_home_override};
pub use pipeline::{
    EditOutcome, EditRequest, build_model, confirm, edit_matches, resolve_rg_args, run_edit,
    write_apply_report, write_usage_summary,
};
