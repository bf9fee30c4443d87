#![allow(clippy::doc_markdown)]

//! refit-search - ripgrep-driven block discovery for Refit
//!
//! Runs `rg` with context and statistics and turns its heading-style report
//! into [`refit_core::CodeMatchedResult`] blocks ready for rewriting.
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! refit-search/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # SearchError enum
//! ├── report.rs   # rg report and --stats parsing
//! ├── runner.rs   # rg invocation, required flags, result assembly
//! └── suggest.rs  # Model-suggested rg arguments
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use refit_search::gather_search_results;
//!
//! let result = gather_search_results(
//!     "--regexp=sprintf --type=c --stats --line-number --heading --context=5",
//!     "src",
//! )?;
//! println!("{}", result.format_summary());
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

mod error;
mod report;
mod runner;
mod suggest;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use error::SearchError;
pub use report::{RgReport, RgStats, parse_match_lines, parse_rg_report, parse_rg_stats, split_stats};
pub use runner::{
    REQUIRED_FLAGS, RgOutput, SearchConfig, build_result, check_required_flags,
    gather_search_results, run_rg, split_args,
};
pub use suggest::{ALLOWED_FLAGS, clean_suggestion, suggest_rg_arguments};
