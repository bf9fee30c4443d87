#![allow(clippy::doc_markdown)]

//! refit-io - Source file reading and rewriting for Refit
//!
//! Everything the edit pipeline needs from the filesystem:
//!
//! - **Safe reads**: size limit, binary detection, lossy UTF-8 fallback
//! - **Line structure**: line-ending detection and terminator-preserving splits
//! - **Whole writes**: a file is rewritten with a single write call
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! refit-io/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # IoError enum
//! ├── read.rs     # Size-limited, binary-aware text reads
//! └── lines.rs    # LineEnding, SourceText, write_text
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use refit_io::{SourceText, write_text};
//!
//! let source = SourceText::read("src/lib.rs", 1024 * 1024)?;
//! let ending = source.line_ending();
//! write_text("src/lib.rs", &source.lines_inclusive().concat())?;
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

mod error;
mod lines;
mod read;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use error::IoError;
pub use lines::{LineEnding, SourceText, write_text};
pub use read::{decode_buffer, is_binary, read_text_safe};
