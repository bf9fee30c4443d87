#![allow(clippy::doc_markdown)]

//! refit-core - Batched model rewriting of code blocks for Refit
//!
//! Takes contiguous blocks found by a search, has a language model rewrite
//! them in token-budgeted batches, and splices the results back into the
//! source files with correct line offsets.
//!
//! # Features
//!
//! - **Block model**: numbered lines, contiguous blocks, edited blocks
//! - **Batching**: greedy packing under block-count and output-token budgets
//! - **Tolerant parsing**: delimited segments paired with inputs by position
//! - **Offset-correct commits**: ascending splices with a running line offset
//! - **Diff preview**: unified diffs before anything is written
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! refit-core/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # EditError enum (thiserror)
//! ├── types.rs    # EditConfig, DispatchConfig, CommitReport, FilePreview
//! ├── block.rs    # Line, LineKind, CodeBlock
//! ├── edited.rs   # EditedBlock
//! ├── target.rs   # TargetFile, CodeMatchedResult
//! ├── prompt.rs   # EditPrompt and block fragments
//! ├── parse.rs    # Model output parsing
//! ├── dispatch.rs # BatchDispatcher
//! ├── commit.rs   # Splicing and single-write commits
//! ├── diff.rs     # Unified diff generation
//! └── plan.rs     # EditStrategy, EditPlan, create_plan
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use refit_core::{DispatchConfig, EditPrompt, EditStrategy, create_plan};
//!
//! let prompt = EditPrompt::new("replace sprintf with snprintf");
//! let mut plan = create_plan(
//!     result.files,
//!     &prompt,
//!     &model,
//!     EditStrategy::ReplaceMatchedBlocks,
//!     &DispatchConfig::default(),
//!     Some(&mut usage),
//! )?;
//! plan.print_plan(&mut std::io::stdout())?;
//! let report = plan.apply_edits();
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

mod block;
mod commit;
pub mod diff;
mod dispatch;
mod edited;
mod error;
mod parse;
mod plan;
mod prompt;
mod target;
mod types;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use block::{CodeBlock, Line, LineKind};
pub use commit::{commit_edited_blocks, preview_edited_blocks, splice_edited_blocks};
pub use dispatch::{BatchDispatcher, DispatchOutcome};
pub use edited::EditedBlock;
pub use error::EditError;
pub use parse::{is_error_reply, parse_model_output, split_code_blocks};
pub use plan::{ApplyReport, EditPlan, EditStrategy, PreviewReport, create_plan};
pub use prompt::{
    CODE_BLOCK_END, CODE_BLOCK_START, EditPrompt, INPUT_BLOCKS_SLOT, load_example_file,
    render_block_fragment,
};
pub use target::{CodeMatchedResult, TargetFile};
pub use types::{CommitReport, DispatchConfig, EditConfig, FilePreview};
