//! Error types for block editing.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use std::path::PathBuf;

use refit_io::IoError;
use thiserror::Error;

/// Error types for the edit pipeline.
///
/// Model failures are not represented here: they are absorbed per batch
/// and turn into no-op edits.
#[derive(Error, Debug)]
pub enum EditError {
    /// Reading or writing a source file failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// An edited block belongs to another file than the one being committed.
    #[error("Block {found} does not match filepath {expected}")]
    FilepathMismatch {
        /// File being committed.
        expected: PathBuf,
        /// File named by the offending block.
        found: PathBuf,
    },

    /// `apply_edits` already ran for this file.
    #[error("Edits already applied to {0}")]
    AlreadyApplied(PathBuf),

    /// Two edited blocks replace intersecting original spans.
    #[error(
        "Overlapping edits in {path}: block starting at line {next_start} begins before line {previous_end} ends"
    )]
    OverlappingEdits {
        /// File being committed.
        path: PathBuf,
        /// Last original line of the earlier block.
        previous_end: usize,
        /// First original line of the later block.
        next_start: usize,
    },

    /// An edited block reaches outside the file.
    #[error("Edit in {path} ends at line {end} but the file has {total} lines")]
    OutOfRange {
        /// File being committed.
        path: PathBuf,
        /// Last original line the block replaces.
        end: usize,
        /// Line count of the file on disk.
        total: usize,
    },

    /// Block lines are not numbered `start_line, start_line + 1, ...`.
    #[error("Block in {path} is not contiguous at index {index}: expected line {expected}, found {found}")]
    NonContiguousBlock {
        /// File of the block.
        path: PathBuf,
        /// Position of the first bad line.
        index: usize,
        /// Line number required there.
        expected: usize,
        /// Line number actually found.
        found: usize,
    },
}
