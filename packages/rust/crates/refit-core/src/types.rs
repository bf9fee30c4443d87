//! Configuration and report types shared by the edit pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Limits applied when reading files for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// Maximum file size in bytes (default 8MB).
    pub max_file_size: u64,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            max_file_size: 8 * 1024 * 1024,
        }
    }
}

/// Batching knobs for model dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Most blocks sent in one model call.
    pub max_blocks_per_call: usize,
    /// Assumed ratio of model output tokens to block tokens.
    pub output_expansion_factor: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_blocks_per_call: 20,
            output_expansion_factor: 5,
        }
    }
}

/// Outcome of committing one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitReport {
    /// File rewritten.
    pub path: PathBuf,
    /// Edited blocks spliced in, no-ops included.
    pub blocks_applied: usize,
    /// Line count before the write.
    pub lines_before: usize,
    /// Line count after the write.
    pub lines_after: usize,
}

/// Proposed content of one file, not yet written.
#[derive(Debug, Clone, Serialize)]
pub struct FilePreview {
    /// File the preview is for.
    pub path: PathBuf,
    /// Content on disk.
    pub original: String,
    /// Content after the edits.
    pub modified: String,
    /// Unified diff from `original` to `modified`.
    pub diff: String,
}

impl FilePreview {
    /// True when the edits leave the file unchanged.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.original == self.modified
    }
}
