//! Files selected for editing and the search result that groups them.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use refit_io::SourceText;

use crate::block::CodeBlock;
use crate::commit::{commit_edited_blocks, preview_edited_blocks};
use crate::edited::EditedBlock;
use crate::error::EditError;
use crate::types::{CommitReport, EditConfig, FilePreview};

/// One file with the blocks to rewrite and the rewrites collected so far.
///
/// `apply_edits` runs at most once per file.
#[derive(Debug, Clone)]
pub struct TargetFile {
    filepath: PathBuf,
    blocks_to_edit: Vec<CodeBlock>,
    edited_blocks: Vec<EditedBlock>,
    already_applied: bool,
    whole_file: Option<CodeBlock>,
    config: EditConfig,
}

impl TargetFile {
    /// Target with candidate blocks and default read limits.
    #[must_use]
    pub fn new(filepath: impl Into<PathBuf>, blocks_to_edit: Vec<CodeBlock>) -> Self {
        Self {
            filepath: filepath.into(),
            blocks_to_edit,
            edited_blocks: Vec::new(),
            already_applied: false,
            whole_file: None,
            config: EditConfig::default(),
        }
    }

    /// Replace the read limits.
    #[must_use]
    pub fn with_config(mut self, config: EditConfig) -> Self {
        self.config = config;
        self
    }

    /// Path of the file.
    #[must_use]
    pub fn filepath(&self) -> &Path {
        &self.filepath
    }

    /// Candidate blocks, in search order.
    #[must_use]
    pub fn blocks_to_edit(&self) -> &[CodeBlock] {
        &self.blocks_to_edit
    }

    /// Append a candidate block.
    pub fn push_block(&mut self, block: CodeBlock) {
        self.blocks_to_edit.push(block);
    }

    /// Rewrites collected so far.
    #[must_use]
    pub fn edited_blocks(&self) -> &[EditedBlock] {
        &self.edited_blocks
    }

    /// Whether `apply_edits` already succeeded.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.already_applied
    }

    /// Record a rewrite.
    ///
    /// The block's filepath is checked at commit time, not here.
    ///
    /// # Errors
    /// [`EditError::AlreadyApplied`] once the file was committed.
    pub fn add_edited_block(&mut self, block: EditedBlock) -> Result<(), EditError> {
        if self.already_applied {
            return Err(EditError::AlreadyApplied(self.filepath.clone()));
        }
        self.edited_blocks.push(block);
        Ok(())
    }

    /// The entire file as one block starting at line 1.
    ///
    /// Read on first use and cached afterwards.
    ///
    /// # Errors
    /// Read failures, and [`EditError::AlreadyApplied`] when the file was
    /// committed before the first read.
    pub fn whole_file_as_edit_block(&mut self) -> Result<&CodeBlock, EditError> {
        let block = match self.whole_file.take() {
            Some(block) => block,
            None => {
                if self.already_applied {
                    return Err(EditError::AlreadyApplied(self.filepath.clone()));
                }
                let source = SourceText::read(&self.filepath, self.config.max_file_size)?;
                CodeBlock::from_contents(self.filepath.clone(), 1, source.lines())
            }
        };
        Ok(self.whole_file.insert(block))
    }

    /// Commit every collected rewrite in one write.
    ///
    /// The file is marked applied only when the commit succeeds, so a
    /// rejected commit can be inspected and retried.
    ///
    /// # Errors
    /// [`EditError::AlreadyApplied`] on a second call, plus the commit errors
    /// of [`commit_edited_blocks`].
    pub fn apply_edits(&mut self) -> Result<CommitReport, EditError> {
        if self.already_applied {
            return Err(EditError::AlreadyApplied(self.filepath.clone()));
        }
        let report = commit_edited_blocks(&self.filepath, &self.edited_blocks, &self.config)?;
        self.already_applied = true;
        Ok(report)
    }

    /// The content `apply_edits` would write, with a diff.
    ///
    /// # Errors
    /// Same validation as [`TargetFile::apply_edits`].
    pub fn preview(&self) -> Result<FilePreview, EditError> {
        preview_edited_blocks(&self.filepath, &self.edited_blocks, &self.config)
    }
}

/// Everything one search produced.
#[derive(Debug, Clone, Default)]
pub struct CodeMatchedResult {
    /// Matched files, in report order.
    pub files: Vec<TargetFile>,
    /// Statistics section of the search report, verbatim.
    pub rg_stats_raw: String,
    /// Search command that produced the report.
    pub rg_command_used: String,
}

impl CodeMatchedResult {
    /// Every matched block across all files.
    pub fn matched_blocks(&self) -> impl Iterator<Item = &CodeBlock> {
        self.files.iter().flat_map(|file| file.blocks_to_edit().iter())
    }

    /// Number of blocks.
    #[must_use]
    pub fn total_blocks(&self) -> usize {
        self.matched_blocks().count()
    }

    /// Number of distinct files with at least one block.
    #[must_use]
    pub fn total_files_matched(&self) -> usize {
        self.matched_blocks()
            .map(CodeBlock::filepath)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Number of matched lines across all blocks.
    #[must_use]
    pub fn total_lines_matched(&self) -> usize {
        self.matched_blocks().map(CodeBlock::num_matched_lines).sum()
    }

    /// True when nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_blocks() == 0
    }

    /// Human-readable listing of every block with its line numbers.
    #[must_use]
    pub fn format_summary(&self) -> String {
        let mut out = String::new();
        for block in self.matched_blocks() {
            let _ = writeln!(
                out,
                "{} (lines {}-{}):",
                block.filepath().display(),
                block.start_line(),
                block.end_line()
            );
            out.push_str(&block.with_line_numbers());
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "{} files, {} blocks, {} matched lines",
            self.total_files_matched(),
            self.total_blocks(),
            self.total_lines_matched()
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Line;

    fn block(path: &str, start: usize, matched: &[bool]) -> CodeBlock {
        let lines = matched
            .iter()
            .enumerate()
            .map(|(i, m)| Line::matched(start + i, format!("line {}", start + i), *m))
            .collect();
        CodeBlock::new(path, start, lines).unwrap()
    }

    #[test]
    fn test_result_totals() {
        let result = CodeMatchedResult {
            files: vec![
                TargetFile::new("a.py", vec![block("a.py", 1, &[true, false]), block("a.py", 9, &[true, true])]),
                TargetFile::new("b.py", vec![block("b.py", 4, &[false, true, false])]),
            ],
            ..CodeMatchedResult::default()
        };

        assert_eq!(result.total_files_matched(), 2);
        assert_eq!(result.total_blocks(), 3);
        assert_eq!(result.total_lines_matched(), 4);
        assert!(result.format_summary().contains("a.py (lines 9-10):"));
    }

    #[test]
    fn test_empty_result() {
        let result = CodeMatchedResult::default();
        assert!(result.is_empty());
        assert_eq!(result.total_files_matched(), 0);
    }
}
