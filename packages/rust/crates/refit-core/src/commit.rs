//! Splicing edited blocks back into a file.
//!
//! Blocks are applied in ascending `start_line` order. Each block's position
//! is shifted by the running `line_offset`, the sum of
//! `new_len - original_len` over every block already applied, so that line
//! numbers taken from the original file stay valid after earlier edits grew
//! or shrank it.
//!
//! All validation happens before the single write: a rejected commit leaves
//! the file untouched.

use std::path::Path;

use refit_io::{SourceText, write_text};

use crate::diff::generate_unified_diff;
use crate::edited::EditedBlock;
use crate::error::EditError;
use crate::types::{CommitReport, EditConfig, FilePreview};

/// Compute the content of `path` after applying `blocks` to `source`.
///
/// Pure: nothing is read or written. Replaced lines take the line ending
/// detected in `source`; untouched lines keep their bytes. A file without a
/// final newline still has none afterwards.
///
/// # Errors
/// - [`EditError::FilepathMismatch`] when a block names another file
/// - [`EditError::OverlappingEdits`] when two original spans intersect
/// - [`EditError::OutOfRange`] when a span reaches past the end of the file
pub fn splice_edited_blocks(
    path: &Path,
    source: &SourceText,
    blocks: &[EditedBlock],
) -> Result<String, EditError> {
    let ordered = validate(path, source, blocks)?;

    let ending = source.line_ending().as_str();
    let mut lines: Vec<String> = source
        .lines_inclusive()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut line_offset: isize = 0;
    for block in ordered {
        let start = block.start_line().saturating_add_signed(line_offset) - 1;
        let end = start + block.len_lines_of_original_block();
        let replacement = block.lines().iter().map(|line| {
            let mut text = line.content.clone();
            text.push_str(ending);
            text
        });
        lines.splice(start..end, replacement);
        line_offset += block.line_delta();
    }

    let mut modified = lines.concat();
    let text = source.as_str();
    if !text.is_empty() && !text.ends_with('\n') && modified.ends_with(ending) {
        modified.truncate(modified.len() - ending.len());
    }
    Ok(modified)
}

/// Check every block against `path` and `source`; return them sorted.
fn validate<'a>(
    path: &Path,
    source: &SourceText,
    blocks: &'a [EditedBlock],
) -> Result<Vec<&'a EditedBlock>, EditError> {
    if let Some(stray) = blocks.iter().find(|b| b.filepath() != path) {
        return Err(EditError::FilepathMismatch {
            expected: path.to_path_buf(),
            found: stray.filepath().to_path_buf(),
        });
    }

    let mut ordered: Vec<&EditedBlock> = blocks.iter().collect();
    // An empty-original insertion sorts before a replacement at the same line.
    ordered.sort_by_key(|b| (b.start_line(), b.len_lines_of_original_block()));

    let total = source.line_count();
    for block in &ordered {
        let in_range = block.start_line() >= 1
            && block.original_end_line() <= total
            && block.start_line() <= total + 1;
        if !in_range {
            return Err(EditError::OutOfRange {
                path: path.to_path_buf(),
                end: block.original_end_line(),
                total,
            });
        }
    }

    for pair in ordered.windows(2) {
        let (previous, next) = (pair[0], pair[1]);
        if next.start_line() <= previous.original_end_line() {
            return Err(EditError::OverlappingEdits {
                path: path.to_path_buf(),
                previous_end: previous.original_end_line(),
                next_start: next.start_line(),
            });
        }
    }

    Ok(ordered)
}

/// Read `path`, splice `blocks` in and write the result in one write.
///
/// An empty `blocks` slice performs no write at all.
///
/// # Errors
/// Read and write failures, plus everything [`splice_edited_blocks`] rejects.
pub fn commit_edited_blocks(
    path: &Path,
    blocks: &[EditedBlock],
    config: &EditConfig,
) -> Result<CommitReport, EditError> {
    let source = SourceText::read(path, config.max_file_size)?;
    let lines_before = source.line_count();
    if blocks.is_empty() {
        return Ok(CommitReport {
            path: path.to_path_buf(),
            blocks_applied: 0,
            lines_before,
            lines_after: lines_before,
        });
    }

    let modified = splice_edited_blocks(path, &source, blocks)?;
    write_text(path, &modified)?;

    let lines_after = modified.lines().count();
    tracing::info!(
        path = %path.display(),
        blocks = blocks.len(),
        lines_before,
        lines_after,
        "edits committed"
    );
    Ok(CommitReport {
        path: path.to_path_buf(),
        blocks_applied: blocks.len(),
        lines_before,
        lines_after,
    })
}

/// Compute what [`commit_edited_blocks`] would write, without writing.
///
/// # Errors
/// Same as [`commit_edited_blocks`], minus write failures.
pub fn preview_edited_blocks(
    path: &Path,
    blocks: &[EditedBlock],
    config: &EditConfig,
) -> Result<FilePreview, EditError> {
    let source = SourceText::read(path, config.max_file_size)?;
    let modified = splice_edited_blocks(path, &source, blocks)?;
    let original = source.as_str().to_string();
    let diff = generate_unified_diff(path, &original, &modified);
    Ok(FilePreview {
        path: path.to_path_buf(),
        original,
        modified,
        diff,
    })
}
