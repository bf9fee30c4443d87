//! Replacement content for one original block.

use std::path::Path;

use serde::Serialize;

use crate::block::{CodeBlock, Line};

/// New lines for the span covered by an original block.
///
/// The new lines are numbered from the original block's `start_line`, no
/// matter how the input lines were numbered. The line count may differ from
/// the original's; the committer shifts later blocks accordingly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditedBlock {
    block: CodeBlock,
    original: CodeBlock,
}

impl EditedBlock {
    /// Replacement built from raw line contents.
    #[must_use]
    pub fn new<I, S>(contents: I, original: CodeBlock) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let block = CodeBlock::from_contents(
            original.filepath().to_path_buf(),
            original.start_line(),
            contents,
        );
        Self { block, original }
    }

    /// Replacement built from existing lines, renumbered.
    ///
    /// The input lines are copied; they are never mutated.
    #[must_use]
    pub fn from_lines(lines: &[Line], original: CodeBlock) -> Self {
        let start = original.start_line();
        let renumbered = lines
            .iter()
            .enumerate()
            .map(|(i, line)| line.renumbered(start + i))
            .collect();
        let block = CodeBlock::from_numbered(original.filepath().to_path_buf(), start, renumbered);
        Self { block, original }
    }

    /// Replacement parsed from a text body, one line per `\n`.
    #[must_use]
    pub fn from_code_string(text: &str, original: CodeBlock) -> Self {
        Self::new(text.lines(), original)
    }

    /// Replacement identical to the original.
    #[must_use]
    pub fn no_op(original: CodeBlock) -> Self {
        Self {
            block: original.clone(),
            original,
        }
    }

    /// True when applying this edit changes nothing.
    #[must_use]
    pub fn is_no_op(&self) -> bool {
        self.block.len_lines() == self.original.len_lines()
            && self.block.contents().eq(self.original.contents())
    }

    /// The new lines as a block.
    #[must_use]
    pub fn block(&self) -> &CodeBlock {
        &self.block
    }

    /// The block being replaced.
    #[must_use]
    pub fn original_block(&self) -> &CodeBlock {
        &self.original
    }

    /// File the edit targets.
    #[must_use]
    pub fn filepath(&self) -> &Path {
        self.original.filepath()
    }

    /// First original line replaced.
    #[must_use]
    pub fn start_line(&self) -> usize {
        self.original.start_line()
    }

    /// The new lines.
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        self.block.lines()
    }

    /// Number of new lines.
    #[must_use]
    pub fn len_lines(&self) -> usize {
        self.block.len_lines()
    }

    /// Last original line replaced.
    #[must_use]
    pub fn original_end_line(&self) -> usize {
        self.original.end_line()
    }

    /// Number of original lines replaced.
    #[must_use]
    pub fn len_lines_of_original_block(&self) -> usize {
        self.original.len_lines()
    }

    /// Change in file length caused by this edit.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn line_delta(&self) -> isize {
        self.len_lines() as isize - self.len_lines_of_original_block() as isize
    }
}

impl AsRef<CodeBlock> for EditedBlock {
    fn as_ref(&self) -> &CodeBlock {
        &self.block
    }
}
