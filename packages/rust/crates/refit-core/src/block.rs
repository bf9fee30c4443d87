//! Numbered lines and contiguous code blocks.
//!
//! A [`CodeBlock`] is a run of consecutive lines of one file, identified by
//! its 1-based `start_line`. Blocks are what the search step produces and
//! what the model is asked to rewrite.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::EditError;

/// How a line came out of the search report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LineKind {
    /// Not produced by a search (model output, whole-file reads).
    #[default]
    Plain,
    /// Matched the search pattern.
    Matched,
    /// Printed as context around a match.
    Context,
}

/// One numbered source line, without its terminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    /// 1-based line number.
    pub line_number: usize,
    /// Text of the line.
    pub content: String,
    /// Search role of the line.
    pub kind: LineKind,
}

impl Line {
    /// A plain line.
    #[must_use]
    pub fn new(line_number: usize, content: impl Into<String>) -> Self {
        Self {
            line_number,
            content: content.into(),
            kind: LineKind::Plain,
        }
    }

    /// A line from a search report: a match or a context line.
    #[must_use]
    pub fn matched(line_number: usize, content: impl Into<String>, is_match: bool) -> Self {
        Self {
            line_number,
            content: content.into(),
            kind: if is_match {
                LineKind::Matched
            } else {
                LineKind::Context
            },
        }
    }

    /// Whether the line matched the search pattern.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.kind == LineKind::Matched
    }

    /// A copy carrying another line number.
    #[must_use]
    pub fn renumbered(&self, line_number: usize) -> Self {
        Self {
            line_number,
            content: self.content.clone(),
            kind: self.kind,
        }
    }
}

/// Contiguous lines of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    filepath: PathBuf,
    start_line: usize,
    lines: Vec<Line>,
}

impl CodeBlock {
    /// Build a block from already-numbered lines.
    ///
    /// # Errors
    /// [`EditError::NonContiguousBlock`] unless line `i` is numbered
    /// `start_line + i`.
    pub fn new(
        filepath: impl Into<PathBuf>,
        start_line: usize,
        lines: Vec<Line>,
    ) -> Result<Self, EditError> {
        let filepath = filepath.into();
        for (index, line) in lines.iter().enumerate() {
            let expected = start_line + index;
            if line.line_number != expected {
                return Err(EditError::NonContiguousBlock {
                    path: filepath,
                    index,
                    expected,
                    found: line.line_number,
                });
            }
        }
        Ok(Self {
            filepath,
            start_line,
            lines,
        })
    }

    /// Build a block of plain lines numbered from `start_line`.
    #[must_use]
    pub fn from_contents<I, S>(filepath: impl Into<PathBuf>, start_line: usize, contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = contents
            .into_iter()
            .enumerate()
            .map(|(i, content)| Line::new(start_line + i, content))
            .collect();
        Self {
            filepath: filepath.into(),
            start_line,
            lines,
        }
    }

    pub(crate) fn from_numbered(filepath: PathBuf, start_line: usize, lines: Vec<Line>) -> Self {
        debug_assert!(
            lines
                .iter()
                .enumerate()
                .all(|(i, l)| l.line_number == start_line + i)
        );
        Self {
            filepath,
            start_line,
            lines,
        }
    }

    /// File the block belongs to.
    #[must_use]
    pub fn filepath(&self) -> &Path {
        &self.filepath
    }

    /// First line number.
    #[must_use]
    pub fn start_line(&self) -> usize {
        self.start_line
    }

    /// The lines, in order.
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Last line number; `start_line - 1` for an empty block.
    #[must_use]
    pub fn end_line(&self) -> usize {
        (self.start_line + self.lines.len()).saturating_sub(1)
    }

    /// Number of lines.
    #[must_use]
    pub fn len_lines(&self) -> usize {
        self.lines.len()
    }

    /// True when the block holds no line.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line contents, in order.
    pub fn contents(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.content.as_str())
    }

    /// `"N: text"` per line, each followed by a newline.
    #[must_use]
    pub fn with_line_numbers(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            let _ = writeln!(out, "{}: {}", line.line_number, line.content.trim_end());
        }
        out
    }

    /// Line contents, each followed by a newline.
    #[must_use]
    pub fn without_line_numbers(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line.content.trim_end());
            out.push('\n');
        }
        out
    }

    /// Numbers of the lines that matched the search.
    #[must_use]
    pub fn matched_line_numbers(&self) -> Vec<usize> {
        self.lines
            .iter()
            .filter(|line| line.is_match())
            .map(|line| line.line_number)
            .collect()
    }

    /// How many lines matched the search.
    #[must_use]
    pub fn num_matched_lines(&self) -> usize {
        self.lines.iter().filter(|line| line.is_match()).count()
    }
}
