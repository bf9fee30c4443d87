//! Line structure of a source file.
//!
//! Edits are expressed in 1-based line numbers, so the file is viewed as a
//! list of lines that keep their own terminators. Untouched lines can then
//! be written back byte-for-byte.

use std::fs;
use std::path::Path;

use crate::error::IoError;
use crate::read::read_text_safe;

/// Line terminator convention of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// Detect the convention: CRLF as soon as one `\r\n` is present.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::CrLf
        } else {
            Self::Lf
        }
    }

    /// The terminator itself.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Text of a source file together with its line-ending convention.
#[derive(Debug, Clone)]
pub struct SourceText {
    text: String,
    ending: LineEnding,
}

impl SourceText {
    /// Wrap already-loaded text.
    #[must_use]
    pub fn new(text: String) -> Self {
        let ending = LineEnding::detect(&text);
        Self { text, ending }
    }

    /// Read a file with [`read_text_safe`].
    ///
    /// # Errors
    /// Propagates the read errors of [`read_text_safe`].
    pub fn read<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<Self, IoError> {
        read_text_safe(path, max_bytes).map(Self::new)
    }

    /// Full text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Detected line-ending convention.
    #[must_use]
    pub fn line_ending(&self) -> LineEnding {
        self.ending
    }

    /// Lines including their terminators. The last line may lack one.
    #[must_use]
    pub fn lines_inclusive(&self) -> Vec<&str> {
        self.text.split_inclusive('\n').collect()
    }

    /// Lines without terminators (`\r\n` and `\n` both stripped).
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    /// Number of lines; a trailing terminator does not open a new line.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

/// Replace the content of `path` with `content` in one write.
///
/// # Errors
/// Returns [`IoError::Write`] with the path when the write fails.
pub fn write_text<P: AsRef<Path>>(path: P, content: &str) -> Result<(), IoError> {
    let path = path.as_ref();
    fs::write(path, content).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "file rewritten");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_line_ending() {
        assert_eq!(LineEnding::detect("a\nb\n"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a\r\nb\r\n"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("single"), LineEnding::Lf);
    }

    #[test]
    fn test_inclusive_and_plain_lines_agree() {
        for text in ["", "a", "a\n", "a\nb", "a\n\n", "a\r\nb\r\n"] {
            let source = SourceText::new(text.to_string());
            assert_eq!(source.lines_inclusive().len(), source.line_count(), "{text:?}");
            assert_eq!(source.lines_inclusive().concat(), text);
        }
    }

    #[test]
    fn test_crlf_lines_strip_carriage_return() {
        let source = SourceText::new("x = 1\r\ny = 2\r\n".to_string());
        let lines: Vec<_> = source.lines().collect();
        assert_eq!(lines, vec!["x = 1", "y = 2"]);
        assert_eq!(source.line_ending().as_str(), "\r\n");
    }
}
