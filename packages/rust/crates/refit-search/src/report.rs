//! Parser for `rg --heading --line-number --context=N --stats` output.
//!
//! ```text
//! src/app.py
//! 11-def main():
//! 12:    print("x")
//! 13-    return 0
//! --
//! 40:print("y")
//!
//! src/lib.py
//! 3:print("z")
//!
//! 3 matches
//! 3 matched lines
//! 2 files contained matches
//! ```
//!
//! `N:` lines matched, `N-` lines are context, `--` separates
//! non-adjacent groups, and any other line names the file that follows.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use refit_core::{CodeBlock, Line, TargetFile};

use crate::error::SearchError;

static CODE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)([:-])(.*)$").unwrap_or_else(|err| panic!("invalid CODE_LINE_RE regex: {err}"))
});

static MATCHES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+matches$").unwrap_or_else(|err| panic!("invalid MATCHES_RE regex: {err}"))
});

static MATCHED_LINES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+matched lines$")
        .unwrap_or_else(|err| panic!("invalid MATCHED_LINES_RE regex: {err}"))
});

static FILES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+files contained matches$")
        .unwrap_or_else(|err| panic!("invalid FILES_RE regex: {err}"))
});

/// Counters from the `--stats` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RgStats {
    /// `N matches`
    pub matches: usize,
    /// `N matched lines`
    pub matched_lines: usize,
    /// `N files contained matches`
    pub files_with_matches: usize,
}

/// Parsed search report.
#[derive(Debug, Clone, Default)]
pub struct RgReport {
    /// Files with their blocks, in report order.
    pub files: Vec<TargetFile>,
    /// Statistics section, verbatim.
    pub stats_raw: String,
}

/// Parse the counters of a `--stats` section; absent counters are zero.
#[must_use]
pub fn parse_rg_stats(stats: &str) -> RgStats {
    let mut out = RgStats::default();
    let number = |re: &Regex, line: &str| {
        re.captures(line)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<usize>().ok())
    };
    for line in stats.lines().map(str::trim) {
        if let Some(n) = number(&MATCHES_RE, line) {
            out.matches = n;
        } else if let Some(n) = number(&MATCHED_LINES_RE, line) {
            out.matched_lines = n;
        } else if let Some(n) = number(&FILES_RE, line) {
            out.files_with_matches = n;
        }
    }
    out
}

/// Split a report into its match section and its statistics section.
///
/// The statistics start at the last `N matches` line.
#[must_use]
pub fn split_stats(stdout: &str) -> (Vec<&str>, String) {
    let lines: Vec<&str> = stdout.trim().lines().collect();
    match lines.iter().rposition(|line| MATCHES_RE.is_match(line.trim())) {
        Some(start) => (lines[..start].to_vec(), lines[start..].join("\n").trim().to_string()),
        None => (lines, String::new()),
    }
}

/// Groups lines into blocks and blocks into files.
#[derive(Default)]
struct ReportBuilder {
    files: Vec<TargetFile>,
    current_path: Option<PathBuf>,
    current_lines: Vec<Line>,
}

impl ReportBuilder {
    fn finish_block(&mut self) -> Result<(), SearchError> {
        if self.current_lines.is_empty() {
            return Ok(());
        }
        let Some(path) = self.current_path.clone() else {
            return Ok(());
        };
        let lines = std::mem::take(&mut self.current_lines);
        let start = lines[0].line_number;
        let block = CodeBlock::new(&path, start, lines)?;
        match self.files.iter_mut().find(|f| f.filepath() == path.as_path()) {
            Some(file) => file.push_block(block),
            None => self.files.push(TargetFile::new(path, vec![block])),
        }
        Ok(())
    }

    fn start_file(&mut self, path: &str) -> Result<(), SearchError> {
        self.finish_block()?;
        self.current_path = Some(PathBuf::from(path));
        Ok(())
    }

    fn push_line(&mut self, raw: &str, line: Line) -> Result<(), SearchError> {
        if self.current_path.is_none() {
            return Err(SearchError::LineWithoutFile(raw.to_string()));
        }
        let contiguous = self
            .current_lines
            .last()
            .is_none_or(|last| last.line_number + 1 == line.line_number);
        if !contiguous {
            tracing::debug!(line = line.line_number, "gap without separator; starting new block");
            self.finish_block()?;
        }
        self.current_lines.push(line);
        Ok(())
    }
}

/// Parse the match section of a report into target files.
///
/// # Errors
/// [`SearchError::LineWithoutFile`] when a numbered line precedes every
/// file heading.
pub fn parse_match_lines(lines: &[&str]) -> Result<Vec<TargetFile>, SearchError> {
    let mut builder = ReportBuilder::default();
    for raw in lines {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "--" {
            builder.finish_block()?;
            continue;
        }
        let code_line = CODE_LINE_RE.captures(raw).and_then(|caps| {
            let number = caps[1].parse::<usize>().ok()?;
            Some(Line::matched(number, &caps[3], &caps[2] == ":"))
        });
        match code_line {
            Some(line) => builder.push_line(raw, line)?,
            None => builder.start_file(trimmed)?,
        }
    }
    builder.finish_block()?;
    Ok(builder.files)
}

/// Parse a complete report: matches and statistics.
///
/// # Errors
/// Same as [`parse_match_lines`].
pub fn parse_rg_report(stdout: &str) -> Result<RgReport, SearchError> {
    let (match_lines, stats_raw) = split_stats(stdout);
    let files = parse_match_lines(&match_lines)?;
    Ok(RgReport { files, stats_raw })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stats() {
        let stats = parse_rg_stats("4 matches\n3 matched lines\n2 files contained matches\n9 files searched");
        assert_eq!(
            stats,
            RgStats {
                matches: 4,
                matched_lines: 3,
                files_with_matches: 2
            }
        );
        assert_eq!(parse_rg_stats(""), RgStats::default());
    }

    #[test]
    fn test_split_stats_uses_last_marker() {
        let (lines, stats) = split_stats("a.py\n1:x\n\n1 matches\n1 matched lines\n");
        assert_eq!(lines, vec!["a.py", "1:x", ""]);
        assert_eq!(stats, "1 matches\n1 matched lines");
    }

    #[test]
    fn test_line_before_file() {
        let err = parse_match_lines(&["12:x = 1"]).unwrap_err();
        assert!(matches!(err, SearchError::LineWithoutFile(_)));
    }

    #[test]
    fn test_gap_without_separator_splits_block() {
        let files = parse_match_lines(&["f.c", "1:a", "2-b", "7:c"]).unwrap();
        assert_eq!(files[0].blocks_to_edit().len(), 2);
        assert_eq!(files[0].blocks_to_edit()[1].start_line(), 7);
    }
}
