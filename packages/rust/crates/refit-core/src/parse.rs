//! Parsing model output back into edited blocks.
//!
//! The reply is expected to hold one `<code_block>...</code_block>` segment
//! per input block, in input order. Segments are paired with inputs by
//! position only.

use refit_llm::ERROR_SENTINEL;

use crate::block::CodeBlock;
use crate::edited::EditedBlock;
use crate::prompt::{CODE_BLOCK_END, CODE_BLOCK_START};

/// True when the model refused the whole request.
#[must_use]
pub fn is_error_reply(output: &str) -> bool {
    output.trim_start().starts_with(ERROR_SENTINEL)
}

/// Split `output` into the lines of each delimited segment.
///
/// Only delimiter artifacts are dropped: the rest of the opening marker's
/// line when it is blank, the newline before the closing marker, and a
/// markdown fence line directly inside either marker. Every other line,
/// blank or not, is kept verbatim. A trailing segment without a closing
/// marker is ignored.
#[must_use]
pub fn split_code_blocks(output: &str) -> Vec<Vec<String>> {
    let mut segments = Vec::new();
    let mut rest = output;
    while let Some(open) = rest.find(CODE_BLOCK_START) {
        let body = &rest[open + CODE_BLOCK_START.len()..];
        let Some(close) = body.find(CODE_BLOCK_END) else {
            tracing::debug!("unterminated code block in model output ignored");
            break;
        };
        segments.push(clean_segment(&body[..close]));
        rest = &body[close + CODE_BLOCK_END.len()..];
    }
    segments
}

fn clean_segment(segment: &str) -> Vec<String> {
    let mut body = segment;
    if let Some(newline) = body.find('\n')
        && body[..newline].trim().is_empty()
    {
        body = &body[newline + 1..];
    }
    if let Some(newline) = body.rfind('\n')
        && body[newline + 1..].trim().is_empty()
    {
        body = &body[..newline];
    }
    if body.is_empty() {
        return Vec::new();
    }

    let mut lines: Vec<&str> = body
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    let is_fence = |line: &str| line.trim_start().starts_with("```");
    if lines.first().copied().is_some_and(is_fence) {
        lines.remove(0);
        if lines.last().copied().is_some_and(is_fence) {
            lines.pop();
        }
    }
    lines.into_iter().map(str::to_string).collect()
}

/// Pair the segments of `output` with `originals` by position.
///
/// - an error reply turns every original into a no-op
/// - an empty segment produces nothing for its original
/// - originals beyond the last segment produce nothing
/// - segments beyond the last original are discarded
#[must_use]
pub fn parse_model_output(output: &str, originals: &[&CodeBlock]) -> Vec<EditedBlock> {
    if is_error_reply(output) {
        let reason = output.trim().lines().next().unwrap_or_default();
        tracing::warn!(blocks = originals.len(), reason = %reason, "model rejected batch; keeping originals");
        return originals.iter().map(|b| EditedBlock::no_op((*b).clone())).collect();
    }

    let segments = split_code_blocks(output);
    if segments.len() != originals.len() {
        tracing::warn!(
            expected = originals.len(),
            found = segments.len(),
            "model returned a different number of blocks"
        );
    }

    originals
        .iter()
        .zip(segments)
        .filter_map(|(original, lines)| {
            if lines.is_empty() {
                tracing::debug!(
                    path = %original.filepath().display(),
                    start_line = original.start_line(),
                    "empty block in model output; span left unchanged"
                );
                return None;
            }
            Some(EditedBlock::new(lines, (*original).clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeps_blank_edge_lines() {
        let out = "noise\n<code_block>\n\n  a\n\n  b\n\n</code_block>\ntrailer";
        assert_eq!(split_code_blocks(out), vec![vec!["", "  a", "", "  b", ""]]);
    }

    #[test]
    fn test_split_drops_fences() {
        let out = "<code_block>\n```python\n  a\n\n  b\n```\n</code_block>";
        assert_eq!(split_code_blocks(out), vec![vec!["  a", "", "  b"]]);
    }

    #[test]
    fn test_split_crlf_reply() {
        let out = "<code_block>\r\na\r\n\r\nb\r\n</code_block>";
        assert_eq!(split_code_blocks(out), vec![vec!["a", "", "b"]]);
    }

    #[test]
    fn test_empty_segment() {
        assert!(split_code_blocks("<code_block>\n</code_block>")[0].is_empty());
        assert!(split_code_blocks("<code_block></code_block>")[0].is_empty());
    }

    #[test]
    fn test_markers_on_same_line() {
        let out = "<code_block>x = 1</code_block><code_block>y</code_block>";
        assert_eq!(split_code_blocks(out), vec![vec!["x = 1"], vec!["y"]]);
    }

    #[test]
    fn test_unterminated_segment_ignored() {
        let out = "<code_block>\na\n</code_block>\n<code_block>\nb\n";
        assert_eq!(split_code_blocks(out), vec![vec!["a"]]);
    }

    #[test]
    fn test_error_sentinel() {
        assert!(is_error_reply("  Error: quota"));
        assert!(!is_error_reply("<code_block>Error: x</code_block>"));
    }
}
