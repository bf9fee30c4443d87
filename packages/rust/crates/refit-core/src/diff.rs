//! Diff generation utilities.
//!
//! Provides unified diff output for edit previews using the `similar` crate.

use std::path::Path;

use similar::TextDiff;

/// Generate a unified diff between two versions of `path`.
///
/// Hunks carry three lines of context and `@@` headers; the file headers
/// are `a/<path>` and `b/<path>`. Identical inputs give an empty string.
#[must_use]
pub fn generate_unified_diff(path: &Path, original: &str, modified: &str) -> String {
    if original == modified {
        return String::new();
    }
    let display = path.display().to_string();
    TextDiff::from_lines(original, modified)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{display}"), &format!("b/{display}"))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_diff() {
        let diff = generate_unified_diff(
            Path::new("src/app.py"),
            "line1\nold_text\nline3\n",
            "line1\nnew_text\nline3\n",
        );

        assert!(diff.starts_with("--- a/src/app.py\n+++ b/src/app.py\n"));
        assert!(diff.contains("@@ -1,3 +1,3 @@"));
        assert!(diff.contains("-old_text\n"));
        assert!(diff.contains("+new_text\n"));
    }

    #[test]
    fn test_no_changes() {
        assert!(generate_unified_diff(Path::new("x"), "same\n", "same\n").is_empty());
    }
}
