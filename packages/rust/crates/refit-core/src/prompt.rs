//! Prompt construction for batched block rewriting.
//!
//! Every batch shares one preamble; the rendered block fragments are placed
//! at the [`INPUT_BLOCKS_SLOT`] marker.

use std::path::Path;

use crate::block::CodeBlock;

/// Opening marker around each block, in prompts and in model output.
pub const CODE_BLOCK_START: &str = "<code_block>";
/// Closing marker around each block.
pub const CODE_BLOCK_END: &str = "</code_block>";
/// Placeholder replaced by the block fragments of a batch.
pub const INPUT_BLOCKS_SLOT: &str = "%%input_code_blocks%%";

/// Instruction and optional worked example for a rewrite run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPrompt {
    instruction: String,
    example: Option<String>,
}

impl EditPrompt {
    /// Prompt for `instruction` without an example.
    #[must_use]
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            example: None,
        }
    }

    /// Attach a worked example; blank examples are dropped.
    #[must_use]
    pub fn with_example(mut self, example: Option<String>) -> Self {
        self.example = example.filter(|text| !text.trim().is_empty());
        self
    }

    /// The user's instruction.
    #[must_use]
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// The worked example, if any.
    #[must_use]
    pub fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }

    /// Preamble shared by all batches, containing [`INPUT_BLOCKS_SLOT`].
    #[must_use]
    pub fn template(&self) -> String {
        let goal = &self.instruction;
        let mut out = format!(
            "You are an experienced programmer performing a mechanical refactoring.\n\
             \n\
             Several blocks of code follow. Rewrite each block according to the goal below.\n\
             Rules:\n\
             1. Change only lines inside each block; keep the original indentation style.\n\
             2. For every input block, output the complete new version of that block.\n\
             3. Lines that need no change are output exactly as given.\n\
             4. No explanations, no line numbers, no markdown fences.\n\
             5. Wrap each output block in {CODE_BLOCK_START} and {CODE_BLOCK_END}, in input order.\n\
             6. If the request cannot be carried out, reply with a single line starting with \"Error:\".\n\
             \n\
             Goal: \"{goal}\"\n"
        );
        if let Some(example) = &self.example {
            out.push_str("\nExample of the desired rewrite:\n[Example]\n");
            out.push_str(example.trim_end());
            out.push_str("\n[Example End]\n");
        }
        out.push_str("\n[Input Code Blocks]\n");
        out.push_str(INPUT_BLOCKS_SLOT);
        out.push_str("\n\n[Output Code Blocks]\n");
        out
    }

    /// Full prompt for one batch of rendered fragments.
    #[must_use]
    pub fn render<S: AsRef<str>>(&self, fragments: &[S]) -> String {
        let joined = fragments
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("\n");
        self.template().replace(INPUT_BLOCKS_SLOT, &joined)
    }
}

/// Fragment for one block: its unnumbered lines between the markers.
#[must_use]
pub fn render_block_fragment(block: &CodeBlock) -> String {
    format!(
        "{CODE_BLOCK_START}\n{}{CODE_BLOCK_END}\n",
        block.without_line_numbers()
    )
}

/// Read an example file; a missing or unreadable file yields `None`.
pub fn load_example_file<P: AsRef<Path>>(path: P) -> Option<String> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(error) => {
            tracing::warn!(path = %path.display(), error = %error, "example file not loaded");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_shape() {
        let block = CodeBlock::from_contents("a.c", 3, ["int x;", "  x++;"]);
        assert_eq!(
            render_block_fragment(&block),
            "<code_block>\nint x;\n  x++;\n</code_block>\n"
        );
    }

    #[test]
    fn test_render_fills_slot_for_every_batch() {
        let prompt = EditPrompt::new("use snprintf");
        let first = prompt.render(&["<code_block>\na\n</code_block>\n"]);
        let second = prompt.render(&["<code_block>\nb\n</code_block>\n"]);

        assert!(!first.contains(INPUT_BLOCKS_SLOT));
        assert!(!second.contains(INPUT_BLOCKS_SLOT));
        assert!(first.contains("a\n</code_block>"));
        assert!(second.contains("b\n</code_block>"));
        assert!(first.contains("\"use snprintf\""));
    }

    #[test]
    fn test_example_section() {
        let plain = EditPrompt::new("goal");
        assert!(!plain.template().contains("[Example]"));

        let with = EditPrompt::new("goal").with_example(Some("before -> after".to_string()));
        let template = with.template();
        assert!(template.contains("[Example]\nbefore -> after\n[Example End]"));

        let blank = EditPrompt::new("goal").with_example(Some("  \n".to_string()));
        assert!(blank.example().is_none());
    }

    #[test]
    fn test_missing_example_file() {
        assert!(load_example_file("/definitely/not/here.example").is_none());
    }
}
