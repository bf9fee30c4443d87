//! Edit plans: dispatching every target file's blocks and committing them.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use refit_llm::{LanguageModel, UsageTracker};
use serde::{Deserialize, Serialize};

use crate::block::CodeBlock;
use crate::dispatch::BatchDispatcher;
use crate::error::EditError;
use crate::prompt::EditPrompt;
use crate::target::TargetFile;
use crate::types::{CommitReport, DispatchConfig, FilePreview};

/// Which span of each file the model rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditStrategy {
    /// Only the blocks found by the search.
    #[default]
    ReplaceMatchedBlocks,
    /// The entire file, one file per model call.
    ReplaceWholeFile,
}

impl EditStrategy {
    /// Stable identifier used in config files and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReplaceMatchedBlocks => "replace_matched_blocks",
            Self::ReplaceWholeFile => "replace_whole_file",
        }
    }
}

impl fmt::Display for EditStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('-', "_").as_str() {
            "replace_matched_blocks" | "blocks" => Ok(Self::ReplaceMatchedBlocks),
            "replace_whole_file" | "whole_file" => Ok(Self::ReplaceWholeFile),
            other => Err(format!("unknown edit strategy: {other}")),
        }
    }
}

/// Files carrying their proposed edits, ready to preview or apply.
#[derive(Debug)]
pub struct EditPlan {
    files: Vec<TargetFile>,
    skipped: Vec<(PathBuf, EditError)>,
    calls: usize,
    failed_batches: usize,
}

/// Outcome of [`EditPlan::apply_edits`].
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Files written successfully.
    pub committed: Vec<CommitReport>,
    /// Files left untouched, with the reason.
    pub failed: Vec<(PathBuf, EditError)>,
}

impl ApplyReport {
    /// True when every file was written.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of [`EditPlan::preview`].
#[derive(Debug, Default)]
pub struct PreviewReport {
    /// Proposed content per file that validated.
    pub previews: Vec<FilePreview>,
    /// Files whose edits cannot be previewed, with the reason.
    pub failed: Vec<(PathBuf, EditError)>,
}

/// Ask `model` for rewrites of `files` and attach them to their files.
///
/// With [`EditStrategy::ReplaceWholeFile`] each file becomes one block and
/// one model call, regardless of `config.max_blocks_per_call`. A file that
/// cannot be read whole is left out of the plan and listed in
/// [`EditPlan::skipped`].
///
/// # Errors
/// [`EditError::AlreadyApplied`] for a file that was already committed.
pub fn create_plan(
    mut files: Vec<TargetFile>,
    prompt: &EditPrompt,
    model: &dyn LanguageModel,
    strategy: EditStrategy,
    config: &DispatchConfig,
    usage: Option<&mut UsageTracker>,
) -> Result<EditPlan, EditError> {
    let mut config = *config;
    let mut skipped = Vec::new();
    let blocks: Vec<CodeBlock> = match strategy {
        EditStrategy::ReplaceMatchedBlocks => files
            .iter()
            .flat_map(|file| file.blocks_to_edit().iter().cloned())
            .collect(),
        EditStrategy::ReplaceWholeFile => {
            config.max_blocks_per_call = 1;
            let mut whole = Vec::with_capacity(files.len());
            let mut readable = Vec::with_capacity(files.len());
            for mut file in files {
                match file.whole_file_as_edit_block() {
                    Ok(block) => {
                        whole.push(block.clone());
                        readable.push(file);
                    }
                    Err(error) => {
                        tracing::warn!(
                            path = %file.filepath().display(),
                            error = %error,
                            "file left out of whole-file plan"
                        );
                        skipped.push((file.filepath().to_path_buf(), error));
                    }
                }
            }
            files = readable;
            whole
        }
    };
    tracing::info!(
        files = files.len(),
        blocks = blocks.len(),
        strategy = %strategy,
        "planning edits"
    );

    let outcome = BatchDispatcher::new(model, prompt, config).dispatch(&blocks, usage);

    let index: HashMap<PathBuf, usize> = files
        .iter()
        .enumerate()
        .map(|(i, file)| (file.filepath().to_path_buf(), i))
        .collect();
    for edited in outcome.edited_blocks {
        match index.get(edited.filepath()) {
            Some(&i) => files[i].add_edited_block(edited)?,
            None => tracing::warn!(
                path = %edited.filepath().display(),
                "edited block for a file outside the plan dropped"
            ),
        }
    }

    Ok(EditPlan {
        files,
        skipped,
        calls: outcome.calls,
        failed_batches: outcome.failed_batches,
    })
}

impl EditPlan {
    /// Plan over files whose edits were already attached.
    #[must_use]
    pub fn new(files: Vec<TargetFile>) -> Self {
        Self {
            files,
            skipped: Vec::new(),
            calls: 0,
            failed_batches: 0,
        }
    }

    /// Files in the plan.
    #[must_use]
    pub fn files(&self) -> &[TargetFile] {
        &self.files
    }

    /// Files left out while planning, with the reason.
    #[must_use]
    pub fn skipped(&self) -> &[(PathBuf, EditError)] {
        &self.skipped
    }

    /// Model calls made while planning.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Batches whose blocks were kept unchanged after a model failure.
    #[must_use]
    pub fn failed_batches(&self) -> usize {
        self.failed_batches
    }

    /// Edited blocks across all files, no-ops included.
    #[must_use]
    pub fn edited_block_count(&self) -> usize {
        self.files.iter().map(|f| f.edited_blocks().len()).sum()
    }

    /// Edited blocks that actually change something.
    #[must_use]
    pub fn changed_block_count(&self) -> usize {
        self.files
            .iter()
            .flat_map(TargetFile::edited_blocks)
            .filter(|b| !b.is_no_op())
            .count()
    }

    /// Plan summary as text.
    #[must_use]
    pub fn format_plan(&self) -> String {
        let mut output = String::from("Edit plan:\n");
        for file in &self.files {
            let changed = file.edited_blocks().iter().filter(|b| !b.is_no_op()).count();
            output.push_str(&format!(
                "  {} ({} blocks, {} changed)\n",
                file.filepath().display(),
                file.edited_blocks().len(),
                changed
            ));
        }
        for (path, error) in &self.skipped {
            output.push_str(&format!("  {} skipped: {error}\n", path.display()));
        }
        output.push_str(&format!(
            "{} files, {} changed blocks, {} model calls",
            self.files.len(),
            self.changed_block_count(),
            self.calls
        ));
        if self.failed_batches > 0 {
            output.push_str(&format!(", {} failed batches", self.failed_batches));
        }
        output.push('\n');
        output
    }

    /// Write [`EditPlan::format_plan`] to `out`.
    ///
    /// # Errors
    /// Propagates write errors.
    pub fn print_plan<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.format_plan().as_bytes())
    }

    /// Proposed content and diff per file that has edited blocks.
    ///
    /// A file that cannot be read or fails validation is reported in
    /// [`PreviewReport::failed`]; the other files are still previewed.
    #[must_use]
    pub fn preview(&self) -> PreviewReport {
        let mut report = PreviewReport::default();
        for file in self.files.iter().filter(|f| !f.edited_blocks().is_empty()) {
            match file.preview() {
                Ok(preview) => report.previews.push(preview),
                Err(error) => {
                    tracing::warn!(path = %file.filepath().display(), error = %error, "preview failed");
                    report.failed.push((file.filepath().to_path_buf(), error));
                }
            }
        }
        report
    }

    /// Commit every file once.
    ///
    /// A file that fails validation is left untouched and reported; the
    /// other files are still written.
    pub fn apply_edits(&mut self) -> ApplyReport {
        let mut report = ApplyReport::default();
        for file in &mut self.files {
            match file.apply_edits() {
                Ok(commit) => report.committed.push(commit),
                Err(error) => {
                    tracing::error!(path = %file.filepath().display(), error = %error, "edits not applied");
                    report.failed.push((file.filepath().to_path_buf(), error));
                }
            }
        }
        report
    }

    /// File with the given path.
    #[must_use]
    pub fn file(&self, path: &Path) -> Option<&TargetFile> {
        self.files.iter().find(|f| f.filepath() == path)
    }
}
