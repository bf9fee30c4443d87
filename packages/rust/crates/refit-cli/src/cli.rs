use std::path::PathBuf;

use clap::{Parser, Subcommand};

use refit_core::EditStrategy;

#[derive(Parser)]
#[command(name = "refit")]
#[command(about = "Find code with rg, rewrite it with a language model, review and apply.")]
pub(crate) struct Cli {
    /// Override config directory (user settings are read from `<conf>/refit/settings.yaml`).
    #[arg(long, global = true)]
    pub(crate) conf: Option<PathBuf>,

    /// Debug logging (RUST_LOG still wins).
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Rewrite the code matching a search according to GOAL.
    Edit {
        /// Refactoring instruction, e.g. "replace sprintf with snprintf".
        goal: String,

        /// Folder to search.
        #[arg(long, default_value = ".")]
        folder: String,

        /// rg arguments; must include --stats --line-number --heading --context=N.
        /// When omitted the model suggests them.
        #[arg(long, allow_hyphen_values = true)]
        rg_args: Option<String>,

        /// File with a worked example added to the prompt.
        #[arg(long)]
        example: Option<PathBuf>,

        /// replace_matched_blocks or replace_whole_file.
        #[arg(long, default_value_t = EditStrategy::ReplaceMatchedBlocks)]
        strategy: EditStrategy,

        /// Model code name (see `refit models`).
        #[arg(long)]
        model: Option<String>,

        /// Most blocks per model call.
        #[arg(long)]
        max_blocks: Option<usize>,

        /// Context lines around each match for suggested searches.
        #[arg(long)]
        context: Option<usize>,

        /// Print a unified diff per file before confirming.
        #[arg(long)]
        diff: bool,

        /// Apply without asking.
        #[arg(short, long)]
        yes: bool,

        /// Print the plan and stop.
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the blocks a search finds, without editing.
    Search {
        /// Folder to search.
        #[arg(default_value = ".")]
        folder: String,

        /// rg arguments (required flags included).
        #[arg(long, allow_hyphen_values = true, conflicts_with = "goal")]
        rg_args: Option<String>,

        /// Ask the model for rg arguments matching this goal.
        #[arg(long, required_unless_present = "rg_args")]
        goal: Option<String>,

        /// Model code name used for --goal.
        #[arg(long)]
        model: Option<String>,

        /// Context lines around each match for suggested searches.
        #[arg(long)]
        context: Option<usize>,
    },
    /// List supported models with their token limits.
    Models,
}
