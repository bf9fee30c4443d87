//! refit CLI: search, rewrite with a language model, review and apply.
//!
//! Settings come from `.refit/settings.yaml` and `<config home>/refit/settings.yaml`.
//!
//! Logging: set `RUST_LOG=refit=debug` (or pass `--verbose`) to see pipeline logs on stderr.

mod cli;

use std::io::{self, Write};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use refit_cli::{
    EditOutcome, EditRequest, build_model, load_settings, resolve_rg_args, run_edit,
    set_config_home_override, write_usage_summary,
};
use refit_llm::{GeminiModel, UsageTracker};
use refit_search::gather_search_results;

use crate::cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(conf_dir) = cli.conf.clone() {
        set_config_home_override(conf_dir);
    }

    // RUST_LOG overrides; --verbose => debug; else info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "refit=debug"
        } else {
            "refit=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let settings = load_settings();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut usage = UsageTracker::new();

    match cli.command {
        Command::Edit {
            goal,
            folder,
            rg_args,
            example,
            strategy,
            model,
            max_blocks,
            context,
            diff,
            yes,
            dry_run,
        } => {
            let client = build_model(&settings, model.as_deref())?;
            let request = EditRequest {
                goal,
                folder,
                rg_args,
                example,
                strategy,
                show_diff: diff,
                assume_yes: yes,
                dry_run,
                max_blocks_per_call: max_blocks,
                context_lines: context,
            };
            let outcome = run_edit(
                &client,
                &request,
                &settings,
                &mut io::stdin().lock(),
                &mut out,
                &mut usage,
            )?;
            write_usage_summary(&mut out, &usage)?;
            if let EditOutcome::Applied(report) = outcome
                && !report.is_success()
            {
                anyhow::bail!("{} files could not be edited", report.failed.len());
            }
            Ok(())
        }
        Command::Search {
            folder,
            rg_args,
            goal,
            model,
            context,
        } => {
            let args = match rg_args {
                Some(args) => args,
                None => {
                    let client = build_model(&settings, model.as_deref())?;
                    let context_lines = context.unwrap_or(settings.search_config().context_lines);
                    resolve_rg_args(
                        &client,
                        goal.as_deref().unwrap_or_default(),
                        &folder,
                        None,
                        context_lines,
                        &mut usage,
                    )?
                }
            };
            writeln!(out, "Searching with: rg {args} {folder}")?;
            let result = gather_search_results(&args, &folder)?;
            out.write_all(result.format_summary().as_bytes())?;
            writeln!(out, "{}", result.rg_stats_raw)?;
            write_usage_summary(&mut out, &usage)?;
            Ok(())
        }
        Command::Models => {
            for model in GeminiModel::all() {
                let limits = model.limits();
                writeln!(
                    out,
                    "{:<32} {:>4}  input {:>9}  output {:>7}",
                    model.code_name(),
                    model.version_family(),
                    limits.input_tokens,
                    limits.output_tokens
                )?;
            }
            Ok(())
        }
    }
}
