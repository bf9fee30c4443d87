//! Running ripgrep and turning its report into a [`CodeMatchedResult`].

use std::io::ErrorKind;
use std::process::Command;

use serde::{Deserialize, Serialize};

use refit_core::CodeMatchedResult;

use crate::error::SearchError;
use crate::report::{parse_rg_report, parse_rg_stats, split_stats};

/// Flags the report parser relies on.
pub const REQUIRED_FLAGS: [&str; 4] = ["--stats", "--line-number", "--heading", "--context"];

/// Search settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Lines of context around each match (`--context=N`).
    pub context_lines: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { context_lines: 5 }
    }
}

/// Raw outcome of one `rg` process.
#[derive(Debug, Clone)]
pub struct RgOutput {
    /// Exit code; 0 = matches, 1 = no match.
    pub code: Option<i32>,
    /// Captured standard output, lossily decoded.
    pub stdout: String,
    /// Captured standard error, lossily decoded.
    pub stderr: String,
    /// The command line, shell-quoted.
    pub command: String,
}

/// Split an argument string the way a POSIX shell would.
///
/// # Errors
/// [`SearchError::InvalidArguments`] on unbalanced quotes.
pub fn split_args(args: &str) -> Result<Vec<String>, SearchError> {
    shell_words::split(args).map_err(|e| SearchError::InvalidArguments(format!("{e}: {args}")))
}

/// Ensure every flag of [`REQUIRED_FLAGS`] is present.
///
/// # Errors
/// [`SearchError::MissingFlag`] naming the first missing flag.
pub fn check_required_flags(args: &[String]) -> Result<(), SearchError> {
    for flag in REQUIRED_FLAGS {
        if !args.iter().any(|arg| arg.starts_with(flag)) {
            return Err(SearchError::MissingFlag {
                flag,
                args: shell_words::join(args),
            });
        }
    }
    Ok(())
}

/// Run `rg <args> -- <folder>`.
///
/// Exit code 1 (no match) is not an error.
///
/// # Errors
/// [`SearchError::RgNotFound`] when `rg` is missing, [`SearchError::Spawn`]
/// for other launch failures and [`SearchError::RgFailed`] for exit codes
/// of 2 and above.
pub fn run_rg(args: &[String], folder: &str) -> Result<RgOutput, SearchError> {
    let command = format!("rg {} {}", shell_words::join(args), shell_words::quote(folder));
    tracing::info!(command = %command, "running rg");

    let output = Command::new("rg")
        .args(args)
        .arg("--")
        .arg(folder)
        .output()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => SearchError::RgNotFound,
            _ => SearchError::Spawn(e),
        })?;

    let code = output.status.code();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    match code {
        Some(0 | 1) => {}
        _ => return Err(SearchError::RgFailed { code, stderr }),
    }
    if !stderr.trim().is_empty() {
        tracing::warn!(stderr = %stderr.trim(), "rg reported warnings");
    }

    Ok(RgOutput {
        code,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr,
        command,
    })
}

/// Build a result from one rg run's output.
///
/// The parsed totals are checked against the statistics section; a
/// disagreement is logged, never fatal.
///
/// # Errors
/// Report parse errors.
pub fn build_result(output: &RgOutput) -> Result<CodeMatchedResult, SearchError> {
    if output.code == Some(1) {
        tracing::info!("no matches found");
        let (_, stats_raw) = split_stats(&output.stdout);
        return Ok(CodeMatchedResult {
            files: Vec::new(),
            rg_stats_raw: stats_raw,
            rg_command_used: output.command.clone(),
        });
    }

    let report = parse_rg_report(&output.stdout)?;
    let result = CodeMatchedResult {
        files: report.files,
        rg_stats_raw: report.stats_raw,
        rg_command_used: output.command.clone(),
    };

    let stats = parse_rg_stats(&result.rg_stats_raw);
    if stats.files_with_matches != result.total_files_matched()
        || stats.matched_lines != result.total_lines_matched()
    {
        tracing::warn!(
            rg_files = stats.files_with_matches,
            parsed_files = result.total_files_matched(),
            rg_lines = stats.matched_lines,
            parsed_lines = result.total_lines_matched(),
            "parsed report disagrees with rg statistics"
        );
    }
    tracing::info!(
        files = result.total_files_matched(),
        lines = result.total_lines_matched(),
        blocks = result.total_blocks(),
        "search finished"
    );
    Ok(result)
}

/// Run rg with `args` over `folder` and collect the matched blocks.
///
/// # Errors
/// Missing required flags, rg failures and report parse errors.
pub fn gather_search_results(args: &str, folder: &str) -> Result<CodeMatchedResult, SearchError> {
    let args = split_args(args)?;
    check_required_flags(&args)?;
    let output = run_rg(&args, folder)?;
    build_result(&output)
}
