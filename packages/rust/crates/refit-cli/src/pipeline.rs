//! Search, plan, confirm and apply: the flow behind `refit edit`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;

use refit_core::{
    ApplyReport, CodeMatchedResult, EditPlan, EditPrompt, EditStrategy, create_plan,
    load_example_file,
};
use refit_llm::{GeminiClient, GeminiConfig, GeminiModel, LanguageModel, UsageTracker};
use refit_search::{SearchError, gather_search_results, suggest_rg_arguments};

use crate::config::RefitSettings;

/// One `refit edit` invocation.
#[derive(Debug, Clone, Default)]
pub struct EditRequest {
    /// Refactoring instruction given to the model.
    pub goal: String,
    /// Folder searched by rg.
    pub folder: String,
    /// Explicit rg arguments; asked from the model when absent.
    pub rg_args: Option<String>,
    /// Worked example inserted into the prompt.
    pub example: Option<PathBuf>,
    /// Matched blocks or whole files.
    pub strategy: EditStrategy,
    /// Print a unified diff per file before confirming.
    pub show_diff: bool,
    /// Skip the confirmation prompt.
    pub assume_yes: bool,
    /// Stop after printing the plan.
    pub dry_run: bool,
    /// Overrides `dispatch.max_blocks_per_call`.
    pub max_blocks_per_call: Option<usize>,
    /// Overrides `search.context_lines`.
    pub context_lines: Option<usize>,
}

/// How a `refit edit` run ended.
#[derive(Debug)]
pub enum EditOutcome {
    /// The search found nothing to edit.
    NoMatches,
    /// `--dry-run`: plan built and printed, nothing written.
    DryRun(EditPlan),
    /// The user answered no.
    Declined(EditPlan),
    /// Edits were committed; see the report for per-file failures.
    Applied(ApplyReport),
}

/// Build the Gemini client described by `settings`.
///
/// `name_override` takes precedence over `model.name`.
///
/// # Errors
/// Unknown model names, a missing API key, or HTTP client setup failures.
pub fn build_model(settings: &RefitSettings, name_override: Option<&str>) -> anyhow::Result<GeminiClient> {
    let model = match name_override.or(settings.model.name.as_deref()) {
        Some(name) => name.parse::<GeminiModel>()?,
        None => GeminiModel::default(),
    };
    let key_env = settings.api_key_env();
    let api_key = std::env::var(key_env)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .with_context(|| format!("API key variable {key_env} is not set"))?;

    let mut config = GeminiConfig::new(model, api_key);
    if let Some(endpoint) = settings.model.endpoint.as_deref() {
        config.endpoint = endpoint.to_string();
    }
    if let Some(timeout) = settings.model.timeout_secs {
        config.timeout_secs = timeout;
    }
    tracing::debug!(model = %model, endpoint = %config.endpoint, "model client configured");
    Ok(GeminiClient::new(config)?)
}

/// Explicit rg arguments, or a model suggestion for `goal`.
///
/// # Errors
/// Propagates suggestion failures.
pub fn resolve_rg_args(
    model: &dyn LanguageModel,
    goal: &str,
    folder: &str,
    explicit: Option<&str>,
    context_lines: usize,
    usage: &mut UsageTracker,
) -> Result<String, SearchError> {
    match explicit.map(str::trim).filter(|args| !args.is_empty()) {
        Some(args) => Ok(args.to_string()),
        None => suggest_rg_arguments(model, goal, folder, context_lines, Some(usage)),
    }
}

/// Run the whole edit flow against the files under `request.folder`.
///
/// # Errors
/// Search failures, plan construction failures, and console I/O errors.
pub fn run_edit<R: BufRead, W: Write>(
    model: &dyn LanguageModel,
    request: &EditRequest,
    settings: &RefitSettings,
    input: &mut R,
    out: &mut W,
    usage: &mut UsageTracker,
) -> anyhow::Result<EditOutcome> {
    let context_lines = request
        .context_lines
        .unwrap_or(settings.search_config().context_lines);
    let rg_args = resolve_rg_args(
        model,
        &request.goal,
        &request.folder,
        request.rg_args.as_deref(),
        context_lines,
        usage,
    )?;
    writeln!(out, "Searching with: rg {rg_args} {}", request.folder)?;
    let result = gather_search_results(&rg_args, &request.folder)?;
    edit_matches(model, request, result, settings, input, out, usage)
}

/// Plan, confirm and apply edits for an existing search result.
///
/// # Errors
/// Plan construction failures and console I/O errors.
pub fn edit_matches<R: BufRead, W: Write>(
    model: &dyn LanguageModel,
    request: &EditRequest,
    result: CodeMatchedResult,
    settings: &RefitSettings,
    input: &mut R,
    out: &mut W,
    usage: &mut UsageTracker,
) -> anyhow::Result<EditOutcome> {
    if result.is_empty() {
        writeln!(out, "No matches found.")?;
        return Ok(EditOutcome::NoMatches);
    }
    out.write_all(result.format_summary().as_bytes())?;

    let mut dispatch = settings.dispatch_config();
    if let Some(max) = request.max_blocks_per_call {
        dispatch.max_blocks_per_call = max;
    }
    let edit_config = settings.edit_config();
    let files = result
        .files
        .into_iter()
        .map(|file| file.with_config(edit_config))
        .collect();

    let example = request.example.as_deref().and_then(load_example_file);
    let prompt = EditPrompt::new(request.goal.clone()).with_example(example);

    let mut plan = create_plan(files, &prompt, model, request.strategy, &dispatch, Some(usage))?;
    plan.print_plan(out)?;

    if request.show_diff {
        let preview = plan.preview();
        for file in preview.previews.iter().filter(|p| !p.is_unchanged()) {
            out.write_all(file.diff.as_bytes())?;
        }
        for (path, error) in &preview.failed {
            writeln!(out, "  no preview for {}: {error}", path.display())?;
        }
    }

    if request.dry_run {
        return Ok(EditOutcome::DryRun(plan));
    }
    if plan.changed_block_count() == 0 {
        writeln!(out, "Model proposed no changes.")?;
        return Ok(EditOutcome::Applied(ApplyReport::default()));
    }
    if !request.assume_yes && !confirm(input, out, "Apply these edits?")? {
        writeln!(out, "Aborted, nothing written.")?;
        return Ok(EditOutcome::Declined(plan));
    }

    let report = plan.apply_edits();
    write_apply_report(out, &report)?;
    Ok(EditOutcome::Applied(report))
}

/// Ask a yes/no question; anything but `y`/`yes` (including EOF) is no.
///
/// # Errors
/// Console I/O errors.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> io::Result<bool> {
    write!(out, "{question} [y/N] ")?;
    out.flush()?;
    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Print committed files and per-file failures.
///
/// # Errors
/// Console I/O errors.
pub fn write_apply_report<W: Write>(out: &mut W, report: &ApplyReport) -> io::Result<()> {
    for commit in &report.committed {
        writeln!(
            out,
            "  wrote {} ({} blocks, {} -> {} lines)",
            commit.path.display(),
            commit.blocks_applied,
            commit.lines_before,
            commit.lines_after
        )?;
    }
    for (path, error) in &report.failed {
        writeln!(out, "  FAILED {}: {error}", path.display())?;
    }
    writeln!(
        out,
        "{} files written, {} failed",
        report.committed.len(),
        report.failed.len()
    )
}

/// Print per-model token totals and the approximate cost.
///
/// # Errors
/// Console I/O errors.
pub fn write_usage_summary<W: Write>(out: &mut W, usage: &UsageTracker) -> io::Result<()> {
    if usage.summary().is_empty() {
        return Ok(());
    }
    writeln!(out, "Token usage:")?;
    for (model, tokens) in usage.summary() {
        writeln!(out, "  {model}: {} input, {} output", tokens.input, tokens.output)?;
    }
    writeln!(out, "Approximate cost: ${:.4}", usage.approximate_cost())
}
