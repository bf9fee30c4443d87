//! Model-suggested rg arguments for a refactoring goal.

use refit_llm::{LanguageModel, UsageTracker};

use crate::error::SearchError;
use crate::runner::split_args;

/// Flags a suggestion may contain.
pub const ALLOWED_FLAGS: [&str; 3] = ["--regexp", "--type", "--fixed-strings"];

fn suggestion_prompt(goal: &str, folder: &str) -> String {
    format!(
        "You help find code that has to change for a refactoring.\n\
         The refactoring, to be done inside the folder '{folder}', is:\n\
         \"{goal}\"\n\
         \n\
         Propose arguments for a single ripgrep (rg) search that finds every line that may need to change.\n\
         Use only these flags:\n\
         --regexp=PATTERN   pattern to search for; may be repeated, a line matching any pattern is reported\n\
         --type=TYPE        only search files of TYPE; may be repeated\n\
         --fixed-strings    treat every pattern as a literal string\n\
         \n\
         Reply with the arguments only, on one line, without the rg command and without the folder.\n\
         Quote patterns with double quotes when they contain spaces or special characters.\n\
         Examples:\n\
         --regexp=\"sprintf\\(\" --type=c\n\
         --fixed-strings --regexp=\"import os\" --type=py\n"
    )
}

/// Clean a raw suggestion and append the flags the report parser needs.
///
/// Strips markdown fences and backticks, a leading `rg ` and a trailing
/// `folder` argument.
///
/// # Errors
/// [`SearchError::InvalidArguments`] when the suggestion cannot be split
/// or uses a flag outside [`ALLOWED_FLAGS`]; [`SearchError::NoSuggestion`]
/// when nothing is left.
pub fn clean_suggestion(raw: &str, folder: &str, context_lines: usize) -> Result<String, SearchError> {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // Drop an optional language tag after the opening fence.
        text = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()).trim();
    }
    text = text.strip_suffix("```").unwrap_or(text).trim();
    text = text.trim_matches('`').trim();
    if text.get(..3).is_some_and(|prefix| prefix.eq_ignore_ascii_case("rg ")) {
        text = text[3..].trim();
    }
    if let Some(head) = text.strip_suffix(folder) {
        if head.is_empty() || head.ends_with(char::is_whitespace) {
            text = head.trim();
        }
    }

    let mut args = split_args(text)?;
    if args.is_empty() {
        return Err(SearchError::NoSuggestion(raw.to_string()));
    }
    if let Some(bad) = args
        .iter()
        .find(|arg| arg.starts_with("--") && !ALLOWED_FLAGS.iter().any(|flag| arg.starts_with(flag)))
    {
        return Err(SearchError::InvalidArguments(format!(
            "flag '{bad}' is not allowed in suggested arguments: {raw}"
        )));
    }

    args.extend([
        "--stats".to_string(),
        "--line-number".to_string(),
        "--heading".to_string(),
        format!("--context={context_lines}"),
    ]);
    Ok(shell_words::join(&args))
}

/// Ask `model` for rg arguments that find the code `goal` is about.
///
/// # Errors
/// Model failures, an `Error:` reply, and everything [`clean_suggestion`]
/// rejects.
pub fn suggest_rg_arguments(
    model: &dyn LanguageModel,
    goal: &str,
    folder: &str,
    context_lines: usize,
    usage: Option<&mut UsageTracker>,
) -> Result<String, SearchError> {
    let prompt = suggestion_prompt(goal, folder);
    let reply = model.complete(&prompt)?;
    if let Some(tracker) = usage {
        tracker.track(model.name(), model.count_tokens(&prompt), model.count_tokens(&reply));
    }
    if reply.trim().is_empty() || reply.trim_start().starts_with(refit_llm::ERROR_SENTINEL) {
        return Err(SearchError::NoSuggestion(reply));
    }
    let args = clean_suggestion(&reply, folder, context_lines)?;
    tracing::info!(args = %args, "rg arguments suggested");
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(args: &str) -> Vec<String> {
        shell_words::split(args).unwrap()
    }

    #[test]
    fn test_clean_plain() {
        assert_eq!(
            words(&clean_suggestion("--regexp=sprintf --type=c", "src", 5).unwrap()),
            vec!["--regexp=sprintf", "--type=c", "--stats", "--line-number", "--heading", "--context=5"]
        );
    }

    #[test]
    fn test_clean_fenced_with_prefix_and_folder() {
        let raw = "```bash\nRG --regexp=\"print\\(\" --type=py src\n```";
        assert_eq!(
            words(&clean_suggestion(raw, "src", 2).unwrap()),
            vec!["--regexp=print\\(", "--type=py", "--stats", "--line-number", "--heading", "--context=2"]
        );
    }

    #[test]
    fn test_folder_inside_argument_kept() {
        let out = clean_suggestion("--regexp=mysrc", "src", 1).unwrap();
        assert_eq!(words(&out)[0], "--regexp=mysrc");
    }

    #[test]
    fn test_forbidden_flag() {
        let err = clean_suggestion("--regexp=x --replace=y", "src", 5).unwrap_err();
        assert!(matches!(err, SearchError::InvalidArguments(_)));
    }

    #[test]
    fn test_empty_suggestion() {
        assert!(matches!(clean_suggestion("``", "src", 5), Err(SearchError::NoSuggestion(_))));
    }
}
