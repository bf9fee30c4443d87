//! Tests for planning and applying edits across files.

use tempfile::TempDir;

use refit_core::{
    CodeBlock, DispatchConfig, EditError, EditPlan, EditPrompt, EditStrategy, EditedBlock, Line,
    TargetFile, create_plan,
};
use refit_llm::{ModelLimits, ScriptedModel, UsageTracker};

fn model() -> ScriptedModel {
    ScriptedModel::new(
        "gemini-2.0-flash",
        ModelLimits {
            input_tokens: 1_000_000,
            output_tokens: 65_536,
        },
    )
}

fn upper_echo(prompt: &str) -> String {
    // Echo every input block back upper-cased.
    let input = prompt.split("[Input Code Blocks]").nth(1).unwrap_or_default();
    let input = input.split("[Output Code Blocks]").next().unwrap_or_default();
    input
        .to_uppercase()
        .replace("<CODE_BLOCK>", "<code_block>")
        .replace("</CODE_BLOCK>", "</code_block>")
}

#[test]
fn test_matched_blocks_plan_and_apply() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.py");
    let b = dir.path().join("b.py");
    std::fs::write(&a, "import os\nprint('a')\nx = 1\nprint('b')\n").unwrap();
    std::fs::write(&b, "print('c')\n").unwrap();

    let files = vec![
        TargetFile::new(
            &a,
            vec![
                CodeBlock::new(&a, 2, vec![Line::matched(2, "print('a')", true)]).unwrap(),
                CodeBlock::new(&a, 4, vec![Line::matched(4, "print('b')", true)]).unwrap(),
            ],
        ),
        TargetFile::new(
            &b,
            vec![CodeBlock::new(&b, 1, vec![Line::matched(1, "print('c')", true)]).unwrap()],
        ),
    ];
    let model = model().with_responder(|p| Ok(upper_echo(p)));
    let mut usage = UsageTracker::new();

    let mut plan = create_plan(
        files,
        &EditPrompt::new("shout"),
        &model,
        EditStrategy::ReplaceMatchedBlocks,
        &DispatchConfig::default(),
        Some(&mut usage),
    )
    .unwrap();

    assert_eq!(model.call_count(), 1);
    assert_eq!(plan.edited_block_count(), 3);
    assert_eq!(plan.changed_block_count(), 3);
    let listing = plan.format_plan();
    assert!(listing.contains("a.py (2 blocks, 2 changed)"));
    assert!(listing.contains("b.py (1 blocks, 1 changed)"));

    let preview = plan.preview();
    assert!(preview.failed.is_empty());
    let previews = preview.previews;
    assert_eq!(previews.len(), 2);
    assert!(previews[0].diff.contains("+PRINT('A')"));

    let report = plan.apply_edits();
    assert!(report.is_success());
    assert_eq!(
        std::fs::read_to_string(&a).unwrap(),
        "import os\nPRINT('A')\nx = 1\nPRINT('B')\n"
    );
    assert_eq!(std::fs::read_to_string(&b).unwrap(), "PRINT('C')\n");
    assert!(usage.approximate_cost() > 0.0);

    let again = plan.apply_edits();
    assert_eq!(again.failed.len(), 2);
    assert!(matches!(again.failed[0].1, EditError::AlreadyApplied(_)));
}

#[test]
fn test_whole_file_strategy_one_call_per_file() {
    let dir = TempDir::new().unwrap();
    let paths: Vec<_> = ["one.txt", "two.txt", "three.txt"]
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            std::fs::write(&path, format!("{name}\nbody\n")).unwrap();
            path
        })
        .collect();
    let files = paths.iter().map(|p| TargetFile::new(p, Vec::new())).collect();
    let model = model().with_responder(|p| Ok(upper_echo(p)));
    let config = DispatchConfig {
        max_blocks_per_call: 20,
        ..DispatchConfig::default()
    };

    let mut plan = create_plan(
        files,
        &EditPrompt::new("shout"),
        &model,
        EditStrategy::ReplaceWholeFile,
        &config,
        None,
    )
    .unwrap();

    assert_eq!(model.call_count(), 3);
    assert_eq!(plan.calls(), 3);
    assert!(plan.apply_edits().is_success());
    assert_eq!(std::fs::read_to_string(&paths[1]).unwrap(), "TWO.TXT\nBODY\n");
}

#[test]
fn test_refused_batch_leaves_files_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keep.py");
    std::fs::write(&path, "a\nb\n").unwrap();
    let files = vec![TargetFile::new(
        &path,
        vec![CodeBlock::from_contents(&path, 1, ["a", "b"])],
    )];
    let model = model().with_reply("Error: cannot comply");

    let mut plan = create_plan(
        files,
        &EditPrompt::new("x"),
        &model,
        EditStrategy::ReplaceMatchedBlocks,
        &DispatchConfig::default(),
        None,
    )
    .unwrap();

    assert_eq!(plan.failed_batches(), 1);
    assert_eq!(plan.changed_block_count(), 0);
    assert!(plan.format_plan().contains("1 failed batches"));
    assert!(plan.apply_edits().is_success());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");
}

#[test]
fn test_strategy_names() {
    assert_eq!("replace-whole-file".parse::<EditStrategy>().unwrap(), EditStrategy::ReplaceWholeFile);
    assert_eq!("blocks".parse::<EditStrategy>().unwrap(), EditStrategy::ReplaceMatchedBlocks);
    assert!("lines".parse::<EditStrategy>().is_err());
    assert_eq!(EditStrategy::ReplaceMatchedBlocks.to_string(), "replace_matched_blocks");
}

#[test]
fn test_whole_file_strategy_skips_unreadable_file() {
    let dir = TempDir::new().unwrap();
    let text = dir.path().join("ok.txt");
    let binary = dir.path().join("blob.bin");
    std::fs::write(&text, "hello\n").unwrap();
    std::fs::write(&binary, b"\x00\x01\x02hello").unwrap();
    let files = vec![TargetFile::new(&binary, Vec::new()), TargetFile::new(&text, Vec::new())];
    let model = model().with_responder(|p| Ok(upper_echo(p)));

    let mut plan = create_plan(
        files,
        &EditPrompt::new("shout"),
        &model,
        EditStrategy::ReplaceWholeFile,
        &DispatchConfig::default(),
        None,
    )
    .unwrap();

    assert_eq!(model.call_count(), 1);
    assert_eq!(plan.files().len(), 1);
    assert_eq!(plan.skipped().len(), 1);
    assert_eq!(plan.skipped()[0].0, binary);
    assert!(matches!(plan.skipped()[0].1, EditError::Io(_)));
    assert!(plan.format_plan().contains("blob.bin skipped"));

    assert!(plan.apply_edits().is_success());
    assert_eq!(std::fs::read_to_string(&text).unwrap(), "HELLO\n");
}

#[test]
fn test_preview_reports_bad_file_and_keeps_others() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.py");
    let bad = dir.path().join("bad.py");
    std::fs::write(&good, "a\nb\n").unwrap();
    std::fs::write(&bad, "a\nb\n").unwrap();

    let mut good_file = TargetFile::new(&good, Vec::new());
    good_file
        .add_edited_block(EditedBlock::new(["B"], CodeBlock::from_contents(&good, 2, ["b"])))
        .unwrap();
    let mut bad_file = TargetFile::new(&bad, Vec::new());
    bad_file
        .add_edited_block(EditedBlock::new(["?"], CodeBlock::from_contents(&bad, 9, ["z"])))
        .unwrap();
    let plan = EditPlan::new(vec![bad_file, good_file]);

    let preview = plan.preview();
    assert_eq!(preview.previews.len(), 1);
    assert_eq!(preview.previews[0].path, good);
    assert_eq!(preview.previews[0].modified, "a\nB\n");
    assert_eq!(preview.failed.len(), 1);
    assert_eq!(preview.failed[0].0, bad);
    assert!(matches!(preview.failed[0].1, EditError::OutOfRange { .. }));
}
