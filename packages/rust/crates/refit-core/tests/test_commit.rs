//! Tests for committing edited blocks to disk.

use std::path::Path;

use tempfile::TempDir;

use refit_core::{
    CodeBlock, EditConfig, EditError, EditedBlock, Line, TargetFile, commit_edited_blocks,
    parse_model_output, render_block_fragment,
};

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn block(path: &Path, start: usize, contents: &[&str]) -> CodeBlock {
    CodeBlock::from_contents(path, start, contents.iter().copied())
}

#[test]
fn test_growth_scenario_shifts_later_block() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "f.py", "def f():\nprint(1)\nreturn 1\n\nx = 5\n");

    let first = EditedBlock::new(
        ["def f():", "    print(1)", "    print(2)", "    return 1"],
        block(&path, 1, &["def f():", "print(1)", "return 1"]),
    );
    let second = EditedBlock::new(["x = 6"], block(&path, 5, &["x = 5"]));

    let mut target = TargetFile::new(&path, Vec::new());
    target.add_edited_block(second).unwrap();
    target.add_edited_block(first).unwrap();
    let report = target.apply_edits().unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "def f():\n    print(1)\n    print(2)\n    return 1\n\nx = 6\n"
    );
    assert_eq!(report.lines_before, 5);
    assert_eq!(report.lines_after, 6);
}

#[test]
fn test_later_block_lands_at_offset_position() {
    let dir = TempDir::new().unwrap();
    let original: String = (1..=10).map(|i| format!("line{i}\n")).collect();
    let path = write(&dir, "n.txt", &original);

    // Lines 2..=3 become one line: offset -1 for everything after.
    let b1 = EditedBlock::new(["merged"], block(&path, 2, &["line2", "line3"]));
    let b2 = EditedBlock::new(["EIGHT"], block(&path, 8, &["line8"]));
    commit_edited_blocks(&path, &[b1, b2], &EditConfig::default()).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[8 - 1 - 1], "EIGHT");
    assert_eq!(lines.len(), 9);
}

#[test]
fn test_no_op_round_trip_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let content = "a = 1\n  b = 2\n\tc = 3\n";
    let path = write(&dir, "r.py", content);

    let original = CodeBlock::new(
        &path,
        1,
        vec![Line::new(1, "a = 1"), Line::new(2, "  b = 2"), Line::new(3, "\tc = 3")],
    )
    .unwrap();
    commit_edited_blocks(&path, &[EditedBlock::no_op(original)], &EditConfig::default()).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn test_filepath_mismatch_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let content = "one\ntwo\n";
    let path = write(&dir, "target.py", content);
    let other = dir.path().join("other.py");

    let good = EditedBlock::new(["ONE"], block(&path, 1, &["one"]));
    let stray = EditedBlock::new(["TWO"], block(&other, 2, &["two"]));
    let err = commit_edited_blocks(&path, &[good, stray], &EditConfig::default()).unwrap_err();

    assert!(matches!(err, EditError::FilepathMismatch { .. }));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn test_apply_twice_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "once.py", "x\n");

    let mut target = TargetFile::new(&path, Vec::new());
    target
        .add_edited_block(EditedBlock::new(["y"], block(&path, 1, &["x"])))
        .unwrap();
    target.apply_edits().unwrap();

    assert!(matches!(target.apply_edits(), Err(EditError::AlreadyApplied(_))));
    let late = EditedBlock::new(["z"], block(&path, 1, &["y"]));
    assert!(matches!(target.add_edited_block(late), Err(EditError::AlreadyApplied(_))));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "y\n");
}

#[test]
fn test_rejected_commit_can_be_retried() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "retry.py", "a\nb\n");

    let mut target = TargetFile::new(&path, Vec::new());
    target
        .add_edited_block(EditedBlock::new(["?"], block(&path, 5, &["e"])))
        .unwrap();
    assert!(matches!(target.apply_edits(), Err(EditError::OutOfRange { .. })));
    assert!(!target.is_applied());
}

#[test]
fn test_whole_file_block_and_preview() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "whole.rs", "fn a() {}\r\nfn b() {}\r\n");

    let mut target = TargetFile::new(&path, Vec::new());
    let whole = target.whole_file_as_edit_block().unwrap().clone();
    assert_eq!(whole.start_line(), 1);
    assert_eq!(whole.contents().collect::<Vec<_>>(), vec!["fn a() {}", "fn b() {}"]);

    target
        .add_edited_block(EditedBlock::new(["fn a() {}", "fn c() {}"], whole))
        .unwrap();
    let preview = target.preview().unwrap();
    assert_eq!(preview.modified, "fn a() {}\r\nfn c() {}\r\n");
    assert!(preview.diff.contains("+fn c() {}"));
    // Preview never writes.
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "fn a() {}\r\nfn b() {}\r\n"
    );
}

#[test]
fn test_echoed_block_with_blank_edges_leaves_file_identical() {
    let dir = TempDir::new().unwrap();
    let original = "x = 1\n\ndef f():\n    pass\n\ny = 2\n";
    let path = write(&dir, "echo.py", original);

    let matched = block(&path, 2, &["", "def f():", "    pass", ""]);
    let reply = render_block_fragment(&matched);
    let edited = parse_model_output(&reply, &[&matched]);
    assert_eq!(edited.len(), 1);
    assert_eq!(edited[0].len_lines(), 4);

    commit_edited_blocks(&path, &edited, &EditConfig::default()).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_echoed_whole_file_keeps_leading_and_trailing_blanks() {
    let dir = TempDir::new().unwrap();
    let original = "\n\nimport os\n\nprint(os.sep)\n\n";
    let path = write(&dir, "whole.py", original);

    let mut target = TargetFile::new(&path, Vec::new());
    let whole = target.whole_file_as_edit_block().unwrap().clone();
    let reply = render_block_fragment(&whole);
    for edited in parse_model_output(&reply, &[&whole]) {
        target.add_edited_block(edited).unwrap();
    }
    target.apply_edits().unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_insertion_sharing_start_line_is_order_independent() {
    let dir = TempDir::new().unwrap();

    for insertion_first in [true, false] {
        let path = write(&dir, "insert.txt", "a\nb\nc\n");
        let insertion = EditedBlock::new(["x"], block(&path, 2, &[]));
        let replacement = EditedBlock::new(["B"], block(&path, 2, &["b"]));
        let blocks = if insertion_first {
            vec![insertion, replacement]
        } else {
            vec![replacement, insertion]
        };

        commit_edited_blocks(&path, &blocks, &EditConfig::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nx\nB\nc\n");
    }
}
