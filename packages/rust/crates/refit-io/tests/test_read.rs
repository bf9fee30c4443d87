//! Tests for reading and rewriting source files.

use std::io::Write;
use tempfile::TempDir;

use refit_io::{IoError, LineEnding, SourceText, decode_buffer, is_binary, read_text_safe, write_text};

#[test]
fn test_read_text() {
    let dir = TempDir::new().unwrap();
    let p = dir.path().join("main.c");
    std::fs::write(&p, "int main() {}\n").unwrap();
    assert_eq!(read_text_safe(&p, 1024).unwrap(), "int main() {}\n");
}

#[test]
fn test_read_binary_refused() {
    let dir = TempDir::new().unwrap();
    let p = dir.path().join("blob.bin");
    let mut file = std::fs::File::create(&p).unwrap();
    file.write_all(b"\x00\x01\x02\x03").unwrap();
    assert!(matches!(read_text_safe(&p, 1024), Err(IoError::BinaryFile)));
}

#[test]
fn test_read_too_large() {
    let dir = TempDir::new().unwrap();
    let p = dir.path().join("large.txt");
    std::fs::write(&p, "12345678901234567890").unwrap();
    assert!(matches!(read_text_safe(&p, 10), Err(IoError::TooLarge(20, 10))));
}

#[test]
fn test_read_missing_file() {
    let result = read_text_safe("/nonexistent/file.txt", 1024);
    assert!(matches!(result, Err(IoError::NotFound(_))));
}

#[test]
fn test_decode_helpers() {
    assert!(is_binary(b"\x00abc"));
    assert!(!is_binary(b""));
    assert!(matches!(decode_buffer(b"\x00".to_vec()), Err(IoError::BinaryFile)));
}

#[test]
fn test_source_text_roundtrip_through_write() {
    let dir = TempDir::new().unwrap();
    let p = dir.path().join("win.txt");
    std::fs::write(&p, "one\r\ntwo\r\nthree").unwrap();

    let source = SourceText::read(&p, 1024).unwrap();
    assert_eq!(source.line_ending(), LineEnding::CrLf);
    assert_eq!(source.line_count(), 3);
    assert_eq!(source.lines_inclusive(), vec!["one\r\n", "two\r\n", "three"]);

    write_text(&p, &source.lines_inclusive().concat()).unwrap();
    assert_eq!(std::fs::read_to_string(&p).unwrap(), "one\r\ntwo\r\nthree");
}

#[test]
fn test_write_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let p = dir.path().join("missing").join("file.txt");
    assert!(matches!(write_text(&p, "x"), Err(IoError::Write { .. })));
}
