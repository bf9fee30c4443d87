//! Size-limited, binary-aware text reads.
//!
//! Source files handed to the model must be text: a NULL byte in the
//! first 8KB marks the file as binary and it is refused.

use std::fs;
use std::io::Read;
use std::path::Path;

use memchr::memchr;

use crate::error::IoError;

const BINARY_SNIFF_LEN: usize = 8192;

/// Returns true when the first 8KB of `buffer` contain a NULL byte.
#[must_use]
pub fn is_binary(buffer: &[u8]) -> bool {
    let sniff = &buffer[..buffer.len().min(BINARY_SNIFF_LEN)];
    memchr(0, sniff).is_some()
}

/// Decode a file buffer into text.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD rather than failing,
/// so legacy sources with stray Latin-1 bytes can still be edited.
///
/// # Errors
/// Returns [`IoError::BinaryFile`] when binary content is detected.
pub fn decode_buffer(buffer: Vec<u8>) -> Result<String, IoError> {
    if is_binary(&buffer) {
        return Err(IoError::BinaryFile);
    }
    Ok(String::from_utf8(buffer)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
}

/// Read a text file, refusing binaries and files above `max_bytes`.
///
/// # Errors
/// [`IoError::NotFound`] when the metadata cannot be read,
/// [`IoError::TooLarge`] above the limit, [`IoError::BinaryFile`] for
/// binary content and [`IoError::System`] for read failures.
pub fn read_text_safe<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<String, IoError> {
    let path = path.as_ref();

    let metadata =
        fs::metadata(path).map_err(|_| IoError::NotFound(path.display().to_string()))?;
    if metadata.len() > max_bytes {
        return Err(IoError::TooLarge(metadata.len(), max_bytes));
    }

    let mut buffer = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or(0));
    fs::File::open(path)?.read_to_end(&mut buffer)?;

    decode_buffer(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_only_checks_prefix() {
        let mut buffer = vec![b'a'; BINARY_SNIFF_LEN];
        buffer.push(0);
        assert!(!is_binary(&buffer));
        assert!(is_binary(b"ab\x00cd"));
    }

    #[test]
    fn test_decode_lossy() {
        let text = decode_buffer(vec![0x48, 0x69, 0xff]).unwrap();
        assert!(text.starts_with("Hi"));
        assert!(text.ends_with('\u{FFFD}'));
    }
}
