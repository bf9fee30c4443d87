//! Tests for tokenizer module - token counting used for batch budgets.

use rand::Rng;
use refit_tokenizer::{TokenizerError, count_tokens, count_tokens_with_encoding};

#[test]
fn test_count_tokens_grows_with_text() {
    let short = "def f():\n    return 1\n";
    let long = short.repeat(20);
    assert!(count_tokens(&long) > count_tokens(short));
}

#[test]
fn test_count_tokens_with_encoding() {
    let result = count_tokens_with_encoding("Hello, world!", "cl100k_base");
    assert!(result.is_ok_and(|v| v > 0));
}

#[test]
fn test_count_tokens_unknown_encoding() {
    let result = count_tokens_with_encoding("Hello", "no_such_base");
    assert!(matches!(result, Err(TokenizerError::UnknownEncoding(_))));
}

#[test]
fn test_count_tokens_random_code_is_positive() {
    let mut rng = rand::thread_rng();
    let text: String = (0..200)
        .map(|_| {
            let n: u32 = rng.gen_range(0..1000);
            format!("sprintf(buf, \"%d\", {n});\n")
        })
        .collect();
    assert!(count_tokens(&text) >= 200);
}
