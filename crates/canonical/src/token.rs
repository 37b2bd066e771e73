use serde::{Deserialize, Serialize};

/// A comparison token together with where it came from in the original text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// Normalized form used for comparison.
    pub text: String,
    /// Original spelling, exactly as typed, for display.
    pub surface: String,
    /// Byte offset (inclusive) in the original text.
    pub start: usize,
    /// Byte offset (exclusive) in the original text.
    pub end: usize,
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}

/// Splits text on Unicode whitespace and produces byte offsets.
///
/// No normalization is applied: `text` and `surface` are both the raw slice.
/// [`canonicalize`](crate::canonicalize) runs this first to find word
/// boundaries in the original input.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(token_start) = start.take() {
                tokens.push(raw_token(text, token_start, idx));
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }

    if let Some(token_start) = start {
        tokens.push(raw_token(text, token_start, text.len()));
    }

    tokens
}

fn raw_token(text: &str, start: usize, end: usize) -> Token {
    let slice = &text[start..end];
    Token {
        text: slice.to_string(),
        surface: slice.to_string(),
        start,
        end,
    }
}
