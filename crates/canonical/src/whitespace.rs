//! Whitespace normalization utilities.
//!
//! [`collapse_whitespace`] is used on phrase-file fields and on typed
//! answers before they are stored, so that `"good   morning "` and
//! `"good morning"` are recorded identically.
//!
//! ```rust
//! use canonical::collapse_whitespace;
//!
//! let normalized = collapse_whitespace("  hello   world  ");
//! assert_eq!(normalized, "hello world");
//! ```

/// Collapses repeated whitespace, trims edges, and normalizes newlines to
/// single spaces.
///
/// All Unicode whitespace characters (including U+00A0 NO-BREAK SPACE) are
/// treated as delimiters. Returns an empty string for whitespace-only input.
///
/// ```rust
/// use canonical::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("hello\r\nworld"), "hello world");
/// assert_eq!(collapse_whitespace("hello\u{00A0}world"), "hello world");
/// assert_eq!(collapse_whitespace("   \n\t   "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}
