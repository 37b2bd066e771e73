use std::borrow::Cow;

use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::CanonicalizeConfig;
use crate::error::CanonicalError;
use crate::phrase::CanonicalPhrase;
use crate::token::{tokenize, Token};

/// Main entry point. Normalizes a phrase into comparison tokens while keeping
/// every token anchored to its span in the original text.
pub fn canonicalize(
    input: &str,
    cfg: &CanonicalizeConfig,
) -> Result<CanonicalPhrase, CanonicalError> {
    cfg.validate()?;

    let words = tokenize(input);
    let mut tokens: Vec<Token> = Vec::with_capacity(words.len());
    let mut pending = PendingToken::default();

    for word in &words {
        // Graphemes keep combining marks with their base so offsets never
        // split a user-visible character.
        for (offset, grapheme) in word.surface.grapheme_indices(true) {
            let start = word.start + offset;
            let end = start + grapheme.len();

            // Use Cow to avoid allocation when normalization is disabled.
            let normalized: Cow<str> = if cfg.normalize_unicode {
                Cow::Owned(grapheme.nfkc().collect::<String>())
            } else {
                Cow::Borrowed(grapheme)
            };

            // Lowercasing can expand a single character into multiple.
            let folded: Cow<str> = if cfg.lowercase {
                Cow::Owned(normalized.to_lowercase())
            } else {
                normalized
            };

            for ch in folded.chars() {
                let is_delim = ch.is_whitespace() || (cfg.strip_punctuation && ch.is_punctuation());
                if is_delim {
                    pending.finalize(input, &mut tokens);
                } else {
                    pending.push(ch, start, end);
                }
            }
        }
        pending.finalize(input, &mut tokens);
    }

    if tokens.is_empty() {
        return Err(CanonicalError::EmptyInput);
    }

    let canonical_text = tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(CanonicalPhrase {
        original: input.to_string(),
        canonical_text,
        tokens,
        canonical_version: cfg.version,
    })
}

/// Token under construction: normalized text plus the original byte span of
/// the graphemes that contributed to it.
#[derive(Default)]
struct PendingToken {
    text: String,
    span: Option<(usize, usize)>,
}

impl PendingToken {
    fn push(&mut self, ch: char, start: usize, end: usize) {
        self.text.push(ch);
        self.span = match self.span {
            Some((s, _)) => Some((s, end)),
            None => Some((start, end)),
        };
    }

    fn finalize(&mut self, input: &str, tokens: &mut Vec<Token>) {
        if let Some((start, end)) = self.span.take() {
            tokens.push(Token {
                text: std::mem::take(&mut self.text),
                surface: input[start..end].to_string(),
                start,
                end,
            });
        }
        self.text.clear();
    }
}
