//! The canonical form of one phrase.
//!
//! A [`CanonicalPhrase`] keeps three views of the same text:
//! - the original string, untouched, for display
//! - the canonical text, the space-joined comparison tokens
//! - the token stream, each token pointing back into the original
//!
//! ```rust
//! use canonical::{canonicalize, CanonicalizeConfig};
//!
//! let phrase = canonicalize("Good Morning, Anna!", &CanonicalizeConfig::default()).unwrap();
//! assert_eq!(phrase.canonical_text, "good morning anna");
//! assert_eq!(phrase.tokens[2].surface, "Anna");
//! assert_eq!(phrase.original, "Good Morning, Anna!");
//! ```

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// Output of [`canonicalize`](crate::canonicalize).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalPhrase {
    /// Input text exactly as given.
    pub original: String,
    /// Comparison tokens joined by single spaces.
    pub canonical_text: String,
    /// Comparison tokens with offsets into `original`.
    pub tokens: Vec<Token>,
    /// Version of the configuration that produced this phrase.
    pub canonical_version: u32,
}

impl CanonicalPhrase {
    /// Comparison forms of the tokens, in order.
    pub fn token_texts(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    /// Original spellings of the tokens, in order.
    pub fn surfaces(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.surface.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}
