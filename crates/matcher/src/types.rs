use std::ops::Range;

use canonical::{CanonicalError, CanonicalizeConfig, Token};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of an alignment block, seen from the user's input towards the
/// reference translation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Opcode {
    /// Input and reference agree on this span.
    Equal,
    /// Input tokens that should have been the reference tokens.
    Replace,
    /// Reference tokens missing from the input.
    Insert,
    /// Input tokens with no counterpart in the reference.
    Delete,
}

impl Opcode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Opcode::Equal => "equal",
            Opcode::Replace => "replace",
            Opcode::Insert => "insert",
            Opcode::Delete => "delete",
        }
    }
}

/// A contiguous span of the alignment between input and reference.
///
/// Ranges are token indices. `Insert` blocks have an empty `input` range and
/// `Delete` blocks an empty `reference` range; the empty range still sits at
/// the position where the edit applies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlignmentBlock {
    pub op: Opcode,
    pub input: Range<usize>,
    pub reference: Range<usize>,
}

impl AlignmentBlock {
    pub fn new(op: Opcode, input: Range<usize>, reference: Range<usize>) -> Self {
        Self {
            op,
            input,
            reference,
        }
    }
}

/// Configuration of the matcher facade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Normalization applied to the attempt and to every reference.
    #[serde(default)]
    pub canonical: CanonicalizeConfig,
    /// Minimum similarity ratio that counts as a correct answer.
    #[serde(default = "MatchConfig::default_pass_ratio")]
    pub pass_ratio: f64,
}

impl MatchConfig {
    pub(crate) fn default_pass_ratio() -> f64 {
        0.75
    }

    /// Validate the configuration before building a [`Matcher`](crate::Matcher).
    pub fn validate(&self) -> Result<(), MatchError> {
        self.canonical
            .validate()
            .map_err(|e| MatchError::InvalidConfig(e.to_string()))?;
        if !(self.pass_ratio > 0.0 && self.pass_ratio <= 1.0) {
            return Err(MatchError::InvalidConfig(
                "pass_ratio must be in (0.0, 1.0]".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            canonical: CanonicalizeConfig::default(),
            pass_ratio: Self::default_pass_ratio(),
        }
    }
}

/// Outcome of scoring one attempt against a phrase's references.
///
/// Recomputed for every attempt; nothing here is persisted as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    /// Index of the closest reference. Ties go to the earliest reference.
    pub reference_index: usize,
    /// Similarity ratio in [0.0, 1.0] against that reference.
    pub ratio: f64,
    /// Gap-free alignment covering both token sequences.
    pub blocks: Vec<AlignmentBlock>,
    /// Canonical tokens of the attempt.
    pub input: Vec<Token>,
    /// Canonical tokens of the chosen reference.
    pub reference: Vec<Token>,
    /// The attempt as typed; token offsets point into it.
    #[serde(default)]
    pub input_text: String,
    /// The chosen reference as written; token offsets point into it.
    #[serde(default)]
    pub reference_text: String,
    /// Whether `ratio` reached the configured pass ratio.
    pub passed: bool,
}

impl MatchResult {
    pub fn is_exact(&self) -> bool {
        self.blocks.iter().all(|b| b.op == Opcode::Equal) && !self.reference.is_empty()
    }

    /// Number of blocks that need a correction.
    pub fn mistakes(&self) -> usize {
        self.blocks.iter().filter(|b| b.op != Opcode::Equal).count()
    }
}

/// Errors produced by the matching layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    /// Invalid matcher configuration.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    /// A phrase with no reference translation cannot be scored.
    #[error("no reference translations to match against")]
    NoReferences,
    /// The requested reference does not exist.
    #[error("reference index {index} out of range for {len} references")]
    ReferenceOutOfRange { index: usize, len: usize },
    /// Canonical stage failed.
    #[error("canonical error: {0}")]
    Canonical(#[from] CanonicalError),
}
