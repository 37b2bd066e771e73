use std::ops::Range;

use canonical::{canonicalize, CanonicalError, CanonicalizeConfig, Token};
use tracing::debug;

use crate::types::{AlignmentBlock, MatchConfig, MatchError, MatchResult, Opcode};

#[cfg(test)]
mod tests;

/// Scores typed answers against the reference translations of a phrase.
#[derive(Debug, Clone)]
pub struct Matcher {
    cfg: MatchConfig,
}

impl Matcher {
    /// Construct a matcher after validating its configuration.
    pub fn new(cfg: MatchConfig) -> Result<Self, MatchError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Canonicalize `input` and every reference, pick the nearest reference
    /// and align the input against it.
    ///
    /// An input that normalizes to nothing is scored as an empty token
    /// sequence rather than rejected: submitting a blank answer is a wrong
    /// answer, not an error.
    pub fn match_attempt<S: AsRef<str>>(
        &self,
        input: &str,
        references: &[S],
    ) -> Result<MatchResult, MatchError> {
        if references.is_empty() {
            return Err(MatchError::NoReferences);
        }

        let input_tokens = self.tokens(input)?;
        let reference_tokens = references
            .iter()
            .map(|r| self.tokens(r.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let input_texts = texts(&input_tokens);
        let reference_texts: Vec<Vec<&str>> = reference_tokens.iter().map(|t| texts(t)).collect();

        let (reference_index, ratio) = find_nearest_reference(&input_texts, &reference_texts);
        let blocks = find_matching_blocks(&input_texts, &reference_texts, reference_index)?;
        let passed = ratio >= self.cfg.pass_ratio;

        debug!(
            reference_index,
            ratio,
            blocks = blocks.len(),
            passed,
            "attempt_matched"
        );

        let reference = reference_tokens
            .into_iter()
            .nth(reference_index)
            .unwrap_or_default();

        Ok(MatchResult {
            reference_index,
            ratio,
            blocks,
            input: input_tokens,
            reference,
            input_text: input.to_string(),
            reference_text: references[reference_index].as_ref().to_string(),
            passed,
        })
    }

    fn tokens(&self, text: &str) -> Result<Vec<Token>, MatchError> {
        canonical_tokens(text, &self.cfg.canonical)
    }
}

fn canonical_tokens(text: &str, cfg: &CanonicalizeConfig) -> Result<Vec<Token>, MatchError> {
    match canonicalize(text, cfg) {
        Ok(phrase) => Ok(phrase.tokens),
        Err(CanonicalError::EmptyInput) => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}

fn texts(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

/// Return the index of the reference most similar to `input` and its ratio.
///
/// Ties are broken by first occurrence. With no references the result is
/// `(0, 0.0)`; callers must check for an empty list before trusting the index.
pub fn find_nearest_reference<T, R>(input: &[T], references: &[R]) -> (usize, f64)
where
    T: PartialEq,
    R: AsRef<[T]>,
{
    let mut best = (0, 0.0);
    for (index, reference) in references.iter().enumerate() {
        let ratio = similarity_ratio(input, reference.as_ref());
        if index == 0 || ratio > best.1 {
            best = (index, ratio);
        }
    }
    best
}

/// Align `input` against `references[index]`.
///
/// Blocks come out left to right, never overlap and leave no gaps: their
/// `input` ranges concatenate to `0..input.len()` and their `reference`
/// ranges to `0..reference.len()`.
pub fn find_matching_blocks<T, R>(
    input: &[T],
    references: &[R],
    index: usize,
) -> Result<Vec<AlignmentBlock>, MatchError>
where
    T: PartialEq,
    R: AsRef<[T]>,
{
    let reference = references
        .get(index)
        .ok_or(MatchError::ReferenceOutOfRange {
            index,
            len: references.len(),
        })?;
    Ok(align(input, reference.as_ref()))
}

/// Normalized similarity `2 * LCS / (|a| + |b|)` in [0.0, 1.0].
///
/// Two empty sequences are identical and score 1.0.
pub fn similarity_ratio<T: PartialEq>(a: &[T], b: &[T]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let table = LcsTable::build(a, b);
    2.0 * table.get(0, 0) as f64 / total as f64
}

/// Minimal-edit alignment of `a` against `b`, grouped into blocks.
pub fn align<T: PartialEq>(a: &[T], b: &[T]) -> Vec<AlignmentBlock> {
    let table = LcsTable::build(a, b);
    let mut blocks: Vec<AlignmentBlock> = Vec::new();
    let (mut i, mut j) = (0, 0);
    // Start of the current run of unmatched tokens on each side.
    let (mut gap_i, mut gap_j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            push_gap(&mut blocks, gap_i..i, gap_j..j);
            push_equal(&mut blocks, i, j);
            i += 1;
            j += 1;
            gap_i = i;
            gap_j = j;
        } else if table.get(i + 1, j) >= table.get(i, j + 1) {
            i += 1;
        } else {
            j += 1;
        }
    }
    push_gap(&mut blocks, gap_i..a.len(), gap_j..b.len());

    blocks
}

fn push_gap(
    blocks: &mut Vec<AlignmentBlock>,
    input: Range<usize>,
    reference: Range<usize>,
) {
    let op = match (input.is_empty(), reference.is_empty()) {
        (true, true) => return,
        (false, false) => Opcode::Replace,
        (false, true) => Opcode::Delete,
        (true, false) => Opcode::Insert,
    };
    blocks.push(AlignmentBlock::new(op, input, reference));
}

fn push_equal(blocks: &mut Vec<AlignmentBlock>, i: usize, j: usize) {
    if let Some(last) = blocks.last_mut() {
        if last.op == Opcode::Equal && last.input.end == i && last.reference.end == j {
            last.input.end += 1;
            last.reference.end += 1;
            return;
        }
    }
    blocks.push(AlignmentBlock::new(Opcode::Equal, i..i + 1, j..j + 1));
}

/// Suffix LCS lengths: `get(i, j)` is the LCS length of `a[i..]` and `b[j..]`.
struct LcsTable {
    width: usize,
    cells: Vec<usize>,
}

impl LcsTable {
    fn build<T: PartialEq>(a: &[T], b: &[T]) -> Self {
        let width = b.len() + 1;
        let mut cells = vec![0usize; (a.len() + 1) * width];
        for i in (0..a.len()).rev() {
            for j in (0..b.len()).rev() {
                cells[i * width + j] = if a[i] == b[j] {
                    cells[(i + 1) * width + j + 1] + 1
                } else {
                    cells[(i + 1) * width + j].max(cells[i * width + j + 1])
                };
            }
        }
        Self { width, cells }
    }

    fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.width + j]
    }
}
