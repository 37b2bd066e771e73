//! Rendering a scored attempt as a correction the user can read.

use std::fmt::Write as _;

use canonical::Token;
use colored::Colorize;
use matcher::{AlignmentBlock, MatchResult, Opcode};
use serde::{Deserialize, Serialize};

/// How the correction is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStyle {
    /// ANSI colors and text attributes.
    Colored,
    /// Plain text with `[-removed-]` and `{+added+}` markers.
    Plain,
}

impl ReportStyle {
    pub fn from_color_flag(color: bool) -> Self {
        if color {
            ReportStyle::Colored
        } else {
            ReportStyle::Plain
        }
    }
}

/// Render the diff between the attempt and the chosen reference.
///
/// The first line is the attempt with corrections applied inline; the second
/// gives the similarity and the full expected translation.
pub fn render_correction<S: AsRef<str>>(
    result: &MatchResult,
    references: &[S],
    style: ReportStyle,
) -> String {
    let parts: Vec<String> = result
        .blocks
        .iter()
        .map(|block| render_block(block, result, style))
        .collect();

    let mut out = parts.join(" ");
    let percent = format!("{:.0}%", result.ratio * 100.0);
    let percent = match style {
        ReportStyle::Colored if result.passed => percent.green().bold().to_string(),
        ReportStyle::Colored => percent.yellow().bold().to_string(),
        ReportStyle::Plain => percent,
    };
    let expected = expected_reference(result, references);

    let _ = write!(out, "\nSimilarity: {percent}  Expected: {expected}");
    out
}

fn render_block(block: &AlignmentBlock, result: &MatchResult, style: ReportStyle) -> String {
    let wrong = surfaces(&result.input[block.input.clone()], &result.input_text);
    let right = surfaces(&result.reference[block.reference.clone()], &result.reference_text);

    match (block.op, style) {
        (Opcode::Equal, ReportStyle::Colored) => wrong.green().to_string(),
        (Opcode::Equal, ReportStyle::Plain) => wrong,
        (Opcode::Delete, ReportStyle::Colored) => wrong.red().strikethrough().to_string(),
        (Opcode::Delete, ReportStyle::Plain) => format!("[-{wrong}-]"),
        (Opcode::Insert, ReportStyle::Colored) => right.green().underline().to_string(),
        (Opcode::Insert, ReportStyle::Plain) => format!("{{+{right}+}}"),
        (Opcode::Replace, ReportStyle::Colored) => format!(
            "{} → {}",
            wrong.red().strikethrough(),
            right.green().underline()
        ),
        (Opcode::Replace, ReportStyle::Plain) => format!("[-{wrong}-]{{+{right}+}}"),
    }
}

/// Display text of consecutive tokens.
///
/// Tokens split out of one word (`It's` → `It`, `s`) are rejoined with the
/// characters that separated them in `original`; tokens from different
/// words get a single space.
fn surfaces(tokens: &[Token], original: &str) -> String {
    let mut out = String::new();
    let mut prev: Option<&Token> = None;
    for token in tokens {
        if let Some(prev) = prev {
            match original.get(prev.end..token.start) {
                Some(sep) if !sep.chars().any(char::is_whitespace) => out.push_str(sep),
                _ => out.push(' '),
            }
        }
        out.push_str(&token.surface);
        prev = Some(token);
    }
    out
}

fn expected_reference<S: AsRef<str>>(result: &MatchResult, references: &[S]) -> String {
    references
        .get(result.reference_index)
        .map(|r| r.as_ref().to_string())
        .unwrap_or_else(|| surfaces(&result.reference, &result.reference_text))
}

/// One block of a [`CorrectionMessage`], with the surface text of both sides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrectionBlock {
    pub op: Opcode,
    pub input: String,
    pub reference: String,
}

/// Machine-readable form of a correction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrectionMessage {
    pub reference: String,
    pub ratio: f64,
    pub passed: bool,
    pub blocks: Vec<CorrectionBlock>,
}

impl CorrectionMessage {
    pub fn from_result<S: AsRef<str>>(result: &MatchResult, references: &[S]) -> Self {
        Self {
            reference: expected_reference(result, references),
            ratio: result.ratio,
            passed: result.passed,
            blocks: result
                .blocks
                .iter()
                .map(|block| CorrectionBlock {
                    op: block.op,
                    input: surfaces(&result.input[block.input.clone()], &result.input_text),
                    reference: surfaces(
                        &result.reference[block.reference.clone()],
                        &result.reference_text,
                    ),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matcher::{MatchConfig, Matcher};

    fn score(input: &str, refs: &[&str]) -> MatchResult {
        Matcher::new(MatchConfig::default())
            .unwrap()
            .match_attempt(input, refs)
            .unwrap()
    }

    #[test]
    fn plain_report_marks_every_edit_kind() {
        let refs = ["I have a big dog"];
        let result = score("i has a dog today", &refs);
        let report = render_correction(&result, &refs, ReportStyle::Plain);
        let mut lines = report.lines();

        assert_eq!(
            lines.next(),
            Some("i [-has-]{+have+} a {+big+} dog [-today-]")
        );
        assert_eq!(
            lines.next(),
            Some("Similarity: 60%  Expected: I have a big dog")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn exact_answer_keeps_user_spelling() {
        let refs = ["Good morning!"];
        let result = score("GOOD   Morning", &refs);
        let report = render_correction(&result, &refs, ReportStyle::Plain);
        assert_eq!(
            report,
            "GOOD Morning\nSimilarity: 100%  Expected: Good morning!"
        );
    }

    #[test]
    fn split_words_render_as_written() {
        let refs = ["It's late"];
        let result = score("late", &refs);
        let report = render_correction(&result, &refs, ReportStyle::Plain);
        assert_eq!(report.lines().next(), Some("{+It's+} late"));

        let refs = ["It's too late"];
        let result = score("it's late", &refs);
        let report = render_correction(&result, &refs, ReportStyle::Plain);
        assert_eq!(report.lines().next(), Some("it's {+too+} late"));

        let message = CorrectionMessage::from_result(&result, &refs);
        assert_eq!(message.blocks[0].reference, "It's");
    }

    #[test]
    fn chosen_reference_is_shown() {
        let refs = ["Thank you", "Thanks"];
        let result = score("thanks", &refs);
        let report = render_correction(&result, &refs, ReportStyle::Plain);
        assert!(report.ends_with("Expected: Thanks"));
    }

    #[test]
    fn colored_report_contains_ansi_codes() {
        colored::control::set_override(true);
        let refs = ["I have a dog"];
        let result = score("I has a dog", &refs);
        let report = render_correction(&result, &refs, ReportStyle::Colored);
        colored::control::unset_override();

        assert!(report.contains("\u{1b}["));
        assert!(report.contains(" → "));
        assert!(report.contains("Expected: I have a dog"));
    }

    #[test]
    fn correction_message_serializes_blocks() {
        let refs = ["I have a dog"];
        let result = score("I has a dog", &refs);
        let message = CorrectionMessage::from_result(&result, &refs);

        assert_eq!(message.reference, "I have a dog");
        assert_eq!(message.ratio, 0.75);
        assert!(message.passed);
        assert_eq!(message.blocks.len(), 3);
        assert_eq!(message.blocks[1].op, Opcode::Replace);
        assert_eq!(message.blocks[1].input, "has");
        assert_eq!(message.blocks[1].reference, "have");

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["blocks"][1]["op"], "replace");
        assert_eq!(json["blocks"][2]["input"], "a dog");
    }
}
