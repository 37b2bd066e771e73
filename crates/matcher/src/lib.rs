//! # Flywheel Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` scores a typed translation against the acceptable reference
//! translations of a phrase. It answers two questions:
//!
//! - which reference is the user closest to, and how close ([`find_nearest_reference`])
//! - what exactly differs from that reference ([`find_matching_blocks`])
//!
//! Similarity is the longest-common-subsequence ratio `2 * LCS / (|a| + |b|)`
//! over canonical tokens, so word order matters and a single wrong word in a
//! long sentence costs less than in a short one.
//!
//! ## Core Types
//!
//! - [`MatchConfig`]: canonicalization settings and the pass ratio.
//! - [`Matcher`]: canonicalizes text and runs both operations.
//! - [`MatchResult`]: chosen reference, ratio, alignment and tokens.
//! - [`AlignmentBlock`] / [`Opcode`]: one equal/replace/insert/delete span.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{MatchConfig, Matcher, Opcode};
//!
//! let matcher = Matcher::new(MatchConfig::default()).expect("valid config");
//! let result = matcher
//!     .match_attempt("I has a dog", &["I have a dog", "I own a dog"])
//!     .expect("references present");
//!
//! assert_eq!(result.reference_index, 0);
//! assert!(result.ratio > 0.7 && result.ratio < 1.0);
//! assert_eq!(result.blocks[1].op, Opcode::Replace);
//! ```
//!
//! The free functions work on any token type:
//!
//! ```
//! use matcher::find_nearest_reference;
//!
//! let (index, ratio) = find_nearest_reference(
//!     &["hello", "world"],
//!     &[vec!["hello", "world"], vec!["goodbye"]],
//! );
//! assert_eq!((index, ratio), (0, 1.0));
//! ```

pub mod engine;
pub mod types;

pub use crate::engine::{
    align, find_matching_blocks, find_nearest_reference, similarity_ratio, Matcher,
};
pub use crate::types::{AlignmentBlock, MatchConfig, MatchError, MatchResult, Opcode};
