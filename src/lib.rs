//! Flywheel: a phrase drill with fuzzy answer checking and spaced repetition.
//!
//! The umbrella crate ties the workspace together:
//!
//! - [`phrases`] reads the phrase file into a typed [`PhraseBook`].
//! - [`progress`] loads and saves the JSON [`ProgressStore`].
//! - [`schedule`] merges the two and decides what to ask next (SM-2).
//! - [`report`] turns a [`MatchResult`] into a readable correction.
//! - [`session`] runs the prompt/answer loop over any reader and writer.
//!
//! Scoring itself lives in the `matcher` crate, normalization in
//! `canonical`; both are re-exported here.
//!
//! ```
//! use flywheel::{render_correction, MatchConfig, Matcher, ReportStyle};
//!
//! let matcher = Matcher::new(MatchConfig::default()).expect("valid config");
//! let references = ["Good morning"];
//! let result = matcher
//!     .match_attempt("good mornin", &references)
//!     .expect("references present");
//!
//! let report = render_correction(&result, &references, ReportStyle::Plain);
//! assert_eq!(report, "good [-mornin-]{+morning+}\nSimilarity: 50%  Expected: Good morning");
//! ```

pub mod config;
pub mod error;
pub mod files;
pub mod logging;
pub mod phrases;
pub mod progress;
pub mod report;
pub mod schedule;
pub mod session;

pub use canonical::{canonicalize, CanonicalError, CanonicalizeConfig, Token};
pub use matcher::{
    find_matching_blocks, find_nearest_reference, AlignmentBlock, MatchConfig, MatchError,
    MatchResult, Matcher, Opcode,
};

pub use crate::config::{ConfigLoadError, FlywheelConfig};
pub use crate::error::FlywheelError;
pub use crate::files::find_or_create_file;
pub use crate::logging::init_logging;
pub use crate::phrases::{read_phrases, Phrase, PhraseBook, PhraseLineError, PhraseWarning};
pub use crate::progress::{ProgressStore, Repetition, RepetitionStatus};
pub use crate::report::{render_correction, CorrectionMessage, ReportStyle};
pub use crate::schedule::{assess, merge, next_phrase, record_attempt, MergeReport};
pub use crate::session::{DrillContext, Prepared, Session, SessionSummary};
