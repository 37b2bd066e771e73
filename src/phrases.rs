//! Phrase file parsing.
//!
//! A phrase file is line oriented UTF-8 text:
//!
//! ```text
//! # comments start with a hash
//! Guten Morgen||Good morning
//! Wie geht's?|Wie geht es dir?||How are you?|How are you doing?
//! ```
//!
//! The part before `||` holds the native phrase, the part after it the
//! accepted translations; `|` separates alternatives on either side. Every
//! native alternative becomes its own entry mapping to all translations.

use std::collections::btree_map;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use canonical::{canonicalize, collapse_whitespace, CanonicalError, CanonicalizeConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Separator between the native side and the translation side.
pub const PAIR_SEPARATOR: &str = "||";
/// Separator between alternatives on one side.
pub const ALTERNATIVE_SEPARATOR: char = '|';

/// A native phrase and its accepted translations, in file order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Phrase {
    pub native: String,
    pub references: Vec<String>,
}

/// Why a single line of the phrase file was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PhraseLineError {
    #[error("line contains {count} \"||\" separators; exactly one is allowed between native and english phrases")]
    TooManySeparators { count: usize },
    #[error("empty native phrase")]
    EmptyNative,
    #[error("empty english phrase")]
    EmptyReference,
    #[error("english phrase {0:?} has nothing left to compare after normalization")]
    UnscorableReference(String),
    #[error("invalid normalization settings: {0}")]
    Canonical(CanonicalError),
}

/// A problem met while loading a phrase file. None of them is fatal.
#[derive(Debug, Error)]
pub enum PhraseWarning {
    #[error("cannot open or parse {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line} skipped: {error}")]
    Line {
        line: usize,
        #[source]
        error: PhraseLineError,
    },
    #[error("line {line}: phrase {native:?} replaces the one from line {previous}")]
    Duplicate {
        line: usize,
        previous: usize,
        native: String,
    },
}

/// Typed store of phrases keyed by native text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseBook {
    entries: BTreeMap<String, Vec<String>>,
}

impl PhraseBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a phrase, returning the references it replaced.
    pub fn insert(&mut self, phrase: Phrase) -> Option<Vec<String>> {
        self.entries.insert(phrase.native, phrase.references)
    }

    pub fn get(&self, native: &str) -> Option<&[String]> {
        self.entries.get(native).map(Vec::as_slice)
    }

    pub fn contains(&self, native: &str) -> bool {
        self.entries.contains_key(native)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.entries.iter()
    }

    /// Parse phrase file contents. Rejected lines are reported, not fatal.
    pub fn parse(content: &str, cfg: &CanonicalizeConfig) -> (Self, Vec<PhraseWarning>) {
        let mut book = PhraseBook::new();
        let mut warnings = Vec::new();
        let mut origin: HashMap<String, usize> = HashMap::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = idx + 1;
            match parse_line(raw, cfg) {
                Ok(phrases) => {
                    for phrase in phrases {
                        if let Some(previous) = origin.insert(phrase.native.clone(), line) {
                            if previous != line {
                                warnings.push(PhraseWarning::Duplicate {
                                    line,
                                    previous,
                                    native: phrase.native.clone(),
                                });
                            }
                        }
                        book.insert(phrase);
                    }
                }
                Err(error) => warnings.push(PhraseWarning::Line { line, error }),
            }
        }

        (book, warnings)
    }
}

impl<'a> IntoIterator for &'a PhraseBook {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Parse one line of a phrase file.
///
/// Comment lines, blank lines and lines without `||` yield no phrases.
pub fn parse_line(line: &str, cfg: &CanonicalizeConfig) -> Result<Vec<Phrase>, PhraseLineError> {
    let line = line.trim_start_matches('\u{feff}');
    if line.starts_with('#') || !line.contains(PAIR_SEPARATOR) {
        return Ok(Vec::new());
    }

    let parts: Vec<&str> = line.split(PAIR_SEPARATOR).collect();
    if parts.len() > 2 {
        return Err(PhraseLineError::TooManySeparators {
            count: parts.len() - 1,
        });
    }

    let natives = alternatives(parts[0]).ok_or(PhraseLineError::EmptyNative)?;
    let references = alternatives(parts[1]).ok_or(PhraseLineError::EmptyReference)?;

    for reference in &references {
        match canonicalize(reference, cfg) {
            Ok(_) => {}
            Err(CanonicalError::EmptyInput) => {
                return Err(PhraseLineError::UnscorableReference(reference.clone()))
            }
            Err(err) => return Err(PhraseLineError::Canonical(err)),
        }
    }

    Ok(natives
        .into_iter()
        .map(|native| Phrase {
            native,
            references: references.clone(),
        })
        .collect())
}

/// Split one side on `|`; `None` if any alternative is blank.
fn alternatives(side: &str) -> Option<Vec<String>> {
    side.split(ALTERNATIVE_SEPARATOR)
        .map(collapse_whitespace)
        .map(|alt| if alt.is_empty() { None } else { Some(alt) })
        .collect()
}

/// Read a phrase file, logging every warning.
///
/// Never fails: an unreadable file yields an empty book plus a warning.
pub fn read_phrases(path: &Path, cfg: &CanonicalizeConfig) -> (PhraseBook, Vec<PhraseWarning>) {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(source) => {
            let warning = PhraseWarning::Unreadable {
                path: path.to_path_buf(),
                source,
            };
            warn!(error = %warning, "phrase_file_unreadable");
            return (PhraseBook::new(), vec![warning]);
        }
    };

    let (book, warnings) = PhraseBook::parse(&content, cfg);
    for warning in &warnings {
        warn!(file = %path.display(), warning = %warning, "phrase_line_skipped");
    }
    if book.is_empty() {
        debug!(file = %path.display(), "phrase_file_empty");
    }
    info!(
        file = %path.display(),
        phrases = book.len(),
        warnings = warnings.len(),
        "phrases_loaded"
    );
    (book, warnings)
}
