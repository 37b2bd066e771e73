use std::path::PathBuf;

use matcher::MatchError;
use thiserror::Error;

use crate::config::ConfigLoadError;

/// Errors surfaced by the drill application layer.
///
/// Most file problems never reach the caller as errors: phrase and progress
/// loading log the failure and fall back to an empty mapping. What remains
/// here are the failures a caller has to act on.
#[derive(Debug, Error)]
pub enum FlywheelError {
    #[error("I/O error while {context} {path:?}: {source}")]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigLoadError),
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error("console I/O error: {0}")]
    Console(#[source] std::io::Error),
    #[error("cannot start a drill session: {0}")]
    Assessment(String),
    #[error("unknown phrase: {0}")]
    UnknownPhrase(String),
}

impl FlywheelError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }
}
