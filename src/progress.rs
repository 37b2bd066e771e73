//! Persistent repetition state, one record per phrase.
//!
//! The progress file is a JSON object keyed by native phrase:
//!
//! ```json
//! {
//!   "Guten Morgen": {
//!     "references": ["Good morning"],
//!     "attempts": 3,
//!     "last_ratio": 0.8,
//!     "last_answer": "Good mornin",
//!     "streak": 1,
//!     "ease_factor": 2.36,
//!     "interval_days": 1,
//!     "due": "2026-10-20T09:12:44Z",
//!     "status": "learning"
//!   }
//! }
//! ```

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::FlywheelError;

/// Where a phrase is in its learning cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepetitionStatus {
    /// Never attempted.
    #[default]
    New,
    /// Recently introduced or recently failed for the first time.
    Learning,
    /// Answered correctly at least twice in a row.
    Review,
    /// Failed after having reached review.
    Relearning,
}

/// Repetition metadata of one phrase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Repetition {
    /// Accepted translations, copied from the phrase file at merge time.
    pub references: Vec<String>,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub last_ratio: Option<f64>,
    #[serde(default)]
    pub last_answer: Option<String>,
    /// Consecutive correct answers.
    #[serde(default)]
    pub streak: u32,
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f32,
    #[serde(default)]
    pub interval_days: i64,
    pub due: DateTime<Utc>,
    #[serde(default)]
    pub status: RepetitionStatus,
}

fn default_ease_factor() -> f32 {
    2.5
}

impl Repetition {
    /// A phrase that has never been attempted and is due at `now`.
    pub fn new(references: Vec<String>, ease_factor: f32, now: DateTime<Utc>) -> Self {
        Self {
            references,
            attempts: 0,
            last_ratio: None,
            last_answer: None,
            streak: 0,
            ease_factor,
            interval_days: 0,
            due: now,
            status: RepetitionStatus::New,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due <= now
    }
}

/// In-memory progress map, saved after every attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressStore {
    entries: BTreeMap<String, Repetition>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Repetition> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Repetition> {
        self.entries.get_mut(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, repetition: Repetition) -> Option<Repetition> {
        self.entries.insert(key.into(), repetition)
    }

    pub fn remove(&mut self, key: &str) -> Option<Repetition> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Repetition> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Keep only entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &Repetition) -> bool) {
        self.entries.retain(|k, v| keep(k, v));
    }

    /// Parse progress JSON. Blank content is an empty store.
    pub fn from_json(content: &str) -> Result<Self, FlywheelError> {
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_json::from_str(content).map_err(|e| FlywheelError::json("parsing progress file", e))
    }

    /// Pretty-printed JSON with non-ASCII text kept as is.
    pub fn to_json(&self) -> Result<String, FlywheelError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FlywheelError::json("serializing progress", e))
    }

    /// Load progress from `path`.
    ///
    /// Never fails: a missing, unreadable or malformed file is logged and
    /// treated as an empty store.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                warn!(file = %path.display(), error = %err, "progress_file_unreadable");
                return Self::new();
            }
        };
        match Self::from_json(&content) {
            Ok(store) => {
                info!(file = %path.display(), phrases = store.len(), "progress_loaded");
                store
            }
            Err(err) => {
                warn!(file = %path.display(), error = %err, "progress_file_malformed");
                Self::new()
            }
        }
    }

    /// Write the whole store to `path`.
    pub fn save(&self, path: &Path) -> Result<(), FlywheelError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| {
            warn!(file = %path.display(), error = %e, "progress_save_failed");
            FlywheelError::io("saving progress file", path, e)
        })?;
        debug!(file = %path.display(), phrases = self.len(), "progress_saved");
        Ok(())
    }
}
