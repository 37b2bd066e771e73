//! Spaced repetition scheduling.
//!
//! Scheduling follows SuperMemo 2. The similarity ratio of an answer is
//! turned into an SM-2 quality grade:
//!
//! | ratio            | quality |
//! |------------------|---------|
//! | exact (≥ 0.999)  | 5       |
//! | ≥ 0.9            | 4       |
//! | ≥ pass ratio     | 3       |
//! | ≥ 0.5            | 2       |
//! | > 0              | 1       |
//! | 0                | 0       |
//!
//! Quality 3 and above counts as correct and grows the review interval;
//! anything below puts the phrase back into (re)learning, due immediately.
//! Intervals never exceed [`MAX_INTERVAL_DAYS`].

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::FlywheelError;
use crate::phrases::PhraseBook;
use crate::progress::{ProgressStore, Repetition, RepetitionStatus};

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f32 = 1.3;

/// Longest interval between two reviews, about a century.
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

/// Ratio treated as a perfect answer; guards against float noise.
const EXACT_RATIO: f64 = 0.999;

/// Check that a session has something to drill.
pub fn assess(phrases: &PhraseBook, progress: &ProgressStore) -> Result<(), FlywheelError> {
    if phrases.is_empty() && progress.is_empty() {
        return Err(FlywheelError::Assessment(
            "no phrases found; add lines like `native||english` to the phrase file".into(),
        ));
    }
    Ok(())
}

/// What [`merge`] changed in the progress store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
    pub total: usize,
}

impl MergeReport {
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unchanged() {
            return write!(f, "{} phrases, no changes in the phrase file", self.total);
        }
        write!(
            f,
            "{} phrases: {} new, {} updated, {} removed",
            self.total,
            self.added.len(),
            self.updated.len(),
            self.removed.len()
        )
    }
}

/// Bring the progress store in line with the phrase book.
///
/// New phrases become due at `now`. Existing phrases keep their history but
/// pick up changed references. Phrases that left the phrase book are dropped,
/// unless the phrase book is empty (an unreadable phrase file must not wipe
/// the user's progress).
pub fn merge(
    phrases: &PhraseBook,
    progress: &mut ProgressStore,
    initial_ease: f32,
    now: DateTime<Utc>,
) -> MergeReport {
    let mut report = MergeReport::default();

    for (native, references) in phrases {
        match progress.get_mut(native) {
            Some(rep) => {
                if &rep.references != references {
                    rep.references = references.clone();
                    report.updated.push(native.clone());
                }
            }
            None => {
                progress.insert(
                    native.clone(),
                    Repetition::new(references.clone(), initial_ease, now),
                );
                report.added.push(native.clone());
            }
        }
    }

    if !phrases.is_empty() {
        progress.retain(|key, _| {
            let keep = phrases.contains(key);
            if !keep {
                report.removed.push(key.to_string());
            }
            keep
        });
    }

    report.total = progress.len();
    info!(
        added = report.added.len(),
        updated = report.updated.len(),
        removed = report.removed.len(),
        total = report.total,
        "progress_merged"
    );
    report
}

/// Pick the phrase to ask next.
///
/// The earliest due phrase wins; among equally due phrases the one with the
/// shorter streak, then the lower key. When nothing is due yet the phrase
/// that becomes due soonest is returned, so a session can always continue.
pub fn next_phrase(progress: &ProgressStore, now: DateTime<Utc>) -> Option<String> {
    next_phrase_where(progress, now, |_| true)
}

/// [`next_phrase`] restricted to keys accepted by `eligible`.
pub fn next_phrase_where(
    progress: &ProgressStore,
    now: DateTime<Utc>,
    mut eligible: impl FnMut(&str) -> bool,
) -> Option<String> {
    let choice = progress
        .iter()
        .filter(|(key, _)| eligible(key.as_str()))
        .min_by(|(ka, a), (kb, b)| compare_urgency(a, b).then_with(|| ka.cmp(kb)))
        .map(|(key, rep)| (key.clone(), rep.is_due(now)));

    if let Some((key, due)) = &choice {
        debug!(phrase = %key, due, "next_phrase");
    }
    choice.map(|(key, _)| key)
}

fn compare_urgency(a: &Repetition, b: &Repetition) -> Ordering {
    a.due.cmp(&b.due).then(a.streak.cmp(&b.streak))
}

/// Map a similarity ratio to an SM-2 quality grade (0-5).
pub fn quality_from_ratio(ratio: f64, pass_ratio: f64) -> u8 {
    if ratio >= EXACT_RATIO {
        5
    } else if ratio >= 0.9 && pass_ratio <= 0.9 {
        4
    } else if ratio >= pass_ratio {
        3
    } else if ratio >= 0.5 {
        2
    } else if ratio > 0.0 {
        1
    } else {
        0
    }
}

/// Result of applying one graded answer to a repetition.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    pub quality: u8,
    pub interval_days: i64,
    pub ease_factor: f32,
    pub due: DateTime<Utc>,
    pub status: RepetitionStatus,
}

impl ReviewOutcome {
    pub fn passed(&self) -> bool {
        self.quality >= 3
    }
}

/// Calculate the next review using the SM-2 algorithm.
pub fn calculate_next_review(rep: &Repetition, quality: u8, now: DateTime<Utc>) -> ReviewOutcome {
    let quality = quality.min(5);
    let mut ease_factor = rep.ease_factor;
    let interval_days;
    let status;

    if quality >= 3 {
        match rep.streak {
            0 => {
                interval_days = 1;
                status = RepetitionStatus::Learning;
            }
            1 => {
                interval_days = 6;
                status = RepetitionStatus::Review;
            }
            _ => {
                // Loaded records may carry any interval or ease; the `as` cast
                // saturates and the clamp bounds it.
                let previous = rep.interval_days.clamp(1, MAX_INTERVAL_DAYS);
                let grown = (previous as f64 * f64::from(ease_factor)).round() as i64;
                interval_days = grown.clamp(1, MAX_INTERVAL_DAYS);
                status = RepetitionStatus::Review;
            }
        }

        // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
        let miss = f32::from(5 - quality);
        ease_factor += 0.1 - miss * (0.08 + miss * 0.02);
        ease_factor = ease_factor.max(MIN_EASE_FACTOR);
    } else {
        // Ask again in this session.
        interval_days = 0;
        ease_factor = (ease_factor - 0.2).max(MIN_EASE_FACTOR);
        status = match rep.status {
            RepetitionStatus::Review | RepetitionStatus::Relearning => RepetitionStatus::Relearning,
            RepetitionStatus::New | RepetitionStatus::Learning => RepetitionStatus::Learning,
        };
    }

    ReviewOutcome {
        quality,
        interval_days,
        ease_factor,
        due: now
            .checked_add_signed(Duration::days(interval_days))
            .unwrap_or(DateTime::<Utc>::MAX_UTC),
        status,
    }
}

/// Record an answer for `key` and reschedule it.
pub fn record_attempt(
    progress: &mut ProgressStore,
    key: &str,
    ratio: f64,
    answer: &str,
    pass_ratio: f64,
    now: DateTime<Utc>,
) -> Result<ReviewOutcome, FlywheelError> {
    let rep = progress
        .get_mut(key)
        .ok_or_else(|| FlywheelError::UnknownPhrase(key.to_string()))?;

    let quality = quality_from_ratio(ratio, pass_ratio);
    let outcome = calculate_next_review(rep, quality, now);

    rep.attempts = rep.attempts.saturating_add(1);
    rep.last_ratio = Some(ratio);
    rep.last_answer = Some(answer.to_string());
    rep.streak = if outcome.passed() {
        rep.streak.saturating_add(1)
    } else {
        0
    };
    rep.ease_factor = outcome.ease_factor;
    rep.interval_days = outcome.interval_days;
    rep.due = outcome.due;
    rep.status = outcome.status;

    info!(
        phrase = %key,
        ratio,
        quality = outcome.quality,
        interval_days = outcome.interval_days,
        streak = rep.streak,
        "attempt_recorded"
    );
    Ok(outcome)
}

/// Format an interval in days to a short human-readable string.
pub fn format_interval(days: i64) -> String {
    match days {
        d if d <= 0 => "now".to_string(),
        d if d < 7 => format!("{d}d"),
        d if d < 30 => format!("{}w", d / 7),
        d if d < 365 => format!("{}mo", d / 30),
        d => format!("{}y", d / 365),
    }
}
