//! The interactive drill loop.

use std::collections::HashSet;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use canonical::collapse_whitespace;
use chrono::{DateTime, Utc};
use matcher::{MatchError, Matcher};
use tracing::{info, warn};

use crate::config::FlywheelConfig;
use crate::error::FlywheelError;
use crate::phrases::{read_phrases, PhraseWarning};
use crate::progress::ProgressStore;
use crate::report::{render_correction, ReportStyle};
use crate::schedule::{self, format_interval, MergeReport};

/// Everything a session needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct DrillContext {
    pub config: FlywheelConfig,
    pub matcher: Matcher,
    pub phrases_path: PathBuf,
    pub progress_path: PathBuf,
    pub style: ReportStyle,
}

impl DrillContext {
    pub fn new(
        config: FlywheelConfig,
        phrases_path: impl Into<PathBuf>,
        progress_path: impl Into<PathBuf>,
    ) -> Result<Self, FlywheelError> {
        let matcher = Matcher::new(config.match_config())?;
        let style = ReportStyle::from_color_flag(config.display.color);
        Ok(Self {
            config,
            matcher,
            phrases_path: phrases_path.into(),
            progress_path: progress_path.into(),
            style,
        })
    }

    /// Load both files, check there is something to drill and merge the
    /// phrase book into the progress store. The merged store is saved.
    pub fn prepare(&self, now: DateTime<Utc>) -> Result<Prepared, FlywheelError> {
        let canonical = self.config.canonical.to_canonical();
        let (phrases, warnings) = read_phrases(&self.phrases_path, &canonical);
        let mut progress = ProgressStore::load(&self.progress_path);

        schedule::assess(&phrases, &progress)?;
        let merge = schedule::merge(
            &phrases,
            &mut progress,
            self.config.schedule.initial_ease,
            now,
        );
        if !merge.is_unchanged() {
            progress.save(&self.progress_path)?;
        }

        Ok(Prepared {
            progress,
            merge,
            warnings,
        })
    }
}

/// Result of [`DrillContext::prepare`].
#[derive(Debug)]
pub struct Prepared {
    pub progress: ProgressStore,
    pub merge: MergeReport,
    pub warnings: Vec<PhraseWarning>,
}

/// Counts reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub answered: usize,
    pub passed: usize,
    pub skipped: usize,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} answered, {} correct, {} skipped",
            self.answered, self.passed, self.skipped
        )
    }
}

/// A drill session reading answers from `input` and writing to `output`.
pub struct Session<'a, R, W> {
    ctx: &'a DrillContext,
    progress: ProgressStore,
    input: R,
    output: W,
    rounds: Option<usize>,
    skipped: HashSet<String>,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(ctx: &'a DrillContext, progress: ProgressStore, input: R, output: W) -> Self {
        Self {
            ctx,
            progress,
            input,
            output,
            rounds: None,
            skipped: HashSet::new(),
        }
    }

    /// Stop after `rounds` answered phrases.
    pub fn with_rounds(mut self, rounds: Option<usize>) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    pub fn into_progress(self) -> ProgressStore {
        self.progress
    }

    /// Ask phrases until the user quits, input ends, the round limit is hit
    /// or every phrase has been skipped.
    pub fn run(&mut self) -> Result<SessionSummary, FlywheelError> {
        let mut summary = SessionSummary::default();

        loop {
            if self.rounds.is_some_and(|limit| summary.answered >= limit) {
                break;
            }
            let now = Utc::now();
            let skipped = &self.skipped;
            let Some(key) =
                schedule::next_phrase_where(&self.progress, now, |k| !skipped.contains(k))
            else {
                break;
            };

            self.prompt(&key)?;
            let Some(answer) = self.read_answer()? else {
                writeln!(self.output).map_err(FlywheelError::Console)?;
                break;
            };

            match answer.as_str() {
                ":q" | ":quit" => break,
                ":skip" => {
                    info!(phrase = %key, "phrase_skipped");
                    self.skipped.insert(key);
                    summary.skipped += 1;
                }
                _ => match self.answer(&key, &answer, now) {
                    Ok(passed) => {
                        summary.answered += 1;
                        if passed {
                            summary.passed += 1;
                        }
                    }
                    Err(FlywheelError::Match(MatchError::NoReferences)) => {
                        warn!(phrase = %key, "phrase_without_references");
                        self.say(&format!("\"{key}\" has no english phrase; skipped"))?;
                        self.skipped.insert(key);
                        summary.skipped += 1;
                    }
                    Err(err) => return Err(err),
                },
            }
        }

        info!(
            answered = summary.answered,
            passed = summary.passed,
            skipped = summary.skipped,
            "session_finished"
        );
        Ok(summary)
    }

    fn prompt(&mut self, native: &str) -> Result<(), FlywheelError> {
        write!(self.output, "Enter phrase \"{native}\" in english: ")
            .and_then(|_| self.output.flush())
            .map_err(FlywheelError::Console)
    }

    fn read_answer(&mut self) -> Result<Option<String>, FlywheelError> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(FlywheelError::Console)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(collapse_whitespace(&line)))
    }

    fn say(&mut self, text: &str) -> Result<(), FlywheelError> {
        writeln!(self.output, "{text}").map_err(FlywheelError::Console)
    }

    /// Score, print and record one answer. Returns whether it passed.
    fn answer(&mut self, key: &str, answer: &str, now: DateTime<Utc>) -> Result<bool, FlywheelError> {
        let references = self
            .progress
            .get(key)
            .map(|rep| rep.references.clone())
            .ok_or_else(|| FlywheelError::UnknownPhrase(key.to_string()))?;

        let result = self.ctx.matcher.match_attempt(answer, &references)?;
        let report = render_correction(&result, &references, self.ctx.style);
        self.say(&report)?;

        let outcome = schedule::record_attempt(
            &mut self.progress,
            key,
            result.ratio,
            answer,
            self.ctx.matcher.config().pass_ratio,
            now,
        )?;
        self.say(&format!("Next review: {}", format_interval(outcome.interval_days)))?;

        if let Err(err) = self.save() {
            self.say(&format!("warning: {err}"))?;
        }
        Ok(outcome.passed())
    }

    fn save(&self) -> Result<(), FlywheelError> {
        self.progress.save(&self.ctx.progress_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Repetition;
    use crate::schedule::MAX_INTERVAL_DAYS;
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;

    fn plain_config() -> FlywheelConfig {
        let mut config = FlywheelConfig::default();
        config.display.color = false;
        config
    }

    fn context(dir: &Path, phrases: &str) -> DrillContext {
        let phrases_path = dir.join("phrases.txt");
        fs::write(&phrases_path, phrases).unwrap();
        DrillContext::new(plain_config(), phrases_path, dir.join("repetitions.json")).unwrap()
    }

    fn run(ctx: &DrillContext, progress: ProgressStore, input: &str) -> (SessionSummary, String, ProgressStore) {
        let mut output = Vec::new();
        let mut session = Session::new(ctx, progress, Cursor::new(input.to_string()), &mut output);
        let summary = session.run().unwrap();
        let progress = session.into_progress();
        (summary, String::from_utf8(output).unwrap(), progress)
    }

    #[test]
    fn prepare_merges_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), "Hallo||Hello\nDanke||Thanks\n");

        let prepared = ctx.prepare(Utc::now()).unwrap();
        assert!(prepared.warnings.is_empty());
        assert_eq!(prepared.merge.added.len(), 2);
        assert_eq!(ProgressStore::load(&ctx.progress_path), prepared.progress);
    }

    #[test]
    fn prepare_fails_without_phrases() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), "# nothing yet\n");
        assert!(matches!(
            ctx.prepare(Utc::now()),
            Err(FlywheelError::Assessment(_))
        ));
    }

    #[test]
    fn answers_are_scored_recorded_and_saved() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), "Hallo||Hello\n");
        let prepared = ctx.prepare(Utc::now()).unwrap();

        let (summary, output, progress) = run(&ctx, prepared.progress, "hello\n:q\n");

        assert_eq!(summary, SessionSummary { answered: 1, passed: 1, skipped: 0 });
        assert!(output.starts_with("Enter phrase \"Hallo\" in english: hello\n"));
        assert!(output.contains("Similarity: 100%  Expected: Hello"));
        assert!(output.contains("Next review: 1d"));

        let rep = progress.get("Hallo").unwrap();
        assert_eq!(rep.attempts, 1);
        assert_eq!(rep.last_answer.as_deref(), Some("hello"));
        assert_eq!(ProgressStore::load(&ctx.progress_path), progress);
    }

    #[test]
    fn failed_answer_is_asked_again() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), "Hallo||Hello there\n");
        let prepared = ctx.prepare(Utc::now()).unwrap();

        let (summary, output, _) = run(&ctx, prepared.progress, "bye\nhello there\n");

        assert_eq!(summary.answered, 2);
        assert_eq!(summary.passed, 1);
        assert_eq!(output.matches("Enter phrase \"Hallo\"").count(), 3);
        assert!(output.contains("[-bye-]{+Hello there+}"));
        assert!(output.contains("Next review: now"));
    }

    #[test]
    fn skip_moves_on_and_eof_ends() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), "Eins||One\nZwei||Two\n");
        let prepared = ctx.prepare(Utc::now()).unwrap();

        let (summary, output, progress) = run(&ctx, prepared.progress, ":skip\n");

        assert_eq!(summary, SessionSummary { answered: 0, passed: 0, skipped: 1 });
        assert!(output.contains("Enter phrase \"Eins\""));
        assert!(output.contains("Enter phrase \"Zwei\""));
        assert_eq!(progress.get("Eins").unwrap().attempts, 0);
    }

    #[test]
    fn round_limit_stops_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), "Eins||One\nZwei||Two\n");
        let prepared = ctx.prepare(Utc::now()).unwrap();

        let mut output = Vec::new();
        let mut session = Session::new(&ctx, prepared.progress, Cursor::new("one\ntwo\n"), &mut output)
            .with_rounds(Some(1));
        let summary = session.run().unwrap();

        assert_eq!(summary.answered, 1);
        assert_eq!(session.progress().get("Zwei").unwrap().attempts, 0);
    }

    #[test]
    fn phrase_without_references_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), "");
        let mut progress = ProgressStore::new();
        progress.insert("Leer", Repetition::new(Vec::new(), 2.5, Utc::now()));

        let (summary, output, _) = run(&ctx, progress, "anything\n");
        assert_eq!(summary.skipped, 1);
        assert!(output.contains("has no english phrase"));
    }

    #[test]
    fn long_run_of_correct_answers_keeps_going() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), "Ja||Yes\n");
        let prepared = ctx.prepare(Utc::now()).unwrap();

        let answers = "yes\n".repeat(30);
        let (summary, output, progress) = run(&ctx, prepared.progress, &answers);

        assert_eq!(summary.answered, 30);
        assert_eq!(summary.passed, 30);
        assert_eq!(output.matches("Enter phrase \"Ja\"").count(), 31);
        let rep = progress.get("Ja").unwrap();
        assert_eq!(rep.streak, 30);
        assert_eq!(rep.interval_days, MAX_INTERVAL_DAYS);
        assert_eq!(ProgressStore::load(&ctx.progress_path), progress);
    }

    #[test]
    fn summary_display() {
        let summary = SessionSummary { answered: 3, passed: 2, skipped: 1 };
        assert_eq!(summary.to_string(), "3 answered, 2 correct, 1 skipped");
    }
}
