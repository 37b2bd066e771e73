use std::fs;
use std::io::Cursor;

use chrono::Utc;
use flywheel::{
    find_or_create_file, DrillContext, FlywheelConfig, ProgressStore, RepetitionStatus, Session,
};

const PHRASES: &str = "\
# German basics
Guten Morgen||Good morning
Wie geht's?||How are you?|How are you doing?
Danke|Danke schön||Thank you|Thanks
";

#[test]
fn drill_session_from_files_to_saved_progress() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let phrases_path = dir.path().join("phrases.txt");
    fs::write(&phrases_path, PHRASES)?;

    let progress_path = find_or_create_file(&dir.path().join("state/repetitions.json"), None)?;
    assert!(progress_path.is_file());

    let mut config = FlywheelConfig::from_yaml("display:\n  color: false\n")?;
    config.files.phrases = phrases_path.clone();
    config.files.progress = progress_path.clone();

    let ctx = DrillContext::new(config, &phrases_path, &progress_path)?;
    let prepared = ctx.prepare(Utc::now())?;
    assert!(prepared.warnings.is_empty());
    assert_eq!(prepared.merge.to_string(), "4 phrases: 4 new, 0 updated, 0 removed");

    // Phrases come in key order: Danke, Danke schön, Guten Morgen, Wie geht's?
    let answers = "thanks\nThank you\ngood mornin\nhow are you doing\n";
    let mut output = Vec::new();
    let mut session = Session::new(&ctx, prepared.progress, Cursor::new(answers), &mut output)
        .with_rounds(Some(4));
    let summary = session.run()?;
    let progress = session.into_progress();

    assert_eq!(summary.answered, 4);
    assert_eq!(summary.passed, 3);

    let text = String::from_utf8(output)?;
    assert!(text.contains("Enter phrase \"Wie geht's?\" in english: "));
    assert!(text.contains("good [-mornin-]{+morning+}"));
    assert!(text.contains("Expected: How are you doing?"));

    let saved = ProgressStore::load(&progress_path);
    assert_eq!(saved, progress);
    let morning = saved.get("Guten Morgen").expect("phrase kept");
    assert_eq!(morning.last_ratio, Some(0.5));
    assert_eq!(morning.status, RepetitionStatus::Learning);
    assert_eq!(morning.streak, 0);
    assert_eq!(saved.get("Danke").expect("phrase kept").streak, 1);

    Ok(())
}

#[test]
fn editing_the_phrase_file_updates_progress() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let phrases_path = dir.path().join("phrases.txt");
    let progress_path = dir.path().join("repetitions.json");
    fs::write(&phrases_path, PHRASES)?;

    let ctx = DrillContext::new(FlywheelConfig::default(), &phrases_path, &progress_path)?;
    ctx.prepare(Utc::now())?;

    fs::write(
        &phrases_path,
        "Guten Morgen||Good morning|Morning\nBis bald||See you soon\n",
    )?;
    let prepared = ctx.prepare(Utc::now())?;

    assert_eq!(prepared.merge.added, vec!["Bis bald"]);
    assert_eq!(prepared.merge.updated, vec!["Guten Morgen"]);
    assert_eq!(prepared.merge.removed.len(), 3);
    assert_eq!(ProgressStore::load(&progress_path).len(), 2);

    Ok(())
}
