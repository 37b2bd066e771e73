//! flywheel - drill translations of your own phrase list.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use flywheel::{find_or_create_file, init_logging, DrillContext, FlywheelConfig, Session};

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "flywheel.yaml";

/// Drill translations of your own phrase list with spaced repetition.
#[derive(Parser, Debug)]
#[command(name = "flywheel", version)]
#[command(about = "Drill translations of your own phrase list with spaced repetition")]
struct Args {
    /// YAML config file (default: ./flywheel.yaml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Phrase file, one `native||english` pair per line
    #[arg(short, long)]
    phrases: Option<PathBuf>,

    /// Progress file (JSON)
    #[arg(long)]
    progress: Option<PathBuf>,

    /// Log filter, e.g. `info` or `flywheel=debug`
    #[arg(long)]
    log_level: Option<String>,

    /// Disable colored corrections
    #[arg(long)]
    no_color: bool,

    /// Stop after this many answered phrases
    #[arg(short = 'n', long)]
    rounds: Option<usize>,

    /// Load and validate everything, print the merge summary and exit
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    init_logging(&config.logging).context("failed to set up logging")?;

    let search_root = config.files.search_root.as_deref();
    let phrases_path = find_or_create_file(&config.files.phrases, search_root)?;
    let progress_path = find_or_create_file(&config.files.progress, search_root)?;

    let ctx = DrillContext::new(config, phrases_path, progress_path)?;
    let prepared = ctx.prepare(Utc::now())?;

    for warning in &prepared.warnings {
        eprintln!("warning: {}: {warning}", ctx.phrases_path.display());
    }
    println!("{}", prepared.merge);

    if args.check {
        return Ok(());
    }

    let summary = Session::new(&ctx, prepared.progress, io::stdin().lock(), io::stdout().lock())
        .with_rounds(args.rounds)
        .run()?;
    println!("{summary}");

    Ok(())
}

fn load_config(args: &Args) -> Result<FlywheelConfig> {
    let mut config = match &args.config {
        Some(path) => FlywheelConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            FlywheelConfig::from_file(DEFAULT_CONFIG_FILE)
                .with_context(|| format!("failed to load config {DEFAULT_CONFIG_FILE}"))?
        }
        None => FlywheelConfig::default(),
    };

    if let Some(phrases) = &args.phrases {
        config.files.phrases = phrases.clone();
    }
    if let Some(progress) = &args.progress {
        config.files.progress = progress.clone();
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.no_color {
        config.display.color = false;
    }
    config.validate().context("invalid configuration")?;

    Ok(config)
}
