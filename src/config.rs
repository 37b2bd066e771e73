//! YAML configuration file support for flywheel.
//!
//! Every section is optional; a missing file section falls back to the
//! defaults below, and command-line flags override what the file says.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//!
//! files:
//!   phrases: "phrases.txt"
//!   progress: "repetitions.json"
//!   search_root: "~/notes/languages"
//!
//! canonical:
//!   version: 1
//!   normalize_unicode: true
//!   lowercase: true
//!   strip_punctuation: true
//!
//! schedule:
//!   pass_ratio: 0.75
//!   initial_ease: 2.5
//!
//! display:
//!   color: true
//!
//! logging:
//!   level: "warn"
//!   file: "logs/fw.log"
//!   max_file_bytes: 1048576
//!   max_files: 10
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use canonical::CanonicalizeConfig;
use matcher::MatchConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration of a drill session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct FlywheelConfig {
    /// Configuration format version
    #[serde(default = "default_format_version")]
    pub version: String,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub canonical: CanonicalYamlConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FlywheelConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: FlywheelConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.files.validate()?;
        self.canonical.validate()?;
        self.schedule.validate()?;
        self.logging.validate()?;

        Ok(())
    }

    /// Matcher settings derived from the canonical and schedule sections.
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            canonical: self.canonical.to_canonical(),
            pass_ratio: self.schedule.pass_ratio,
        }
    }
}

impl Default for FlywheelConfig {
    fn default() -> Self {
        Self {
            version: default_format_version(),
            files: FilesConfig::default(),
            canonical: CanonicalYamlConfig::default(),
            schedule: ScheduleConfig::default(),
            display: DisplayConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Where the phrase and progress files live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_phrases_file")]
    pub phrases: PathBuf,

    #[serde(default = "default_progress_file")]
    pub progress: PathBuf,

    /// Directory searched recursively when a relative file name is not found
    /// in the working directory.
    #[serde(default)]
    pub search_root: Option<PathBuf>,
}

impl FilesConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.phrases.as_os_str().is_empty() {
            return Err(ConfigLoadError::Validation(
                "files.phrases must not be empty".to_string(),
            ));
        }
        if self.progress.as_os_str().is_empty() {
            return Err(ConfigLoadError::Validation(
                "files.progress must not be empty".to_string(),
            ));
        }
        if self.phrases == self.progress {
            return Err(ConfigLoadError::Validation(
                "files.phrases and files.progress must differ".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            phrases: default_phrases_file(),
            progress: default_progress_file(),
            search_root: None,
        }
    }
}

/// Canonicalization YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "true_value")]
    pub normalize_unicode: bool,

    #[serde(default = "true_value")]
    pub lowercase: bool,

    #[serde(default = "true_value")]
    pub strip_punctuation: bool,
}

impl CanonicalYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.version == 0 {
            return Err(ConfigLoadError::Validation(
                "canonical.version must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_canonical(&self) -> CanonicalizeConfig {
        CanonicalizeConfig {
            version: self.version,
            normalize_unicode: self.normalize_unicode,
            strip_punctuation: self.strip_punctuation,
            lowercase: self.lowercase,
        }
    }
}

impl Default for CanonicalYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            normalize_unicode: true,
            lowercase: true,
            strip_punctuation: true,
        }
    }
}

/// Spaced repetition tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleConfig {
    /// Similarity ratio at or above which an answer counts as correct.
    #[serde(default = "default_pass_ratio")]
    pub pass_ratio: f64,

    /// Ease factor given to phrases seen for the first time.
    #[serde(default = "default_initial_ease")]
    pub initial_ease: f32,
}

impl ScheduleConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if !(self.pass_ratio > 0.0 && self.pass_ratio <= 1.0) {
            return Err(ConfigLoadError::Validation(
                "schedule.pass_ratio must be in (0.0, 1.0]".to_string(),
            ));
        }
        if self.initial_ease < crate::schedule::MIN_EASE_FACTOR {
            return Err(ConfigLoadError::Validation(format!(
                "schedule.initial_ease must be >= {}",
                crate::schedule::MIN_EASE_FACTOR
            )));
        }
        Ok(())
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            pass_ratio: default_pass_ratio(),
            initial_ease: default_initial_ease(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "true_value")]
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `warn` or `flywheel=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log to this file instead of stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Size at which the log file is rotated on startup.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Number of log files kept, including the active one.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.level.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "logging.level must not be empty".to_string(),
            ));
        }
        if self.max_files == 0 {
            return Err(ConfigLoadError::Validation(
                "logging.max_files must be >= 1".to_string(),
            ));
        }
        if self.max_file_bytes == 0 {
            return Err(ConfigLoadError::Validation(
                "logging.max_file_bytes must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            max_file_bytes: default_max_file_bytes(),
            max_files: default_max_files(),
        }
    }
}

// Helper functions for serde defaults
fn default_format_version() -> String {
    "1.0".to_string()
}
fn default_version() -> u32 {
    1
}
fn true_value() -> bool {
    true
}
fn default_phrases_file() -> PathBuf {
    PathBuf::from("phrases.txt")
}
fn default_progress_file() -> PathBuf {
    PathBuf::from("repetitions.json")
}
fn default_pass_ratio() -> f64 {
    0.75
}
fn default_initial_ease() -> f32 {
    2.5
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_max_file_bytes() -> u64 {
    1024 * 1024
}
fn default_max_files() -> usize {
    10
}
