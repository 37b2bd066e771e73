//! Configuration types for phrase canonicalization.
//!
//! This module defines [`CanonicalizeConfig`], which controls how a phrase is
//! normalized before it is compared against reference translations.
//!
//! # Versioning
//!
//! The `version` field records which normalization rules produced a token
//! stream. Any change to canonicalization behavior must come with a version
//! bump, so that stored scores from an older drill session can be told apart
//! from new ones.
//!
//! # Examples
//!
//! ## Default Configuration
//!
//! ```rust
//! use canonical::CanonicalizeConfig;
//!
//! let config = CanonicalizeConfig::default();
//! assert_eq!(config.version, 1);
//! assert!(config.normalize_unicode);
//! assert!(config.strip_punctuation);
//! assert!(config.lowercase);
//! ```
//!
//! ## Keeping Punctuation Significant
//!
//! ```rust
//! use canonical::CanonicalizeConfig;
//!
//! let config = CanonicalizeConfig {
//!     strip_punctuation: false,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Configuration for the phrase canonicalization pipeline.
///
/// `CanonicalizeConfig` is cheap to clone and serializable so it can be
/// embedded in the application's YAML configuration:
///
/// ```json
/// {
///   "version": 1,
///   "normalize_unicode": true,
///   "strip_punctuation": true,
///   "lowercase": true
/// }
/// ```
///
/// # Version Requirements
///
/// The `version` field must be >= 1. Version 0 is reserved and will be
/// rejected with [`CanonicalError::InvalidConfig`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalizeConfig {
    /// Version of the canonicalization rules.
    ///
    /// Must be >= 1 (version 0 is reserved and rejected).
    pub version: u32,

    /// If true, apply Unicode NFKC normalization before other transforms.
    ///
    /// With normalization enabled a composed `"é"` (U+00E9) and `"e"` followed
    /// by a combining acute accent (U+0301) compare equal, which matters for
    /// typed answers coming from different keyboard layouts.
    pub normalize_unicode: bool,

    /// If true, punctuation characters act as token delimiters and are
    /// removed from comparison tokens.
    ///
    /// ```text
    /// "Hello, world!" → ["hello", "world"]
    /// "It's late."    → ["it", "s", "late"]
    /// ```
    ///
    /// Display text is not affected: tokens keep their original surface form.
    pub strip_punctuation: bool,

    /// If true, apply locale-free Unicode lowercasing.
    ///
    /// Lowercasing can expand one character into several (`"İ"` becomes
    /// `"i̇"`), so it runs per grapheme cluster.
    pub lowercase: bool,
}

impl CanonicalizeConfig {
    /// Checks the invariants that [`canonicalize`](crate::canonicalize)
    /// relies on.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.version == 0 {
            return Err(CanonicalError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for CanonicalizeConfig {
    /// Creates the default `CanonicalizeConfig`.
    ///
    /// # Defaults
    ///
    /// - `version`: 1
    /// - `normalize_unicode`: true
    /// - `strip_punctuation`: true (a missing comma is not a translation error)
    /// - `lowercase`: true
    fn default() -> Self {
        Self {
            version: 1,
            normalize_unicode: true,
            strip_punctuation: true,
            lowercase: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = CanonicalizeConfig::default();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn version_zero_rejected() {
        let cfg = CanonicalizeConfig {
            version: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(CanonicalError::InvalidConfig(_))
        ));
    }

    #[test]
    fn config_deserializes_from_json() {
        let json = r#"{
            "version": 2,
            "normalize_unicode": false,
            "strip_punctuation": false,
            "lowercase": true
        }"#;
        let cfg: CanonicalizeConfig = serde_json::from_str(json).expect("valid config json");
        assert_eq!(cfg.version, 2);
        assert!(!cfg.normalize_unicode);
        assert!(!cfg.strip_punctuation);
    }
}
