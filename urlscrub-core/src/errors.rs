//! errors.rs - Custom error types for the urlscrub-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! Only rule construction and rule-file I/O can fail. Problems found while
//! cleaning a URL (unparseable candidates, malformed removal patterns) are
//! logged and never surface as errors.
//!
//! License: MIT OR APACHE 2.0

use std::path::PathBuf;
use thiserror::Error;

/// This enum represents all possible error types in the `urlscrub-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum UrlScrubError {
    #[error("Invalid cleaning rule '{rule}': {reason}")]
    Configuration { rule: String, reason: String },

    #[error("Failed to compile pattern for rule '{0}': {1}")]
    RuleCompilation(String, regex::Error),

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Failed to import rules from {}: {reason}", path.display())]
    Import { path: PathBuf, reason: String },

    #[error("Failed to serialize rules: {0}")]
    Serialization(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),
}

impl UrlScrubError {
    pub(crate) fn configuration(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        UrlScrubError::Configuration { rule: rule.into(), reason: reason.into() }
    }

    pub(crate) fn import(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        UrlScrubError::Import { path: path.into(), reason: reason.into() }
    }
}
