// urlscrub-core/src/lib.rs
//! # urlscrub Core Library
//!
//! `urlscrub-core` finds URLs inside free-form text and strips tracking and
//! affiliate query parameters from them. Cleaning is driven by declarative
//! rules: parameter blacklists and whitelists, remove-all rules scoped to
//! domains, regex rewrites, redirect unwrapping and exceptions.
//!
//! The library does no I/O beyond reading and writing rule files on request.
//!
//! ## Modules
//!
//! * `config`: `RuleSpec`, the validated `CleaningRule`, and `EngineOptions`.
//! * `compiler`: Regex compilation with length limits and a cache for parameter patterns.
//! * `rule_set`: The ordered `RuleSet` registry, plus rule-file import and export.
//! * `community`: Translation of ClearURLs provider catalogues into rules.
//! * `matched_url`: Per-URL audit records (`MatchedUrl`) and the `CleanResult`.
//! * `engine`: The `CleaningEngine` trait.
//! * `engines`: The per-URL `RuleEngine` and the text-level `TextCleaner`.
//! * `headless`: One-shot helpers.
//! * `errors`: The `UrlScrubError` enum.
//!
//! ## Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use urlscrub_core::{CleaningEngine, EngineOptions, RuleSet, TextCleaner};
//!
//! fn main() -> anyhow::Result<()> {
//!     let rules = Arc::new(RuleSet::load_default_rules()?);
//!     let cleaner = TextCleaner::with_options(rules, EngineOptions::default());
//!
//!     let result = cleaner.clean_text("see https://example.com/a?utm_source=mail&id=3");
//!     assert_eq!(result.cleaned_text(), "see https://example.com/a?id=3");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Loading and importing rules return [`UrlScrubError`]. Cleaning itself never
//! fails: malformed URLs are left as they are and problems are logged through
//! the `log` facade.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod community;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod headless;
pub mod matched_url;
pub mod rule_set;

/// Rule definitions and engine options.
pub use config::{CleaningRule, EngineOptions, RuleSpec};

pub use compiler::MAX_PATTERN_LENGTH;

pub use errors::UrlScrubError;

pub use engine::CleaningEngine;

pub use engines::letters::{FixedLetters, LetterSource, RandomLetters};
pub use engines::rule_engine::{FixtureOutcome, RuleEngine};
pub use engines::text_cleaner::TextCleaner;

/// Per-URL records and the aggregated result of a clean call.
pub use matched_url::{CleanResult, MatchedUrl, RedirectSource, RuleSummaryItem};

pub use rule_set::{parse_rules_file, RuleFileFormat, RuleSet};

pub use community::{ProviderFile, DEFAULT_PROVIDER_DENYLIST, IMPORTED_RULE_DESCRIPTION};

pub use headless::{headless_clean_text, headless_clean_text_with};
