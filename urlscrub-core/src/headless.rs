// urlscrub-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for cleaning text in one call, without holding an
//! engine across calls.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::EngineOptions;
use crate::engine::CleaningEngine;
use crate::engines::text_cleaner::TextCleaner;
use crate::matched_url::CleanResult;
use crate::rule_set::RuleSet;

/// Cleans `text` with the built-in rules and default options.
pub fn headless_clean_text(text: &str) -> Result<CleanResult> {
    let rules = RuleSet::load_default_rules().context("Failed to load the built-in cleaning rules")?;
    Ok(headless_clean_text_with(rules, EngineOptions::default(), text))
}

/// Cleans `text` with an explicit rule set and options.
///
/// # Arguments
///
/// * `rules` - The rule set to evaluate, in registration order.
/// * `options` - Which parameter classes to remove.
/// * `text` - The text whose URLs are cleaned.
pub fn headless_clean_text_with(rules: RuleSet, options: EngineOptions, text: &str) -> CleanResult {
    let engine: Box<dyn CleaningEngine> = Box::new(TextCleaner::with_options(Arc::new(rules), options));
    engine.clean_text(text)
}
