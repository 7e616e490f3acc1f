// urlscrub-core/src/engine.rs
//! Defines the core CleaningEngine trait.
//!
//! The `CleaningEngine` trait decouples front-ends (the CLI, a chat bot, an
//! HTTP endpoint) from the concrete text cleaner, so they can hold any engine
//! behind a `Box<dyn CleaningEngine>`.
//!
//! License: MIT OR APACHE 2.0

use crate::config::EngineOptions;
use crate::matched_url::CleanResult;
use crate::rule_set::RuleSet;

/// A trait that defines the core functionality of a URL cleaning engine.
pub trait CleaningEngine: Send + Sync {
    /// Finds every URL in `text`, cleans it and reassembles the text.
    ///
    /// Cleaning never fails: malformed URLs are left untouched and rule
    /// misconfigurations are logged.
    fn clean_text(&self, text: &str) -> CleanResult;

    /// Returns the rule set the engine evaluates.
    fn rule_set(&self) -> &RuleSet;

    /// Returns the engine's options.
    fn options(&self) -> &EngineOptions;
}
