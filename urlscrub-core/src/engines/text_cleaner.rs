//! A `CleaningEngine` implementation that finds URLs in free-form text and
//! runs the registered rules over each of them.
//! License: MIT OR APACHE 2.0

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use crate::config::EngineOptions;
use crate::engine::CleaningEngine;
use crate::engines::letters::LetterSource;
use crate::engines::rule_engine::RuleEngine;
use crate::matched_url::{loggable_url, CleanResult, MatchedUrl};
use crate::rule_set::RuleSet;

/// Very cheap pattern for URLs inside a text.
static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)https?://\S+").unwrap());

#[derive(Debug, Clone)]
pub struct TextCleaner {
    rules: Arc<RuleSet>,
    engine: RuleEngine,
}

impl TextCleaner {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self::with_options(rules, EngineOptions::default())
    }

    pub fn with_options(rules: Arc<RuleSet>, options: EngineOptions) -> Self {
        Self { rules, engine: RuleEngine::new(options) }
    }

    /// Uses `letters` for `<randomchar>` placeholders instead of random ones.
    pub fn with_letters(rules: Arc<RuleSet>, options: EngineOptions, letters: Arc<dyn LetterSource>) -> Self {
        Self { rules, engine: RuleEngine::with_letters(options, letters) }
    }

    /// Swaps in a new rule set snapshot. Calls already holding the old
    /// snapshot are unaffected.
    pub fn replace_rules(&mut self, rules: Arc<RuleSet>) {
        self.rules = rules;
    }

    pub fn rules(&self) -> Arc<RuleSet> {
        Arc::clone(&self.rules)
    }

    pub fn rule_engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Finds every URL occurrence in `text`. Substrings that do not parse as
    /// URLs are dropped.
    pub fn discover_urls(text: &str) -> Vec<MatchedUrl> {
        discover(text).into_iter().map(|(_, url)| url).collect()
    }

    /// Runs the enabled rules over one URL in registration order.
    fn clean_url(&self, url: &mut MatchedUrl) {
        for rule in self.rules.iter().filter(|rule| rule.enabled()) {
            let applied = self.engine.apply_rule(url, rule);
            if url.is_exception() {
                debug!("Rule '{}' is an exception; no further rules run.", rule.name());
                break;
            }
            if applied && rule.effective_stop() {
                debug!("Rule '{}' applied and stops further rules.", rule.name());
                break;
            }
        }
    }
}

fn discover(text: &str) -> Vec<(Range<usize>, MatchedUrl)> {
    URL_REGEX
        .find_iter(text)
        .filter_map(|m| match MatchedUrl::parse(m.as_str()) {
            Ok(url) => Some((m.range(), url)),
            Err(e) => {
                debug!("Dropping unparseable URL '{}': {}", loggable_url(m.as_str()), e);
                None
            }
        })
        .collect()
}

impl CleaningEngine for TextCleaner {
    fn clean_text(&self, text: &str) -> CleanResult {
        let mut found = discover(text);

        // Identical originals are cleaned once and share that record.
        let mut cleaned: HashMap<String, MatchedUrl> = HashMap::new();
        for (_, url) in found.iter_mut() {
            match cleaned.get(url.original_url()) {
                Some(first) => *url = first.clone(),
                None => {
                    self.clean_url(url);
                    cleaned.insert(url.original_url().to_string(), url.clone());
                }
            }
        }

        let mut cleaned_text = String::with_capacity(text.len());
        let mut last_end = 0usize;
        for (span, url) in &found {
            cleaned_text.push_str(&text[last_end..span.start]);
            cleaned_text.push_str(&url.cleaned_url());
            last_end = span.end;
        }
        cleaned_text.push_str(&text[last_end..]);

        let urls: Vec<MatchedUrl> = found.into_iter().map(|(_, url)| url).collect();
        info!(
            "Cleaned {} URL(s); {} modified.",
            urls.len(),
            urls.iter().filter(|u| u.is_modified()).count()
        );
        CleanResult::new(text.to_string(), cleaned_text, urls)
    }

    fn rule_set(&self) -> &RuleSet {
        &self.rules
    }

    fn options(&self) -> &EngineOptions {
        self.engine.options()
    }
}
