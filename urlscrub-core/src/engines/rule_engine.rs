//! Applies a single `CleaningRule` to a single `MatchedUrl`.
//!
//! This is the heart of urlscrub. A rule passes through a fixed sequence of
//! gates (URL pattern, exceptions, domain whitelist) before any of its
//! strategies run. The strategies then produce at most one candidate URL
//! (rewrite, redirect pattern, redirect parameter, in that precedence) and
//! strip query parameters.
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use url::Url;

use crate::compiler::get_or_compile_param_pattern;
use crate::config::{CleaningRule, EngineOptions};
use crate::engines::letters::{LetterSource, RandomLetters};
use crate::matched_url::{log_rule_applied_debug, loggable_url, MatchedUrl, QueryParams, RedirectSource};
use crate::rule_set::RuleSet;

const RANDOM_CHAR_PLACEHOLDER: &str = "<randomchar>";

static REGEX_MATCH_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<regexmatch:(\d+)>").unwrap());

/// The result of running one rule fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureOutcome {
    pub rule_name: String,
    pub test_url: String,
    /// `None` when the fixture itself is not a parseable URL.
    pub applied: Option<bool>,
    pub cleaned_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RuleEngine {
    options: EngineOptions,
    letters: Arc<dyn LetterSource>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl RuleEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self::with_letters(options, Arc::new(RandomLetters))
    }

    pub fn with_letters(options: EngineOptions, letters: Arc<dyn LetterSource>) -> Self {
        Self { options, letters }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Applies `rule` to `url` and reports whether the rule applied.
    ///
    /// An exception match also returns `true` and flags the URL; callers must
    /// stop evaluating further rules for it.
    pub fn apply_rule(&self, url: &mut MatchedUrl, rule: &CleaningRule) -> bool {
        if let Some(pattern) = rule.url_pattern() {
            if !pattern.is_match(url.original_url()) {
                return false;
            }
        }

        if rule.exception_patterns().iter().any(|p| p.is_match(url.original_url())) {
            debug!(
                "Rule '{}' marks '{}' as an exception.",
                rule.name(),
                loggable_url(url.original_url())
            );
            url.mark_exception(rule.name());
            return true;
        }

        if !rule.domain_whitelist().is_empty() && !domain_allowed(url, rule) {
            return false;
        }

        let mut side_effect = false;

        if let Some((source, candidate)) = self.find_candidate(url, rule) {
            adopt_candidate(url, rule, source, &candidate);
            side_effect = true;
        }

        if self.remove_params(url, rule) {
            url.sync_query();
            side_effect = true;
        }

        if side_effect {
            url.push_applied_rule(rule.name());
            log_rule_applied_debug(module_path!(), rule.name(), url.original_url(), url.current_url().as_str());
        }
        side_effect
    }

    /// Runs every rule's `testUrls` through that rule alone.
    pub fn verify_fixtures(&self, rules: &RuleSet) -> Vec<FixtureOutcome> {
        let mut outcomes = Vec::new();
        for rule in rules.iter() {
            for test_url in rule.test_urls() {
                let outcome = match MatchedUrl::parse(test_url) {
                    Ok(mut url) => {
                        let applied = self.apply_rule(&mut url, rule);
                        FixtureOutcome {
                            rule_name: rule.name().to_string(),
                            test_url: test_url.clone(),
                            applied: Some(applied),
                            cleaned_url: Some(url.cleaned_url()),
                        }
                    }
                    Err(e) => {
                        warn!("Rule '{}' has an unparseable test URL '{}': {}", rule.name(), test_url, e);
                        FixtureOutcome {
                            rule_name: rule.name().to_string(),
                            test_url: test_url.clone(),
                            applied: None,
                            cleaned_url: None,
                        }
                    }
                };
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Produces the candidate URL, if any. A redirect pattern overrides a
    /// rewrite; redirect parameters are only consulted when neither fired.
    fn find_candidate(&self, url: &MatchedUrl, rule: &CleaningRule) -> Option<(RedirectSource, String)> {
        let mut candidate = self.rewrite(url, rule);

        for pattern in rule.redirect_patterns() {
            let capture = pattern
                .captures(url.original_url())
                .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()));
            if let Some(target) = capture {
                candidate = Some((RedirectSource::RedirectPattern(pattern.as_str().to_string()), target));
                break;
            }
        }

        if candidate.is_none() {
            candidate = rule.redirect_params().iter().find_map(|name| {
                url.raw_query_value(name)
                    .filter(|value| !value.is_empty())
                    .map(|value| (RedirectSource::RedirectParameter(name.clone()), value))
            });
        }

        candidate
    }

    /// Fills the rewrite template from the source pattern's captures.
    ///
    /// With several matches, later fills overwrite earlier ones group by group.
    fn rewrite(&self, url: &MatchedUrl, rule: &CleaningRule) -> Option<(RedirectSource, String)> {
        let (source, scheme) = rule.rewrite()?;

        let mut fills: BTreeMap<usize, &str> = BTreeMap::new();
        let mut matched = false;
        for caps in source.captures_iter(url.original_url()) {
            matched = true;
            for (index, group) in caps.iter().enumerate() {
                if let Some(group) = group {
                    fills.insert(index, group.as_str());
                }
            }
        }
        if !matched {
            return None;
        }

        let filled = REGEX_MATCH_PLACEHOLDER.replace_all(scheme, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| fills.get(&index))
                .map(|text| text.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        });

        let candidate = if filled.contains(RANDOM_CHAR_PLACEHOLDER) {
            let letter = self.letters.next_letter().to_string();
            filled.replace(RANDOM_CHAR_PLACEHOLDER, &letter)
        } else {
            filled.into_owned()
        };

        Some((RedirectSource::RewritePattern(source.as_str().to_string()), candidate))
    }

    /// Removes affiliate and tracking parameters. Returns whether the query changed.
    fn remove_params(&self, url: &mut MatchedUrl, rule: &CleaningRule) -> bool {
        let mut mutated = false;

        if self.options.remove_affiliate && !rule.affiliate_params_blacklist().is_empty() {
            for key in remove_listed(url.query_mut(), rule.affiliate_params_blacklist()) {
                url.push_removed_affiliate(key);
                mutated = true;
            }
        }

        if !self.options.remove_tracking {
            return mutated;
        }

        let removed = if rule.remove_all_parameters() {
            let keys: Vec<String> = url.query().keys().map(str::to_string).collect();
            remove_exact(url.query_mut(), keys)
        } else if let Some(whitelist) = rule.params_whitelist() {
            let keys: Vec<String> = url
                .query()
                .keys()
                .filter(|key| !whitelist.iter().any(|allowed| allowed == key))
                .map(str::to_string)
                .collect();
            remove_exact(url.query_mut(), keys)
        } else if let Some(blacklist) = rule.params_blacklist() {
            remove_listed(url.query_mut(), blacklist)
        } else {
            Vec::new()
        };

        for key in removed {
            url.push_removed_tracking(key);
            mutated = true;
        }
        mutated
    }
}

fn domain_allowed(url: &MatchedUrl, rule: &CleaningRule) -> bool {
    let Some(host) = url.hostname() else { return false };
    let host = if rule.domain_whitelist_ignore_www() {
        host.strip_prefix("www.").unwrap_or(host)
    } else {
        host
    };
    rule.domain_whitelist().iter().any(|domain| domain == host)
}

fn adopt_candidate(url: &mut MatchedUrl, rule: &CleaningRule, source: RedirectSource, candidate: &str) {
    let decoded = percent_decode_str(candidate).decode_utf8_lossy().into_owned();

    if decoded == url.original_url() {
        warn!(
            "Possibly misconfigured rule '{}': returns unmodified URL for input {}",
            rule.name(),
            loggable_url(url.original_url())
        );
    } else {
        match Url::parse(&decoded) {
            Ok(new_url) => url.adopt(new_url),
            Err(e) => warn!(
                "Rule '{}' would result in an invalid URL ({}): {}",
                rule.name(),
                e,
                loggable_url(&decoded)
            ),
        }
    }

    url.record_redirect(source, decoded);
}

fn remove_exact(query: &mut QueryParams, keys: Vec<String>) -> Vec<String> {
    keys.into_iter().filter(|key| query.remove(key).is_some()).collect()
}

/// Removes blacklist entries. An entry that names no key verbatim is tried
/// as a whole-name pattern and removes the first key it matches.
fn remove_listed(query: &mut QueryParams, entries: &[String]) -> Vec<String> {
    let mut removed = Vec::new();
    for entry in entries {
        if query.remove(entry).is_some() {
            removed.push(entry.clone());
            continue;
        }
        let Some(pattern) = get_or_compile_param_pattern(entry) else { continue };
        let hit = query.keys().find(|key| pattern.is_match(key)).map(str::to_string);
        if let Some(key) = hit {
            query.remove(&key);
            removed.push(key);
        }
    }
    removed
}
