//! Configuration management for `urlscrub-core`.
//!
//! This module defines the declarative cleaning rule and the engine switches.
//! A rule is described by a plain, serializable [`RuleSpec`]; turning it into a
//! [`CleaningRule`] validates the cross-field invariants and compiles every
//! pattern once, so a constructed rule is always usable and never changes.
//!
//! License: MIT OR Apache-2.0

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::compiler::{compile_pattern, compile_patterns};
use crate::errors::UrlScrubError;

/// The serializable description of one cleaning rule, as found in rule files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleSpec {
    /// Unique identifier for the rule (e.g., "Google Click Identifier").
    pub name: String,
    /// Human-readable description of what the rule targets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub enabled: bool,
    /// Whole-rule precondition, matched against the original URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_pattern: Option<String>,
    /// Any match vetoes all further cleaning of the URL.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exception_patterns: Vec<String>,
    /// Hostnames this rule may act on. Empty means every host.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domain_whitelist: Vec<String>,
    /// Ignore a leading "www." when checking the domain whitelist.
    pub domain_whitelist_ignore_www: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params_blacklist: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params_whitelist: Option<Vec<String>>,
    pub remove_all_parameters: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub affiliate_params_blacklist: Vec<String>,
    /// Source pattern for rewriting, e.g. `https://mydealz.de/share-deal-from-app/(\d+)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite_source_pattern: Option<String>,
    /// Template for rewriting, e.g. `https://mydealz.de/deals/x-<regexmatch:1>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite_scheme: Option<String>,
    /// Patterns whose first capture group is the real destination. First match wins.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub redirect_regex_list: Vec<String>,
    /// Query parameters whose value is the real destination. First present wins.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub redirect_param_list: Vec<String>,
    pub stop_after_rule: bool,
    /// Explicit override of `stop_after_rule`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_stop_after_rule: Option<bool>,
    /// Carried over from community rule files; stored but not acted on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_redirection: Option<bool>,
    /// Fixture URLs for this rule. Never executed during cleaning.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub test_urls: Vec<String>,
}

impl Default for RuleSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            enabled: true,
            url_pattern: None,
            exception_patterns: Vec::new(),
            domain_whitelist: Vec::new(),
            domain_whitelist_ignore_www: true,
            params_blacklist: None,
            params_whitelist: None,
            remove_all_parameters: false,
            affiliate_params_blacklist: Vec::new(),
            rewrite_source_pattern: None,
            rewrite_scheme: None,
            redirect_regex_list: Vec::new(),
            redirect_param_list: Vec::new(),
            stop_after_rule: true,
            force_stop_after_rule: None,
            force_redirection: None,
            test_urls: Vec::new(),
        }
    }
}

impl RuleSpec {
    /// Starts a spec with the given name and every other field at its default.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }
}

#[derive(Debug, Clone, Default)]
struct CompiledPatterns {
    url_pattern: Option<Regex>,
    exceptions: Vec<Regex>,
    rewrite_source: Option<Regex>,
    redirects: Vec<Regex>,
}

/// A validated, immutable cleaning rule with its patterns compiled.
///
/// Equality compares the declared fields only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RuleSpec", into = "RuleSpec")]
pub struct CleaningRule {
    spec: RuleSpec,
    patterns: CompiledPatterns,
}

impl PartialEq for CleaningRule {
    fn eq(&self, other: &Self) -> bool {
        self.spec == other.spec
    }
}

impl Eq for CleaningRule {}

impl fmt::Display for CleaningRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.spec.name)
    }
}

impl TryFrom<RuleSpec> for CleaningRule {
    type Error = UrlScrubError;

    fn try_from(spec: RuleSpec) -> Result<Self, Self::Error> {
        CleaningRule::new(spec)
    }
}

impl From<CleaningRule> for RuleSpec {
    fn from(rule: CleaningRule) -> Self {
        rule.spec
    }
}

impl CleaningRule {
    /// Validates `spec` and compiles its patterns.
    ///
    /// Every problem found is reported in a single `Configuration` error.
    pub fn new(spec: RuleSpec) -> Result<Self, UrlScrubError> {
        let mut errors = Vec::new();

        if spec.name.trim().is_empty() {
            errors.push("the `name` field is empty".to_string());
        }

        let has_strategy = spec.params_blacklist.is_some()
            || spec.params_whitelist.is_some()
            || spec.remove_all_parameters
            || (spec.rewrite_source_pattern.is_some() && spec.rewrite_scheme.is_some())
            || spec.url_pattern.is_some()
            || !spec.redirect_regex_list.is_empty();
        if !has_strategy {
            errors.push(
                "minimum parameters are not given: set one of paramsBlacklist, paramsWhitelist, \
                 removeAllParameters, rewriteSourcePattern+rewriteScheme, urlPattern or redirectRegexList"
                    .to_string(),
            );
        }

        match (&spec.rewrite_source_pattern, &spec.rewrite_scheme) {
            (Some(_), None) => errors.push("rewriteSourcePattern is set but rewriteScheme is missing".to_string()),
            (None, Some(_)) => errors.push("rewriteScheme is set but rewriteSourcePattern is missing".to_string()),
            _ => {}
        }

        let patterns = match compile_all(&spec) {
            Ok(patterns) => patterns,
            Err(e) => {
                errors.push(e.to_string());
                CompiledPatterns::default()
            }
        };

        if !errors.is_empty() {
            return Err(UrlScrubError::configuration(spec.name.clone(), errors.join("; ")));
        }

        debug!("Constructed cleaning rule '{}'.", spec.name);
        Ok(Self { spec, patterns })
    }

    pub fn spec(&self) -> &RuleSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn description(&self) -> Option<&str> {
        self.spec.description.as_deref()
    }

    pub fn enabled(&self) -> bool {
        self.spec.enabled
    }

    pub fn url_pattern(&self) -> Option<&Regex> {
        self.patterns.url_pattern.as_ref()
    }

    pub fn exception_patterns(&self) -> &[Regex] {
        &self.patterns.exceptions
    }

    pub fn domain_whitelist(&self) -> &[String] {
        &self.spec.domain_whitelist
    }

    pub fn domain_whitelist_ignore_www(&self) -> bool {
        self.spec.domain_whitelist_ignore_www
    }

    pub fn params_blacklist(&self) -> Option<&[String]> {
        self.spec.params_blacklist.as_deref()
    }

    pub fn params_whitelist(&self) -> Option<&[String]> {
        self.spec.params_whitelist.as_deref()
    }

    pub fn remove_all_parameters(&self) -> bool {
        self.spec.remove_all_parameters
    }

    pub fn affiliate_params_blacklist(&self) -> &[String] {
        &self.spec.affiliate_params_blacklist
    }

    /// The compiled rewrite source and its template, present together or not at all.
    pub fn rewrite(&self) -> Option<(&Regex, &str)> {
        match (&self.patterns.rewrite_source, &self.spec.rewrite_scheme) {
            (Some(source), Some(scheme)) => Some((source, scheme.as_str())),
            _ => None,
        }
    }

    pub fn redirect_patterns(&self) -> &[Regex] {
        &self.patterns.redirects
    }

    pub fn redirect_params(&self) -> &[String] {
        &self.spec.redirect_param_list
    }

    /// Whether a successful application ends rule evaluation for the URL.
    pub fn effective_stop(&self) -> bool {
        self.spec.force_stop_after_rule.unwrap_or(self.spec.stop_after_rule)
    }

    pub fn test_urls(&self) -> &[String] {
        &self.spec.test_urls
    }

    /// Returns a copy of this rule with the `enabled` flag replaced.
    pub fn with_enabled(&self, enabled: bool) -> Self {
        let mut copy = self.clone();
        copy.spec.enabled = enabled;
        copy
    }
}

fn compile_all(spec: &RuleSpec) -> Result<CompiledPatterns, UrlScrubError> {
    let name = spec.name.as_str();
    Ok(CompiledPatterns {
        url_pattern: spec.url_pattern.as_deref().map(|p| compile_pattern(name, p)).transpose()?,
        exceptions: compile_patterns(name, &spec.exception_patterns)?,
        rewrite_source: spec
            .rewrite_source_pattern
            .as_deref()
            .map(|p| compile_pattern(name, p))
            .transpose()?,
        redirects: compile_patterns(name, &spec.redirect_regex_list)?,
    })
}

/// Global switches for the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineOptions {
    /// Remove tracking parameters named by blacklists, whitelists and remove-all rules.
    pub remove_tracking: bool,
    /// Remove affiliate parameters named by `affiliateParamsBlacklist`.
    pub remove_affiliate: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { remove_tracking: true, remove_affiliate: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_without_strategy_is_rejected() {
        let err = CleaningRule::new(RuleSpec::named("nothing")).unwrap_err();
        assert!(matches!(err, UrlScrubError::Configuration { ref rule, .. } if rule == "nothing"));
        assert!(err.to_string().contains("minimum parameters"));
    }

    #[test]
    fn test_rewrite_pattern_requires_scheme() {
        let spec = RuleSpec {
            rewrite_source_pattern: Some("https://a/(\\d+)".to_string()),
            ..RuleSpec::named("half rewrite")
        };
        let err = CleaningRule::new(spec).unwrap_err();
        assert!(err.to_string().contains("rewriteScheme is missing"));
    }

    #[test]
    fn test_rewrite_scheme_requires_pattern() {
        let spec = RuleSpec {
            rewrite_scheme: Some("https://<regexmatch:1>".to_string()),
            params_blacklist: Some(vec!["a".to_string()]),
            ..RuleSpec::named("half rewrite")
        };
        let err = CleaningRule::new(spec).unwrap_err();
        assert!(err.to_string().contains("rewriteSourcePattern is missing"));
    }

    #[test]
    fn test_invalid_pattern_is_a_configuration_error() {
        let spec = RuleSpec { url_pattern: Some("(".to_string()), ..RuleSpec::named("broken") };
        let err = CleaningRule::new(spec).unwrap_err();
        assert!(matches!(err, UrlScrubError::Configuration { .. }));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let spec = RuleSpec { params_blacklist: Some(vec![]), ..RuleSpec::named("  ") };
        assert!(CleaningRule::new(spec).is_err());
    }

    #[test]
    fn test_defaults_and_effective_stop() {
        let rule = CleaningRule::new(RuleSpec {
            params_blacklist: Some(vec!["gclid".to_string()]),
            ..RuleSpec::named("gclid")
        })
        .unwrap();
        assert!(rule.enabled());
        assert!(rule.domain_whitelist().is_empty());
        assert!(rule.domain_whitelist_ignore_www());
        assert!(rule.effective_stop());

        let forced = CleaningRule::new(RuleSpec {
            params_blacklist: Some(vec!["gclid".to_string()]),
            force_stop_after_rule: Some(false),
            ..RuleSpec::named("gclid")
        })
        .unwrap();
        assert!(!forced.effective_stop());
    }

    #[test]
    fn test_deserialize_runs_validation() {
        let ok: CleaningRule =
            serde_json::from_str(r#"{"name":"fb","paramsBlacklist":["fbclid"]}"#).unwrap();
        assert_eq!(ok.params_blacklist(), Some(&["fbclid".to_string()][..]));

        let bad = serde_json::from_str::<CleaningRule>(r#"{"name":"fb"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let rule = CleaningRule::new(RuleSpec {
            params_blacklist: Some(vec!["fbclid".to_string()]),
            ..RuleSpec::named("fb")
        })
        .unwrap();
        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("\"paramsBlacklist\":[\"fbclid\"]"));
        assert!(!json.contains("domainWhitelist\""));
        assert!(!json.contains("rewriteScheme"));
    }

    #[test]
    fn test_equality_ignores_compiled_state() {
        let make = || {
            CleaningRule::new(RuleSpec {
                url_pattern: Some("example".to_string()),
                ..RuleSpec::named("same")
            })
            .unwrap()
        };
        assert_eq!(make(), make());
        assert_ne!(make(), make().with_enabled(false));
    }
}
