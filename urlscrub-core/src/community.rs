//! Translation of community provider catalogues (the ClearURLs `data.min.json`
//! shape) into cleaning rules.
//!
//! A catalogue is an object with a top-level `providers` map. Only the keys
//! listed on [`Provider`] are recognized; everything else is ignored.
//!
//! License: MIT OR Apache-2.0

use log::{debug, warn};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::config::{CleaningRule, RuleSpec};

/// Description attached to every rule translated from a provider catalogue.
pub const IMPORTED_RULE_DESCRIPTION: &str = "Rule imported from the ClearURLs provider catalogue";

/// Providers skipped by default because the built-in rules handle their
/// domains better than the upstream entries do.
pub const DEFAULT_PROVIDER_DENYLIST: &[&str] = &["amazon", "ebay"];

/// Top-level shape of a community rule file.
#[derive(Debug, Deserialize)]
pub struct ProviderFile {
    pub providers: BTreeMap<String, Provider>,
}

/// One provider entry.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Provider {
    pub url_pattern: Option<String>,
    /// Ignored: blocking whole domains is out of scope.
    pub complete_provider: bool,
    pub rules: Option<Vec<String>>,
    /// Ignored: raw rules operate on the URL text rather than on parameters.
    pub raw_rules: Vec<String>,
    pub referral_marketing: Vec<String>,
    pub exceptions: Vec<String>,
    pub redirections: Vec<String>,
    pub force_redirection: Option<bool>,
}

impl Provider {
    /// Maps the recognized provider keys onto a rule spec.
    pub fn to_spec(&self, name: &str) -> RuleSpec {
        RuleSpec {
            description: Some(IMPORTED_RULE_DESCRIPTION.to_string()),
            url_pattern: self.url_pattern.clone(),
            params_blacklist: self.rules.clone(),
            exception_patterns: self.exceptions.clone(),
            redirect_regex_list: self.redirections.clone(),
            affiliate_params_blacklist: self.referral_marketing.clone(),
            force_redirection: self.force_redirection,
            stop_after_rule: false,
            ..RuleSpec::named(name)
        }
    }
}

/// Translates every provider not named in `denylist`.
///
/// Providers that cannot be turned into a valid rule (for instance because a
/// pattern uses syntax the regex engine does not support) are skipped.
pub fn translate_providers(file: &ProviderFile, denylist: &[&str]) -> Vec<CleaningRule> {
    let mut rules = Vec::with_capacity(file.providers.len());
    for (name, provider) in &file.providers {
        if denylist.contains(&name.as_str()) {
            debug!("Skipping denylisted provider '{}'.", name);
            continue;
        }
        if provider.complete_provider {
            debug!("Provider '{}' is a complete provider; only its parameter rules are used.", name);
        }
        match CleaningRule::new(provider.to_spec(name)) {
            Ok(rule) => rules.push(rule),
            Err(e) => warn!("Skipping provider '{}': {}", name, e),
        }
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOGUE: &str = r#"{
        "providers": {
            "amazon": { "urlPattern": "amazon", "rules": ["tag"] },
            "google": {
                "urlPattern": "^https?:\\/\\/(?:[a-z0-9-]+\\.)*?google(?:\\.[a-z]{2,}){1,}",
                "completeProvider": false,
                "rules": ["ved", "ei"],
                "referralMarketing": ["ref_src"],
                "rawRules": ["\\/ved=[^/]+"],
                "exceptions": ["^https?:\\/\\/mail\\.google\\.com"],
                "redirections": ["^https?:\\/\\/(?:[a-z0-9-]+\\.)*?google(?:\\.[a-z]{2,}){1,}\\/url\\?.*?(?:url|q)=(https?[^&]+)"],
                "forceRedirection": true,
                "somethingNew": 1
            },
            "broken": { "urlPattern": "(?<=lookbehind)", "rules": ["x"] },
            "empty": {}
        }
    }"#;

    #[test]
    fn test_translate_maps_recognized_fields() {
        let file: ProviderFile = serde_json::from_str(CATALOGUE).unwrap();
        let rules = translate_providers(&file, &[]);
        let google = rules.iter().find(|r| r.name() == "google").unwrap();
        assert_eq!(google.params_blacklist(), Some(&["ved".to_string(), "ei".to_string()][..]));
        assert_eq!(google.affiliate_params_blacklist(), ["ref_src".to_string()]);
        assert_eq!(google.exception_patterns().len(), 1);
        assert_eq!(google.redirect_patterns().len(), 1);
        assert_eq!(google.spec().force_redirection, Some(true));
        assert_eq!(google.description(), Some(IMPORTED_RULE_DESCRIPTION));
        assert!(!google.effective_stop());
    }

    #[test]
    fn test_invalid_and_empty_providers_are_skipped() {
        let file: ProviderFile = serde_json::from_str(CATALOGUE).unwrap();
        let names: Vec<String> = translate_providers(&file, &[]).iter().map(|r| r.name().to_string()).collect();
        assert_eq!(names, vec!["amazon".to_string(), "google".to_string()]);
    }

    #[test]
    fn test_denylist_skips_providers() {
        let file: ProviderFile = serde_json::from_str(CATALOGUE).unwrap();
        let rules = translate_providers(&file, DEFAULT_PROVIDER_DENYLIST);
        assert!(rules.iter().all(|r| r.name() != "amazon"));
        assert!(rules.iter().any(|r| r.name() == "google"));
    }
}
