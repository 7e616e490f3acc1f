//! The ordered registry of cleaning rules, with rule-file import and export.
//!
//! A `RuleSet` starts from the embedded default rules (or empty) and only
//! grows through explicit imports. Rules equal to one already registered are
//! never added twice.
//!
//! License: MIT OR Apache-2.0

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::community::{translate_providers, ProviderFile, DEFAULT_PROVIDER_DENYLIST};
use crate::config::CleaningRule;
use crate::engines::rule_engine::{FixtureOutcome, RuleEngine};
use crate::errors::UrlScrubError;

const DEFAULT_RULES_SOURCE: &str = "<embedded default rules>";

/// Serialization format of a rule file, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFileFormat {
    Json,
    Yaml,
}

impl RuleFileFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    fn decode<T: DeserializeOwned>(self, text: &str) -> Result<T, String> {
        match self {
            Self::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            Self::Yaml => serde_yml::from_str(text).map_err(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<CleaningRule>,
}

impl RuleSet {
    /// An empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the built-in rules from the embedded configuration.
    pub fn load_default_rules() -> Result<Self, UrlScrubError> {
        debug!("Loading default rules from embedded string...");
        let default_yaml = include_str!("../config/default_rules.yaml");
        let rules: Vec<CleaningRule> = RuleFileFormat::Yaml
            .decode(default_yaml)
            .map_err(|e| UrlScrubError::import(DEFAULT_RULES_SOURCE, e))?;

        let mut set = Self::new();
        set.extend(rules);
        debug!("Loaded {} default rules.", set.len());
        Ok(set)
    }

    /// Builds a set from `rules`, dropping duplicates.
    pub fn from_rules(rules: impl IntoIterator<Item = CleaningRule>) -> Self {
        let mut set = Self::new();
        set.extend(rules);
        set
    }

    /// Appends `rule` unless an equal rule is already registered.
    pub fn push(&mut self, rule: CleaningRule) -> bool {
        if self.rules.contains(&rule) {
            debug!("Rule '{}' is already registered; not adding it again.", rule.name());
            return false;
        }
        self.rules.push(rule);
        true
    }

    /// Appends every rule not already present. Returns how many were added.
    pub fn extend(&mut self, rules: impl IntoIterator<Item = CleaningRule>) -> usize {
        let mut added = 0;
        for rule in rules {
            if self.push(rule) {
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CleaningRule> {
        self.rules.iter()
    }

    pub fn rules(&self) -> &[CleaningRule] {
        &self.rules
    }

    /// The first rule registered under `name`.
    pub fn get(&self, name: &str) -> Option<&CleaningRule> {
        self.rules.iter().find(|rule| rule.name() == name)
    }

    /// Disables rules by name. A non-empty `enable_rules` list additionally
    /// disables every rule it does not name.
    pub fn set_active_rules(&mut self, enable_rules: &[String], disable_rules: &[String]) {
        let enable_set: HashSet<&str> = enable_rules.iter().map(String::as_str).collect();
        let disable_set: HashSet<&str> = disable_rules.iter().map(String::as_str).collect();
        let all_rule_names: HashSet<&str> = self.rules.iter().map(|r| r.name()).collect();

        for rule_name in enable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `enable_rules` list does not exist.", rule_name);
        }
        for rule_name in disable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `disable_rules` list does not exist.", rule_name);
        }

        self.rules = self
            .rules
            .iter()
            .map(|rule| {
                let active = !disable_set.contains(rule.name())
                    && (enable_set.is_empty() || enable_set.contains(rule.name()));
                if active {
                    rule.clone()
                } else {
                    rule.with_enabled(false)
                }
            })
            .collect();

        debug!(
            "Active rules after filtering: {}",
            self.rules.iter().filter(|r| r.enabled()).count()
        );
    }

    /// Runs every rule's `testUrls` through `engine`, one rule at a time.
    pub fn verify_test_urls(&self, engine: &RuleEngine) -> Vec<FixtureOutcome> {
        engine.verify_fixtures(self)
    }

    /// Imports a rule file with the default provider denylist.
    pub fn import_rules<P: AsRef<Path>>(&mut self, path: P) -> Result<Vec<CleaningRule>, UrlScrubError> {
        self.import_rules_with_denylist(path, DEFAULT_PROVIDER_DENYLIST)
    }

    /// Imports a rule file, skipping community providers named in `denylist`.
    ///
    /// Returns every rule parsed from the file; only those not already
    /// registered are appended.
    pub fn import_rules_with_denylist<P: AsRef<Path>>(
        &mut self,
        path: P,
        denylist: &[&str],
    ) -> Result<Vec<CleaningRule>, UrlScrubError> {
        let path = path.as_ref();
        let rules = parse_rules_file(path, denylist)?;
        let added = self.extend(rules.iter().cloned());
        info!(
            "Loaded {} rules from file {} ({} new).",
            rules.len(),
            path.display(),
            added
        );
        Ok(rules)
    }

    /// Writes the full set to `path` in the native JSON shape.
    pub fn export_rules<P: AsRef<Path>>(&self, path: P) -> Result<(), UrlScrubError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.rules)
            .map_err(|e| UrlScrubError::Serialization(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;
        info!("Exported {} rules to {}.", self.rules.len(), path.display());
        Ok(())
    }
}

/// Reads and decodes a rule file without touching any registry.
///
/// The native array shape is tried first, then the community provider map.
pub fn parse_rules_file(path: &Path, denylist: &[&str]) -> Result<Vec<CleaningRule>, UrlScrubError> {
    if !path.exists() {
        return Err(UrlScrubError::import(path, "file does not exist"));
    }
    info!("Loading rules from: {}", path.display());
    let text = fs::read_to_string(path)
        .map_err(|e| UrlScrubError::import(path, format!("failed to read file: {}", e)))?;

    let format = RuleFileFormat::from_path(path);
    let native_error = match format.decode::<Vec<CleaningRule>>(&text) {
        Ok(rules) => {
            debug!("Decoded {} native rules from {}.", rules.len(), path.display());
            return Ok(rules);
        }
        Err(e) => e,
    };

    match format.decode::<ProviderFile>(&text) {
        Ok(file) => {
            debug!("Decoded {} community providers from {}.", file.providers.len(), path.display());
            Ok(translate_providers(&file, denylist))
        }
        Err(community_error) => Err(UrlScrubError::import(
            path,
            format!(
                "not a native rule list ({}) and not a community provider file ({})",
                native_error, community_error
            ),
        )),
    }
}
