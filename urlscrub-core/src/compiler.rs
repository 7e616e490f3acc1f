//! compiler.rs - Compiles rule patterns and caches parameter-name patterns.
//!
//! Rule patterns (URL patterns, exceptions, rewrite sources, redirects) are
//! compiled exactly once when a `CleaningRule` is constructed. Removal-list
//! entries are different: they are plain parameter names that are only
//! reinterpreted as regular expressions when they match nothing verbatim, so
//! they are compiled lazily and kept in a thread-safe, global cache.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::errors::UrlScrubError;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 2000;

/// Compiled size limit for a single rule pattern.
const PATTERN_SIZE_LIMIT: usize = 10 * (1 << 20);

lazy_static! {
    /// Cache of anchored parameter-name patterns. `None` marks an entry that
    /// failed to compile so the warning is only emitted once.
    static ref PARAM_PATTERN_CACHE: RwLock<HashMap<String, Option<Arc<Regex>>>> =
        RwLock::new(HashMap::new());
}

/// Compiles a single rule pattern, enforcing the length and size limits.
pub fn compile_pattern(rule_name: &str, pattern: &str) -> Result<Regex, UrlScrubError> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(UrlScrubError::PatternLengthExceeded(
            rule_name.to_string(),
            pattern.len(),
            MAX_PATTERN_LENGTH,
        ));
    }

    let regex = RegexBuilder::new(pattern)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|e| UrlScrubError::RuleCompilation(rule_name.to_string(), e))?;

    log::debug!(
        target: "urlscrub_core::compiler",
        "Rule '{}' pattern compiled successfully.",
        rule_name
    );
    Ok(regex)
}

/// Compiles every pattern in `patterns`, stopping at the first failure.
pub fn compile_patterns(rule_name: &str, patterns: &[String]) -> Result<Vec<Regex>, UrlScrubError> {
    patterns.iter().map(|p| compile_pattern(rule_name, p)).collect()
}

/// Returns the anchored regex for a removal-list entry, compiling it on first use.
///
/// The entry must match a whole parameter name. Malformed entries yield `None`.
pub fn get_or_compile_param_pattern(entry: &str) -> Option<Arc<Regex>> {
    {
        let cache = PARAM_PATTERN_CACHE.read().unwrap_or_else(|e| e.into_inner());
        if let Some(cached) = cache.get(entry) {
            return cached.clone();
        }
    }

    let compiled = match RegexBuilder::new(&format!("^(?:{})$", entry))
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
    {
        Ok(regex) => {
            debug!("Compiled parameter pattern '{}'.", entry);
            Some(Arc::new(regex))
        }
        Err(e) => {
            warn!("Skipping removal entry '{}': not a valid pattern ({}).", entry, e);
            None
        }
    };

    PARAM_PATTERN_CACHE
        .write()
        .unwrap_or_else(|e| e.into_inner())
        .insert(entry.to_string(), compiled.clone());
    compiled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_pattern_rejects_oversized_pattern() {
        let pattern = "a".repeat(MAX_PATTERN_LENGTH + 1);
        let err = compile_pattern("huge", &pattern).unwrap_err();
        assert!(matches!(err, UrlScrubError::PatternLengthExceeded(_, len, MAX_PATTERN_LENGTH) if len == MAX_PATTERN_LENGTH + 1));
    }

    #[test]
    fn test_compile_pattern_reports_rule_name() {
        let err = compile_pattern("broken", "(unclosed").unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_param_pattern_is_anchored() {
        let regex = get_or_compile_param_pattern("utm_[a-z]+").unwrap();
        assert!(regex.is_match("utm_source"));
        assert!(!regex.is_match("x_utm_source"));
        assert!(!regex.is_match("utm_source2"));
    }

    #[test]
    fn test_malformed_param_pattern_is_cached_as_none() {
        assert!(get_or_compile_param_pattern("bad[").is_none());
        assert!(get_or_compile_param_pattern("bad[").is_none());
    }
}
