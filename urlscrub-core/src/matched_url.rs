//! Provides the per-URL state tracked through the cleaning pipeline and the
//! immutable result of a clean call, together with logging helpers that keep
//! query strings (which often carry personal tokens) out of debug logs.

use lazy_static::lazy_static;
use log::debug;
use serde::Serialize;
use url::{form_urlencoded, Url};

lazy_static! {
    /// Whether full URLs may appear in debug logs.
    static ref URL_DEBUG_ALLOWED: bool = {
        std::env::var("URLSCRUB_ALLOW_DEBUG_URLS")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// Hides the query part of a URL: `https://a.b/c?[REDACTED: 12 chars]`.
pub fn redact_query(url: &str) -> String {
    match url.split_once('?') {
        Some((base, query)) => format!("{}?[REDACTED: {} chars]", base, query.len()),
        None => url.to_string(),
    }
}

/// Returns `url` as it may be written to a debug log.
pub fn loggable_url(url: &str) -> String {
    if *URL_DEBUG_ALLOWED {
        url.to_string()
    } else {
        redact_query(url)
    }
}

pub fn log_rule_applied_debug(module_path: &str, rule_name: &str, original_url: &str, cleaned_url: &str) {
    debug!(
        "{} Rule '{}' applied: Original='{}', Cleaned='{}'",
        module_path,
        rule_name,
        loggable_url(original_url),
        loggable_url(cleaned_url)
    );
}

/// Ordered multi-map of decoded query parameters.
///
/// Keys keep the order of their first occurrence; repeated keys collect their
/// values in order, so re-encoding groups them together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryParams {
    /// Parses a raw query string. Blank values are kept.
    pub fn parse(query: Option<&str>) -> Self {
        let mut params = QueryParams::default();
        if let Some(query) = query {
            for (key, value) in form_urlencoded::parse(query.as_bytes()) {
                params.push(key.into_owned(), value.into_owned());
            }
        }
        params
    }

    fn push(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_slice())
    }

    /// Removes `key` and returns its values, if it was present.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encodes the map as `application/x-www-form-urlencoded`.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.entries {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

/// Which mechanism produced the URL a rule adopted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "source", rename_all = "snake_case")]
pub enum RedirectSource {
    RewritePattern(String),
    RedirectPattern(String),
    RedirectParameter(String),
}

/// One URL occurrence found in the input, with everything the rules did to it.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedUrl {
    original_url: String,
    current_url: Url,
    #[serde(skip)]
    query: QueryParams,
    applied_rules: Vec<String>,
    removed_tracking_params: Vec<String>,
    removed_affiliate_params: Vec<String>,
    is_exception: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    exception_rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_source: Option<RedirectSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_target: Option<String>,
    #[serde(skip)]
    modified: bool,
}

impl MatchedUrl {
    /// Parses a discovered URL substring.
    pub fn parse(original_url: &str) -> Result<Self, url::ParseError> {
        let current_url = Url::parse(original_url)?;
        let query = QueryParams::parse(current_url.query());
        Ok(Self {
            original_url: original_url.to_string(),
            current_url,
            query,
            applied_rules: Vec::new(),
            removed_tracking_params: Vec::new(),
            removed_affiliate_params: Vec::new(),
            is_exception: false,
            exception_rule: None,
            redirect_source: None,
            redirect_target: None,
            modified: false,
        })
    }

    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    pub fn current_url(&self) -> &Url {
        &self.current_url
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn applied_rules(&self) -> &[String] {
        &self.applied_rules
    }

    pub fn removed_tracking_params(&self) -> &[String] {
        &self.removed_tracking_params
    }

    pub fn removed_affiliate_params(&self) -> &[String] {
        &self.removed_affiliate_params
    }

    pub fn is_exception(&self) -> bool {
        self.is_exception
    }

    pub fn exception_rule(&self) -> Option<&str> {
        self.exception_rule.as_deref()
    }

    pub fn redirect_source(&self) -> Option<&RedirectSource> {
        self.redirect_source.as_ref()
    }

    pub fn redirect_target(&self) -> Option<&str> {
        self.redirect_target.as_deref()
    }

    /// Whether any rule changed the URL.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// The current hostname, if the URL has one.
    pub fn hostname(&self) -> Option<&str> {
        self.current_url.host_str()
    }

    /// The final form of the URL. Untouched URLs are returned verbatim, so
    /// the parser's normalization never leaks into the cleaned text.
    pub fn cleaned_url(&self) -> String {
        if self.modified {
            self.current_url.to_string()
        } else {
            self.original_url.clone()
        }
    }

    /// Every parameter name removed from this URL, tracking first.
    pub fn removed_params(&self) -> impl Iterator<Item = &str> {
        self.removed_tracking_params
            .iter()
            .chain(self.removed_affiliate_params.iter())
            .map(String::as_str)
    }

    /// The still percent-encoded value of `key` in the current URL's query.
    pub fn raw_query_value(&self, key: &str) -> Option<String> {
        let query = self.current_url.query()?;
        query.split('&').find_map(|pair| {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let decoded_key = form_urlencoded::parse(raw_key.as_bytes())
                .next()
                .map(|(k, _)| k.into_owned())
                .unwrap_or_default();
            (decoded_key == key).then(|| raw_value.to_string())
        })
    }

    pub(crate) fn query_mut(&mut self) -> &mut QueryParams {
        &mut self.query
    }

    pub(crate) fn mark_exception(&mut self, rule_name: &str) {
        self.is_exception = true;
        self.exception_rule = Some(rule_name.to_string());
    }

    pub(crate) fn record_redirect(&mut self, source: RedirectSource, target: String) {
        self.redirect_source = Some(source);
        self.redirect_target = Some(target);
    }

    /// Replaces the current URL and re-derives the query map from it.
    pub(crate) fn adopt(&mut self, url: Url) {
        self.query = QueryParams::parse(url.query());
        self.current_url = url;
        self.modified = true;
    }

    /// Writes the query map back into the current URL.
    pub(crate) fn sync_query(&mut self) {
        if self.query.is_empty() {
            self.current_url.set_query(None);
        } else {
            let encoded = self.query.encode();
            self.current_url.set_query(Some(&encoded));
        }
        self.modified = true;
    }

    pub(crate) fn push_applied_rule(&mut self, rule_name: &str) {
        self.applied_rules.push(rule_name.to_string());
    }

    pub(crate) fn push_removed_tracking(&mut self, key: String) {
        self.removed_tracking_params.push(key);
    }

    pub(crate) fn push_removed_affiliate(&mut self, key: String) {
        self.removed_affiliate_params.push(key);
    }
}

/// A summary of how often a rule fired during one clean call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSummaryItem {
    pub rule_name: String,
    pub occurrences: usize,
}

/// The outcome of cleaning one piece of text.
#[derive(Debug, Clone, Serialize)]
pub struct CleanResult {
    original_text: String,
    cleaned_text: String,
    urls: Vec<MatchedUrl>,
}

impl CleanResult {
    pub fn new(original_text: String, cleaned_text: String, urls: Vec<MatchedUrl>) -> Self {
        Self { original_text, cleaned_text, urls }
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn cleaned_text(&self) -> &str {
        &self.cleaned_text
    }

    pub fn urls(&self) -> &[MatchedUrl] {
        &self.urls
    }

    pub fn modified_count(&self) -> usize {
        self.urls.iter().filter(|u| u.is_modified()).count()
    }

    pub fn removed_params_count(&self) -> usize {
        self.urls.iter().map(|u| u.removed_params().count()).sum()
    }

    /// Per-rule application counts, in order of first application.
    pub fn summary(&self) -> Vec<RuleSummaryItem> {
        let mut summary: Vec<RuleSummaryItem> = Vec::new();
        for rule_name in self.urls.iter().flat_map(|u| u.applied_rules()) {
            match summary.iter_mut().find(|item| item.rule_name == *rule_name) {
                Some(item) => item.occurrences += 1,
                None => summary.push(RuleSummaryItem { rule_name: rule_name.clone(), occurrences: 1 }),
            }
        }
        summary
    }
}
