// urlscrub/src/ui/report.rs
//! Human-readable reports: the per-URL cleaning report, the rule summary
//! table, and the `rules list` / `rules verify` tables.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use std::io::{self, Write};

use urlscrub_core::{CleanResult, CleaningRule, FixtureOutcome, MatchedUrl, RuleSummaryItem};

use crate::ui::messages::Messages;
use crate::ui::output_format::paint;
use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Prints, for every URL found, its cleaned form, the applied rules and the
/// removed parameters.
pub fn print_url_report<W: Write>(
    result: &CleanResult,
    writer: &mut W,
    messages: &Messages,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    let urls = result.urls();
    if urls.is_empty() {
        return writeln!(writer, "{}", paint(messages.no_links_found, ThemeEntry::Warn, theme, enable_colors));
    }

    let heading = messages.urls_detected(urls.len());
    writeln!(writer, "{}", paint(&heading, ThemeEntry::Header, theme, enable_colors))?;

    for (index, url) in urls.iter().enumerate() {
        if urls.len() > 1 {
            writeln!(writer, "{} {}", messages.url_heading, index + 1)?;
        }
        write_url_entry(writer, url, messages, theme, enable_colors)?;
        if index + 1 < urls.len() {
            writeln!(writer, "---")?;
        }
    }
    Ok(())
}

fn write_url_entry<W: Write>(
    writer: &mut W,
    url: &MatchedUrl,
    messages: &Messages,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    let cleaned = url.cleaned_url();
    writeln!(
        writer,
        "{}: {}",
        messages.cleaned_link,
        paint(&cleaned, ThemeEntry::CleanedUrl, theme, enable_colors)
    )?;

    if let Some(rule) = url.exception_rule() {
        return writeln!(
            writer,
            "{}: {}",
            messages.exception,
            paint(rule, ThemeEntry::RuleName, theme, enable_colors)
        );
    }

    if url.applied_rules().is_empty() {
        return writeln!(writer, "{}: {} -> {}", messages.applied_rules, messages.none, messages.already_clean);
    }

    let rules = paint(&url.applied_rules().join(", "), ThemeEntry::RuleName, theme, enable_colors);
    writeln!(writer, "{}: {}", messages.applied_rules, rules)?;

    let removed: Vec<&str> = url.removed_params().collect();
    let removed = if removed.is_empty() {
        messages.none.to_string()
    } else {
        paint(&removed.join(", "), ThemeEntry::RemovedParam, theme, enable_colors)
    };
    writeln!(writer, "{}: {}", messages.removed_parameters, removed)
}

/// Prints how often each rule fired.
pub fn print_summary<W: Write>(
    summary: &[RuleSummaryItem],
    writer: &mut W,
    messages: &Messages,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    if summary.is_empty() {
        return Ok(());
    }
    writeln!(writer, "\n{}", paint(messages.summary_header, ThemeEntry::Header, theme, enable_colors))?;

    let mut table = new_table();
    table.set_header(vec![messages.summary_rule, messages.summary_occurrences]);
    for item in summary {
        table.add_row(vec![
            paint(&item.rule_name, ThemeEntry::SummaryRuleName, theme, enable_colors),
            paint(&item.occurrences.to_string(), ThemeEntry::SummaryOccurrences, theme, enable_colors),
        ]);
    }
    writeln!(writer, "{}", table)
}

/// Short description of how a rule cleans a URL.
pub fn describe_strategy(rule: &CleaningRule) -> String {
    let mut parts = Vec::new();
    if rule.remove_all_parameters() {
        parts.push("remove all".to_string());
    }
    if let Some(whitelist) = rule.params_whitelist() {
        parts.push(format!("keep {}", whitelist.len()));
    }
    if let Some(blacklist) = rule.params_blacklist() {
        parts.push(format!("remove {}", blacklist.len()));
    }
    if !rule.affiliate_params_blacklist().is_empty() {
        parts.push(format!("affiliate {}", rule.affiliate_params_blacklist().len()));
    }
    if rule.rewrite().is_some() {
        parts.push("rewrite".to_string());
    }
    if !rule.redirect_patterns().is_empty() || !rule.redirect_params().is_empty() {
        parts.push("redirect".to_string());
    }
    if !rule.exception_patterns().is_empty() {
        parts.push("exceptions".to_string());
    }
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}

pub fn rules_table<'a>(rules: impl IntoIterator<Item = &'a CleaningRule>) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Name", "Enabled", "Strategy", "Domains", "Stops"]);
    for rule in rules {
        let domains = match rule.domain_whitelist().len() {
            0 => "any".to_string(),
            1 => rule.domain_whitelist()[0].clone(),
            n => format!("{} domains", n),
        };
        table.add_row(vec![
            rule.name().to_string(),
            yes_no(rule.enabled()).to_string(),
            describe_strategy(rule),
            domains,
            yes_no(rule.effective_stop()).to_string(),
        ]);
    }
    table
}

pub fn fixtures_table(outcomes: &[FixtureOutcome]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Rule", "Test URL", "Applied", "Result"]);
    for outcome in outcomes {
        let applied = match outcome.applied {
            Some(applied) => yes_no(applied),
            None => "invalid URL",
        };
        table.add_row(vec![
            outcome.rule_name.clone(),
            outcome.test_url.clone(),
            applied.to_string(),
            outcome.cleaned_url.clone().unwrap_or_default(),
        ]);
    }
    table
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::messages::Language;
    use crate::ui::theme::ThemeStyle;
    use std::sync::Arc;
    use urlscrub_core::{CleaningEngine, EngineOptions, RuleSet, RuleSpec, TextCleaner};

    fn clean(text: &str) -> CleanResult {
        let rule = CleaningRule::new(RuleSpec {
            params_blacklist: Some(vec!["fbclid".to_string()]),
            ..RuleSpec::named("Facebook Click Identifier")
        })
        .unwrap();
        TextCleaner::with_options(Arc::new(RuleSet::from_rules([rule])), EngineOptions::default()).clean_text(text)
    }

    fn render(result: &CleanResult, language: Language) -> String {
        let mut out = Vec::new();
        print_url_report(result, &mut out, language.messages(), &ThemeStyle::default_theme_map(), false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn report_lists_rules_and_removed_params() {
        let report = render(&clean("https://a.example/?fbclid=1 https://b.example/"), Language::En);
        assert!(report.starts_with("Detected 2 URL(s):\n"));
        assert!(report.contains("URL 1\nCleaned link: https://a.example/\n"));
        assert!(report.contains("Applied rules: Facebook Click Identifier\nRemoved parameters: fbclid\n---\n"));
        assert!(report.contains("URL 2\nCleaned link: https://b.example/\nApplied rules: None -> URL was already clean?\n"));
    }

    #[test]
    fn report_is_localized() {
        let report = render(&clean("https://a.example/?fbclid=1"), Language::De);
        assert!(report.starts_with("1 URL(s) gefunden:\n"));
        assert!(!report.contains("URL 1"));
        assert!(report.contains("Entfernte Parameter: fbclid"));
    }

    #[test]
    fn report_without_urls() {
        let report = render(&clean("no links here"), Language::En);
        assert_eq!(report, "Failed to find any links.\n");
    }

    #[test]
    fn strategy_description() {
        let rule = CleaningRule::new(RuleSpec {
            remove_all_parameters: true,
            domain_whitelist: vec!["amazon.de".to_string()],
            ..RuleSpec::named("amazon")
        })
        .unwrap();
        assert_eq!(describe_strategy(&rule), "remove all");
        let table = rules_table([&rule]).to_string();
        assert!(table.contains("amazon.de"));
    }
}
