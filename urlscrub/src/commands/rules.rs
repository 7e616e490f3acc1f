//! `urlscrub rules ...`: listing, exporting, importing and verifying rules.

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use std::path::Path;

use urlscrub_core::{EngineOptions, RuleEngine, RuleSet, DEFAULT_PROVIDER_DENYLIST};

use crate::cli::{RuleSources, RulesCommand};
use crate::commands::{info_msg, load_rule_set, success_msg, warn_msg};
use crate::ui::report;
use crate::ui::theme::ThemeMap;

pub fn run_rules_command(cmd: &RulesCommand, quiet: bool, theme: &ThemeMap) -> Result<()> {
    match cmd {
        RulesCommand::List { sources } => list_rules(sources),
        RulesCommand::Export { path, sources } => export_rules(path, sources, quiet, theme),
        RulesCommand::Import { file, out, deny, no_default_deny, no_default_rules } => {
            let denylist = build_denylist(deny, *no_default_deny);
            import_rules(file, out, &denylist, *no_default_rules, quiet, theme)
        }
        RulesCommand::Verify { sources } => verify_rules(sources, quiet, theme),
    }
}

/// The providers to skip: the defaults (unless disabled) plus `extra`.
pub fn build_denylist(extra: &[String], no_default_deny: bool) -> Vec<String> {
    let mut denylist: Vec<String> = if no_default_deny {
        Vec::new()
    } else {
        DEFAULT_PROVIDER_DENYLIST.iter().map(|name| name.to_string()).collect()
    };
    for name in extra {
        if !denylist.contains(name) {
            denylist.push(name.clone());
        }
    }
    denylist
}

fn list_rules(sources: &RuleSources) -> Result<()> {
    let rules = load_rule_set(sources)?;
    println!("{}", report::rules_table(rules.iter()));
    Ok(())
}

fn export_rules(path: &Path, sources: &RuleSources, quiet: bool, theme: &ThemeMap) -> Result<()> {
    let rules = load_rule_set(sources)?;
    rules
        .export_rules(path)
        .with_context(|| format!("Failed to export rules to {}", path.display()))?;
    if !quiet {
        success_msg(format!("Exported {} rules to {}", rules.len(), path.display()), theme);
    }
    Ok(())
}

fn import_rules(
    file: &Path,
    out: &Path,
    denylist: &[String],
    no_default_rules: bool,
    quiet: bool,
    theme: &ThemeMap,
) -> Result<()> {
    let mut rules = if no_default_rules {
        RuleSet::new()
    } else {
        RuleSet::load_default_rules().context("Failed to load the built-in rules")?
    };
    let denylist: Vec<&str> = denylist.iter().map(String::as_str).collect();
    debug!("Importing {} with denylist {:?}", file.display(), denylist);

    let before = rules.len();
    let parsed = rules
        .import_rules_with_denylist(file, &denylist)
        .with_context(|| format!("Failed to import rules from {}", file.display()))?;
    let added = rules.len() - before;

    rules
        .export_rules(out)
        .with_context(|| format!("Failed to write merged rules to {}", out.display()))?;

    if !quiet {
        info_msg(
            format!("Parsed {} rules from {} ({} new).", parsed.len(), file.display(), added),
            theme,
        );
        success_msg(format!("Wrote {} rules to {}", rules.len(), out.display()), theme);
    }
    Ok(())
}

fn verify_rules(sources: &RuleSources, quiet: bool, theme: &ThemeMap) -> Result<()> {
    let rules = load_rule_set(sources)?;
    let engine = RuleEngine::new(EngineOptions { remove_tracking: true, remove_affiliate: true });
    let outcomes = rules.verify_test_urls(&engine);

    if outcomes.is_empty() {
        if !quiet {
            warn_msg("No rule defines test URLs.", theme);
        }
        return Ok(());
    }

    println!("{}", report::fixtures_table(&outcomes));

    let failed = outcomes.iter().filter(|o| o.applied != Some(true)).count();
    if failed > 0 {
        for outcome in outcomes.iter().filter(|o| o.applied != Some(true)) {
            warn!("Fixture {} of rule '{}' did not apply.", outcome.test_url, outcome.rule_name);
        }
        bail!("{} of {} rule test URL(s) did not apply", failed, outcomes.len());
    }
    if !quiet {
        success_msg(format!("All {} rule test URL(s) applied.", outcomes.len()), theme);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denylist_merges_defaults_and_extras() {
        let denylist = build_denylist(&["google".to_string(), "amazon".to_string()], false);
        assert_eq!(denylist, vec!["amazon", "ebay", "google"]);
        assert_eq!(build_denylist(&["google".to_string()], true), vec!["google"]);
    }
}
