// urlscrub/src/commands/mod.rs
//! Command implementations and the helpers they share.

pub mod clean;
pub mod rules;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::debug;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use urlscrub_core::RuleSet;

use crate::cli::RuleSources;
use crate::ui::output_format;
use crate::ui::theme::ThemeMap;

/// Builds the rule set: built-in rules (unless disabled), then each extra file in order.
pub fn load_rule_set(sources: &RuleSources) -> Result<RuleSet> {
    let mut rules = if sources.no_default_rules {
        RuleSet::new()
    } else {
        RuleSet::load_default_rules().context("Failed to load the built-in rules")?
    };
    for path in &sources.rules {
        rules
            .import_rules(path)
            .with_context(|| format!("Failed to load rules from {}", path.display()))?;
    }
    debug!("Rule set ready with {} rules.", rules.len());
    Ok(rules)
}

/// Reads the whole input file, or stdin when no file is given.
pub fn read_input(input_file: Option<&Path>) -> Result<String> {
    match input_file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read input file: {}", path.display()))
        }
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let colors = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), theme, colors);
}

/// Helper for printing success messages to stderr.
pub fn success_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let colors = io::stderr().is_terminal();
    let _ = output_format::print_success_message(&mut io::stderr(), msg.as_ref(), theme, colors);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let colors = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), theme, colors);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let colors = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), theme, colors);
}
