// urlscrub/src/cli.rs
//! This file defines the command-line interface (CLI) for the urlscrub application,
//! including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::ui::messages::Language;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "urlscrub",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Remove tracking parameters from URLs in text",
    long_about = "urlscrub finds every http(s) URL in a piece of text and strips tracking and affiliate query parameters from it. Cleaning is driven by declarative rules: parameter blacklists and whitelists, domain-scoped remove-all rules, rewrites and redirect unwrapping. Built-in rules can be extended with native rule files or ClearURLs provider catalogues.",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all log messages and the per-URL report.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// Specify the path to a custom YAML theme file.
    #[arg(long = "theme", value_name = "FILE", global = true, help = "Specify the path to a custom YAML theme file.")]
    pub theme: Option<PathBuf>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `urlscrub` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cleans every URL found in an input file or stdin.
    #[command(about = "Cleans every URL found in an input file or stdin.")]
    Clean(CleanCommand),

    /// Tools for inspecting, importing and exporting cleaning rules.
    #[command(subcommand, about = "Tools for inspecting, importing and exporting cleaning rules.")]
    Rules(RulesCommand),
}

/// Where the rule set comes from: the built-in rules plus any extra files.
#[derive(Args, Debug, Clone, Default)]
pub struct RuleSources {
    /// Extra rule files (native JSON/YAML or ClearURLs catalogues), applied after the built-in rules.
    #[arg(long = "rules", value_name = "FILE", help = "Load additional rules from FILE (repeatable).")]
    pub rules: Vec<PathBuf>,

    /// Start from an empty rule set instead of the built-in rules.
    #[arg(long = "no-default-rules", help = "Do not load the built-in rules.")]
    pub no_default_rules: bool,
}

/// Arguments for the `clean` command.
#[derive(Parser, Debug)]
pub struct CleanCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write cleaned output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub sources: RuleSources,

    /// Also remove affiliate parameters.
    #[arg(long = "affiliate", help = "Also remove affiliate/referral parameters.")]
    pub affiliate: bool,

    /// Keep tracking parameters (only rewrites, redirects and, with --affiliate, affiliate removal run).
    #[arg(long = "keep-tracking", help = "Do not remove tracking parameters.")]
    pub keep_tracking: bool,

    /// Explicitly enable only these rule names (comma-separated).
    #[arg(long, short = 'e', value_delimiter = ',', help = "Explicitly enable only these rule names (comma-separated).")]
    pub enable: Vec<String>,

    /// Explicitly disable these rule names (comma-separated).
    #[arg(long, short = 'x', value_delimiter = ',', help = "Explicitly disable these rule names (comma-separated).")]
    pub disable: Vec<String>,

    /// Print a JSON report instead of the cleaned text.
    #[arg(long = "json", conflicts_with = "diff", help = "Print a JSON report with every URL's audit record instead of the cleaned text.")]
    pub json: bool,

    /// Show a unified diff to highlight the changes made.
    #[arg(long, short = 'D', help = "Show a unified diff to highlight the changes made.")]
    pub diff: bool,

    /// Suppress the per-URL report.
    #[arg(long = "no-summary", help = "Suppress the per-URL report on stderr.")]
    pub no_summary: bool,

    /// Language of the per-URL report.
    #[arg(long = "lang", value_enum, default_value = "en", env = "URLSCRUB_LANG", help = "Language of the per-URL report.")]
    pub lang: Language,
}

/// Subcommands of `urlscrub rules`.
#[derive(Subcommand, Debug)]
pub enum RulesCommand {
    /// Lists the loaded rules.
    #[command(about = "Lists the loaded rules as a table.")]
    List {
        #[command(flatten)]
        sources: RuleSources,
    },

    /// Writes the loaded rules to a native JSON rule file.
    #[command(about = "Writes the loaded rules to a native JSON rule file.")]
    Export {
        /// Destination file.
        #[arg(value_name = "PATH")]
        path: PathBuf,

        #[command(flatten)]
        sources: RuleSources,
    },

    /// Imports a native or ClearURLs rule file on top of the built-in rules and writes the merged set.
    #[command(about = "Imports a rule file on top of the built-in rules and writes the merged set.")]
    Import {
        /// File to import.
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Where to write the merged rule set.
        #[arg(long = "out", value_name = "PATH")]
        out: PathBuf,

        /// Additional provider names to skip (repeatable).
        #[arg(long = "deny", value_name = "NAME", help = "Skip this ClearURLs provider (repeatable).")]
        deny: Vec<String>,

        /// Do not skip the providers skipped by default.
        #[arg(long = "no-default-deny", help = "Do not skip the providers denied by default.")]
        no_default_deny: bool,

        #[arg(long = "no-default-rules", help = "Do not load the built-in rules.")]
        no_default_rules: bool,
    },

    /// Runs every rule's test URLs through that rule.
    #[command(about = "Runs every rule's test URLs through that rule and reports the results.")]
    Verify {
        #[command(flatten)]
        sources: RuleSources,
    },
}
