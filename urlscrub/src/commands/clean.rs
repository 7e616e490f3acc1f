//! `urlscrub clean`: cleans every URL in a text.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use urlscrub_core::{CleanResult, CleaningEngine, EngineOptions, MatchedUrl, RuleSummaryItem, TextCleaner};

use crate::cli::CleanCommand;
use crate::commands::{info_msg, load_rule_set, read_input};
use crate::ui::diff_viewer;
use crate::ui::messages::Language;
use crate::ui::report;
use crate::ui::theme::ThemeMap;

/// Options for one clean run, independent of how the engine was built.
pub struct CleanOptions {
    pub input: String,
    pub output_path: Option<PathBuf>,
    pub json: bool,
    pub diff: bool,
    pub no_summary: bool,
    pub quiet: bool,
    pub language: Language,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    cleaned_text: &'a str,
    modified_count: usize,
    removed_params_count: usize,
    urls: Vec<JsonUrl<'a>>,
    summary: Vec<RuleSummaryItem>,
}

#[derive(Serialize)]
struct JsonUrl<'a> {
    cleaned_url: String,
    #[serde(flatten)]
    record: &'a MatchedUrl,
}

/// Builds the text cleaner for `cmd`: rule sources, rule filters and engine switches.
pub fn build_cleaner(cmd: &CleanCommand) -> Result<TextCleaner> {
    let mut rules = load_rule_set(&cmd.sources)?;
    if !cmd.enable.is_empty() || !cmd.disable.is_empty() {
        rules.set_active_rules(&cmd.enable, &cmd.disable);
    }
    let options = EngineOptions {
        remove_tracking: !cmd.keep_tracking,
        remove_affiliate: cmd.affiliate,
    };
    debug!("Engine options: {:?}", options);
    Ok(TextCleaner::with_options(Arc::new(rules), options))
}

/// Runs the `clean` command end to end.
pub fn run_clean_command(cmd: &CleanCommand, quiet: bool, theme: &ThemeMap) -> Result<()> {
    let cleaner = build_cleaner(cmd)?;
    let opts = CleanOptions {
        input: read_input(cmd.input_file.as_deref())?,
        output_path: cmd.output.clone(),
        json: cmd.json,
        diff: cmd.diff,
        no_summary: cmd.no_summary,
        quiet,
        language: cmd.lang,
    };
    run_clean(&cleaner, &opts, theme)?;
    Ok(())
}

/// Cleans `opts.input` with `engine`, writes the primary output and the report.
pub fn run_clean(engine: &dyn CleaningEngine, opts: &CleanOptions, theme: &ThemeMap) -> Result<CleanResult> {
    info!("Starting urlscrub clean operation.");
    let result = engine.clean_text(&opts.input);
    debug!(
        "Found {} URL(s), modified {}.",
        result.urls().len(),
        result.modified_count()
    );

    handle_primary_output(opts, &result, theme)?;
    handle_report(opts, &result, theme)?;

    info!("urlscrub clean operation completed.");
    Ok(result)
}

fn render_json(result: &CleanResult) -> Result<String> {
    let report = JsonReport {
        cleaned_text: result.cleaned_text(),
        modified_count: result.modified_count(),
        removed_params_count: result.removed_params_count(),
        urls: result
            .urls()
            .iter()
            .map(|url| JsonUrl { cleaned_url: url.cleaned_url(), record: url })
            .collect(),
        summary: result.summary(),
    };
    serde_json::to_string_pretty(&report).context("Failed to serialize the JSON report")
}

fn write_primary<W: Write>(
    writer: &mut W,
    opts: &CleanOptions,
    result: &CleanResult,
    theme: &ThemeMap,
    enable_colors: bool,
) -> Result<()> {
    if opts.json {
        writeln!(writer, "{}", render_json(result)?)?;
    } else if opts.diff {
        diff_viewer::print_diff(result.original_text(), result.cleaned_text(), writer, theme, enable_colors)?;
    } else {
        writer.write_all(result.cleaned_text().as_bytes())?;
        if !result.cleaned_text().ends_with('\n') {
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn handle_primary_output(opts: &CleanOptions, result: &CleanResult, theme: &ThemeMap) -> Result<()> {
    match &opts.output_path {
        Some(path) => {
            if !opts.quiet {
                info_msg(format!("Writing cleaned content to file: {}", path.display()), theme);
            }
            let mut file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_primary(&mut file, opts, result, theme, false)
        }
        None => {
            let stdout = io::stdout();
            let colors = stdout.is_terminal();
            let mut writer = stdout.lock();
            write_primary(&mut writer, opts, result, theme, colors)
        }
    }
}

fn handle_report(opts: &CleanOptions, result: &CleanResult, theme: &ThemeMap) -> Result<()> {
    if opts.no_summary || opts.quiet {
        return Ok(());
    }
    let stderr = io::stderr();
    let colors = stderr.is_terminal();
    let mut writer = stderr.lock();
    let messages = opts.language.messages();
    report::print_url_report(result, &mut writer, messages, theme, colors)?;
    report::print_summary(&result.summary(), &mut writer, messages, theme, colors)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use urlscrub_core::{CleaningRule, RuleSet, RuleSpec};

    fn cleaner() -> TextCleaner {
        let rule = CleaningRule::new(RuleSpec {
            params_blacklist: Some(vec!["utm_source".to_string()]),
            ..RuleSpec::named("utm")
        })
        .unwrap();
        TextCleaner::new(Arc::new(RuleSet::from_rules([rule])))
    }

    #[test]
    fn json_report_contains_audit_fields() {
        let result = cleaner().clean_text("go https://a.example/?utm_source=x&id=1");
        let json: serde_json::Value = serde_json::from_str(&render_json(&result).unwrap()).unwrap();
        assert_eq!(json["cleaned_text"], "go https://a.example/?id=1");
        assert_eq!(json["modified_count"], 1);
        assert_eq!(json["urls"][0]["cleaned_url"], "https://a.example/?id=1");
        assert_eq!(json["urls"][0]["original_url"], "https://a.example/?utm_source=x&id=1");
        assert_eq!(json["urls"][0]["removed_tracking_params"][0], "utm_source");
        assert_eq!(json["summary"][0]["rule_name"], "utm");
    }

    #[test]
    fn plain_output_keeps_text_and_adds_final_newline() {
        let result = cleaner().clean_text("https://a.example/?utm_source=x");
        let opts = CleanOptions {
            input: String::new(),
            output_path: None,
            json: false,
            diff: false,
            no_summary: true,
            quiet: true,
            language: Language::En,
        };
        let mut out = Vec::new();
        write_primary(&mut out, &opts, &result, &ThemeMap::new(), false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "https://a.example/\n");
    }
}
