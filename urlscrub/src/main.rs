// urlscrub/src/main.rs
//! urlscrub entry point.
//!
//! Parses the command line, sets up logging and the output theme, and
//! dispatches to the selected command.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;

use urlscrub::cli::{Cli, Commands};
use urlscrub::commands::{clean, error_msg, rules};
use urlscrub::logger;
use urlscrub::ui::theme::{build_theme_map, ThemeMap, ThemeStyle};

fn run(args: &Cli, theme: &ThemeMap) -> Result<()> {
    match &args.command {
        Commands::Clean(cmd) => clean::run_clean_command(cmd, args.quiet, theme),
        Commands::Rules(cmd) => rules::run_rules_command(cmd, args.quiet, theme),
    }
}

fn main() -> ExitCode {
    let args = Cli::parse();
    logger::init_logger(logger::level_from_flags(args.quiet, args.debug));

    let result = build_theme_map(args.theme.as_deref())
        .context("Theme error")
        .and_then(|theme| run(&args, &theme));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error_msg(format!("{:#}", e), &ThemeStyle::default_theme_map());
            ExitCode::FAILURE
        }
    }
}
