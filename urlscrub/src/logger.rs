// urlscrub/src/logger.rs
//! Logger setup for the CLI.
//!
//! Logs always go to stderr so stdout only ever carries cleaned text or JSON.
//! License: MIT OR Apache-2.0

use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes `env_logger` once per process.
///
/// `RUST_LOG` is honoured when `level` is `None`; otherwise `level` overrides it.
/// Without either, only warnings and errors are shown.
pub fn init_logger(level: Option<LevelFilter>) {
    INIT.call_once(|| {
        let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
        if let Some(level) = level {
            builder.filter_level(level);
        }
        builder.target(Target::Stderr).format_timestamp(None);
        // Another logger may already be installed when embedded in tests.
        let _ = builder.try_init();
    });
}

/// Maps the global `--quiet` / `--debug` flags onto a level override.
pub fn level_from_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_wins_over_debug() {
        assert_eq!(level_from_flags(true, true), Some(LevelFilter::Off));
        assert_eq!(level_from_flags(false, true), Some(LevelFilter::Debug));
        assert_eq!(level_from_flags(false, false), None);
    }
}
