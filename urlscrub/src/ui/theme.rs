//! Colors for terminal output.
//!
//! A theme maps each logical output element to an optional foreground color.
//! Users can override any subset of entries with a YAML file such as:
//!
//! ```yaml
//! cleaned_url:
//!   fg: brightgreen
//! removed_param:
//!   fg: red
//! ```
//!
//! Entries missing from the file keep their default color.

use anyhow::{Context, Result};
use owo_colors::AnsiColors;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub type ThemeMap = HashMap<ThemeEntry, ThemeStyle>;

/// The parts of the output that can be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeEntry {
    Header,
    Success,
    Info,
    Warn,
    Error,
    /// A URL after cleaning.
    CleanedUrl,
    /// Rule names in the per-URL report.
    RuleName,
    /// Removed parameter names in the per-URL report.
    RemovedParam,
    DiffAdded,
    DiffRemoved,
    DiffHeader,
    SummaryRuleName,
    SummaryOccurrences,
}

impl ThemeEntry {
    pub const ALL: [ThemeEntry; 13] = [
        ThemeEntry::Header,
        ThemeEntry::Success,
        ThemeEntry::Info,
        ThemeEntry::Warn,
        ThemeEntry::Error,
        ThemeEntry::CleanedUrl,
        ThemeEntry::RuleName,
        ThemeEntry::RemovedParam,
        ThemeEntry::DiffAdded,
        ThemeEntry::DiffRemoved,
        ThemeEntry::DiffHeader,
        ThemeEntry::SummaryRuleName,
        ThemeEntry::SummaryOccurrences,
    ];

    fn default_color(self) -> ThemeColor {
        let name = match self {
            ThemeEntry::Header | ThemeEntry::DiffHeader => "brightwhite",
            ThemeEntry::Success | ThemeEntry::CleanedUrl | ThemeEntry::DiffAdded => "green",
            ThemeEntry::Info | ThemeEntry::SummaryOccurrences => "cyan",
            ThemeEntry::Warn => "yellow",
            ThemeEntry::Error | ThemeEntry::RemovedParam | ThemeEntry::DiffRemoved => "red",
            ThemeEntry::RuleName | ThemeEntry::SummaryRuleName => "magenta",
        };
        ThemeColor(name.to_string())
    }
}

const NAMED_COLORS: [(&str, AnsiColors); 16] = [
    ("black", AnsiColors::Black),
    ("red", AnsiColors::Red),
    ("green", AnsiColors::Green),
    ("yellow", AnsiColors::Yellow),
    ("blue", AnsiColors::Blue),
    ("magenta", AnsiColors::Magenta),
    ("cyan", AnsiColors::Cyan),
    ("white", AnsiColors::White),
    ("brightblack", AnsiColors::BrightBlack),
    ("brightred", AnsiColors::BrightRed),
    ("brightgreen", AnsiColors::BrightGreen),
    ("brightyellow", AnsiColors::BrightYellow),
    ("brightblue", AnsiColors::BrightBlue),
    ("brightmagenta", AnsiColors::BrightMagenta),
    ("brightcyan", AnsiColors::BrightCyan),
    ("brightwhite", AnsiColors::BrightWhite),
];

/// A named 16-color ANSI color, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct ThemeColor(String);

#[derive(Debug, Clone)]
pub struct ParseThemeColorError(String);

impl fmt::Display for ParseThemeColorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<&str> = NAMED_COLORS.iter().map(|(name, _)| *name).collect();
        write!(f, "Invalid theme color '{}'; expected one of: {}.", self.0, names.join(", "))
    }
}

impl std::error::Error for ParseThemeColorError {}

impl FromStr for ThemeColor {
    type Err = ParseThemeColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        if NAMED_COLORS.iter().any(|(name, _)| *name == lower) {
            Ok(ThemeColor(lower))
        } else {
            Err(ParseThemeColorError(s.to_string()))
        }
    }
}

impl TryFrom<String> for ThemeColor {
    type Error = ParseThemeColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ThemeColor> for String {
    fn from(color: ThemeColor) -> Self {
        color.0
    }
}

impl ThemeColor {
    pub fn to_ansi_color(&self) -> AnsiColors {
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == self.0)
            .map(|(_, color)| *color)
            .unwrap_or(AnsiColors::Default)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeStyle {
    pub fg: Option<ThemeColor>,
}

/// Loads a theme from `theme_path`, or the default theme.
pub fn build_theme_map(theme_path: Option<&Path>) -> Result<ThemeMap> {
    match theme_path {
        Some(path) => ThemeStyle::load_from_file(path),
        None => Ok(ThemeStyle::default_theme_map()),
    }
}

/// The foreground color configured for `entry`, if any.
pub fn color_for(theme: &ThemeMap, entry: ThemeEntry) -> Option<AnsiColors> {
    theme.get(&entry).and_then(|style| style.fg.as_ref()).map(ThemeColor::to_ansi_color)
}

impl ThemeStyle {
    /// Reads a YAML theme file and fills unspecified entries from the default theme.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<ThemeMap> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read theme file {}", path.display()))?;
        let mut theme: ThemeMap = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse theme file {}", path.display()))?;

        for (entry, style) in Self::default_theme_map() {
            theme.entry(entry).or_insert(style);
        }
        Ok(theme)
    }

    pub fn default_theme_map() -> ThemeMap {
        ThemeEntry::ALL
            .iter()
            .map(|entry| (*entry, ThemeStyle { fg: Some(entry.default_color()) }))
            .collect()
    }
}
