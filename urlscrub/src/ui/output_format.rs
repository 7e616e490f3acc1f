// urlscrub/src/ui/output_format.rs
//! Styled status messages for stderr.

use owo_colors::OwoColorize;
use std::io::{self, Write};

use crate::ui::theme::{color_for, ThemeEntry, ThemeMap};

/// Writes `text` in the theme's color for `entry`, or plain when color is off.
pub fn paint(text: &str, entry: ThemeEntry, theme: &ThemeMap, enable_colors: bool) -> String {
    match color_for(theme, entry) {
        Some(color) if enable_colors => text.color(color).to_string(),
        _ => text.to_string(),
    }
}

fn print_message<W: Write>(
    writer: &mut W,
    prefix: &str,
    message: &str,
    entry: ThemeEntry,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    writeln!(writer, "{}", paint(&format!("{}{}", prefix, message), entry, theme, enable_colors))
}

pub fn print_info_message<W: Write>(writer: &mut W, message: &str, theme: &ThemeMap, enable_colors: bool) -> io::Result<()> {
    print_message(writer, "", message, ThemeEntry::Info, theme, enable_colors)
}

pub fn print_success_message<W: Write>(writer: &mut W, message: &str, theme: &ThemeMap, enable_colors: bool) -> io::Result<()> {
    print_message(writer, "", message, ThemeEntry::Success, theme, enable_colors)
}

pub fn print_warn_message<W: Write>(writer: &mut W, message: &str, theme: &ThemeMap, enable_colors: bool) -> io::Result<()> {
    print_message(writer, "Warning: ", message, ThemeEntry::Warn, theme, enable_colors)
}

pub fn print_error_message<W: Write>(writer: &mut W, message: &str, theme: &ThemeMap, enable_colors: bool) -> io::Result<()> {
    print_message(writer, "Error: ", message, ThemeEntry::Error, theme, enable_colors)
}
