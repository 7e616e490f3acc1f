// urlscrub/src/ui/diff_viewer.rs
//! Line diff between the input text and the cleaned text.

use diffy::{create_patch, Line as DiffLine};
use std::io::{self, Write};

use crate::ui::output_format::paint;
use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Prints changed lines as `-`/`+` pairs. Unchanged context lines are
/// prefixed with two spaces.
pub fn print_diff<W: Write>(
    original: &str,
    cleaned: &str,
    writer: &mut W,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    writeln!(writer, "{}", paint("--- Diff View ---", ThemeEntry::DiffHeader, theme, enable_colors))?;

    let patch = create_patch(original, cleaned);
    let mut changed = false;
    for hunk in patch.hunks() {
        for line in hunk.lines() {
            match line {
                DiffLine::Delete(text) => {
                    changed = true;
                    let text = format!("- {}", text.trim_end_matches('\n'));
                    writeln!(writer, "{}", paint(&text, ThemeEntry::DiffRemoved, theme, enable_colors))?;
                }
                DiffLine::Insert(text) => {
                    changed = true;
                    let text = format!("+ {}", text.trim_end_matches('\n'));
                    writeln!(writer, "{}", paint(&text, ThemeEntry::DiffAdded, theme, enable_colors))?;
                }
                DiffLine::Context(text) => writeln!(writer, "  {}", text.trim_end_matches('\n'))?,
            }
        }
    }

    if !changed {
        writeln!(writer, "No changes.")?;
    }
    writeln!(writer, "{}", paint("-----------------", ThemeEntry::DiffHeader, theme, enable_colors))
}
