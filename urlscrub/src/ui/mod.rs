//! Terminal presentation: themes, styled messages, diffs and reports.

pub mod diff_viewer;
pub mod messages;
pub mod output_format;
pub mod report;
pub mod theme;
