//! Engine implementations.
//!
//! `rule_engine` applies a single rule to a single URL; `text_cleaner` drives
//! it over every URL found in a text and implements `CleaningEngine`.
//! `letters` supplies the characters used for `<randomchar>` placeholders.
//!
//! # License
//! MIT OR Apache-2.0

pub mod letters;
pub mod rule_engine;
pub mod text_cleaner;
