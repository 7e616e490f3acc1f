// urlscrub/src/lib.rs
//! # urlscrub CLI Application
//!
//! Command-line front-end for `urlscrub-core`: cleans URLs in files or stdin
//! and manages rule files.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
