//! Library exports for depot-cli.
//!
//! Exposes the CLI structure so that completions and documentation can be
//! generated from the same definition the binary parses.

pub mod cli;
pub mod commands;
pub mod error;
pub mod report;
pub mod utils;

pub use cli::Cli;
