//! Command-line front end: one-shot subcommands plus the `browse` TUI.

pub mod commands;

pub use commands::{Cli, Commands, run};
