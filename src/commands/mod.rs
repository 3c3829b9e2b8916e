//! Subcommand implementations for the CLI.

pub mod config;

pub use config::command_config;
pub use test::command_test;
