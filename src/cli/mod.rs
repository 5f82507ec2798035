//! Command-line interface for the chartfile client

pub mod args;
pub mod commands;

pub use args::{parse_args, Cli, Commands};
