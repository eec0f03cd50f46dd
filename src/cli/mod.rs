//! CLI module for the deployer property tool.
//!
//! This module provides the command-line interface for resolving and
//! inspecting deployer properties.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat, SourceArgs};
pub use output::OutputFormatter;
