//! CLI layer for LogiMAS.
//!
//! Provides the command-line interface using clap, with commands for
//! initializing the database, asking and routing queries, and calling
//! registry tools directly.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands, ToolsCommands};
