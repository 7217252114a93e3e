//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// LogiMAS: multi-agent logistics assistant.
///
/// Routes natural-language logistics questions to specialized agents that
/// answer from the document store or by calling tools against the
/// logistics database.
#[derive(Parser, Debug)]
#[command(name = "logimas")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the LogiMAS database file.
    ///
    /// Defaults to `.logimas/logimas.db` in the current directory.
    #[arg(short, long, env = "LOGIMAS_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the LogiMAS database.
    ///
    /// Creates the logistics, document, and audit tables.
    #[command(after_help = r#"Examples:
  logimas init                    # Initialize in current directory
  logimas init --force            # Re-initialize (destroys existing data)
  logimas --db-path ./ops.db init # Initialize with custom path
"#)]
    Init {
        /// Force re-initialization (destroys existing data).
        #[arg(short, long)]
        force: bool,
    },

    /// Ask a question and let the router pick the agent.
    ///
    /// Requires an OpenAI-compatible API key.
    #[command(after_help = r#"Examples:
  logimas ask "Where is shipment SHP-1001?"
  logimas ask "What is the fuel cost for SHP-1001?" --max-steps 6
  logimas ask "How many units of PROD0001?" --user-id u-7 --role manager
  OPENAI_BASE_URL=https://api.groq.com/openai/v1 LOGIMAS_MODEL=llama-3.3-70b-versatile \
    logimas --format json ask "Is I-95 congested?"

The default model (gpt-4o-mini) targets the default OpenAI endpoint. When
OPENAI_BASE_URL points at another provider, set LOGIMAS_MODEL (or --model)
to a model that provider serves.
"#)]
    Ask {
        /// The question to answer.
        query: String,

        /// Caller user ID, recorded in the audit log.
        #[arg(long)]
        user_id: Option<String>,

        /// Caller role.
        #[arg(long)]
        role: Option<String>,

        /// Granted permission (repeatable).
        #[arg(long = "permission")]
        permissions: Vec<String>,

        /// Model for the agents (and the router unless overridden).
        #[arg(long)]
        model: Option<String>,

        /// Request-wide step ceiling.
        #[arg(long)]
        max_steps: Option<usize>,

        /// Directory containing prompt template files.
        #[arg(long)]
        prompt_dir: Option<PathBuf>,
    },

    /// Show which agent a question would be routed to.
    Route {
        /// The question to classify.
        query: String,

        /// Router model.
        #[arg(long)]
        model: Option<String>,

        /// Directory containing prompt template files.
        #[arg(long)]
        prompt_dir: Option<PathBuf>,
    },

    /// Registry tool operations (list, call).
    #[command(subcommand)]
    Tools(ToolsCommands),

    /// Write default prompt templates for customization.
    InitPrompts {
        /// Target directory for prompt templates.
        ///
        /// Defaults to `~/.config/logimas/prompts/`.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

/// Registry tool subcommands.
#[derive(Subcommand, Debug)]
pub enum ToolsCommands {
    /// List registered tools with their input schemas.
    List,

    /// Call a tool directly against the database.
    #[command(after_help = r#"Examples:
  logimas tools call shipment-status-lookup '{"shipment_id":"SHP-1001"}'
  logimas tools call packaging-optimizer '{"item_volumes":[250,200]}'
"#)]
    Call {
        /// Tool name.
        name: String,

        /// JSON arguments.
        #[arg(default_value = "{}")]
        arguments: String,
    },
}

impl Cli {
    /// Returns the database path, using default if not specified.
    #[must_use]
    pub fn get_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::store::DEFAULT_DB_PATH))
    }
}
