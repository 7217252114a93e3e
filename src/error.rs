//! Error types for LogiMAS.
//!
//! Each layer has its own error enum; [`Error`] unifies them for the CLI
//! and other callers that cross layers.

use thiserror::Error;

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Agent, routing, or orchestration failure.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// Relational store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Document retrieval failure.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// CLI command failure.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the agent system.
#[derive(Debug, Error)]
pub enum AgentError {
    /// No API key was configured for the model provider.
    #[error("API key missing: set OPENAI_API_KEY or LOGIMAS_API_KEY")]
    ApiKeyMissing,

    /// The configured provider name is not known.
    #[error("unsupported provider: {name}")]
    UnsupportedProvider {
        /// Provider name as configured.
        name: String,
    },

    /// The model API call failed.
    #[error("API request failed: {message}")]
    ApiRequest {
        /// Error message from the transport or SDK.
        message: String,
        /// HTTP status, when known.
        status: Option<u16>,
    },

    /// The model response could not be decoded into the expected shape.
    #[error("failed to parse model response: {message}")]
    ResponseParse {
        /// What went wrong.
        message: String,
        /// Raw content returned by the model.
        content: String,
    },

    /// A tool call failed. Converted into an error payload before it
    /// reaches the model.
    #[error("{message}")]
    ToolExecution {
        /// Tool name.
        name: String,
        /// Failure description.
        message: String,
    },

    /// The request-wide step ceiling was reached.
    #[error("step limit of {limit} exceeded while executing {node}")]
    StepLimitExceeded {
        /// Configured ceiling.
        limit: usize,
        /// Node or loop phase that tried to take the extra step.
        node: String,
    },

    /// A tool-calling agent could not be assembled.
    #[error("failed to construct {agent} agent: {message}")]
    Construction {
        /// Agent name.
        agent: String,
        /// Failure description.
        message: String,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Which value and why.
        message: String,
    },

    /// The query was rejected before routing.
    #[error("invalid query: {message}")]
    InvalidQuery {
        /// Reason for rejection.
        message: String,
    },

    /// Graph state or wiring violated an invariant.
    #[error("orchestration error: {message}")]
    Orchestration {
        /// Description of the violation.
        message: String,
    },
}

/// Errors raised by the relational store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite failure.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON column could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A previous holder of the connection panicked.
    #[error("database connection lock poisoned")]
    LockPoisoned,
}

/// Errors raised by the document retriever.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Underlying store failure.
    #[error("document store error: {0}")]
    Store(#[from] StoreError),

    /// Embedding could not be computed or decoded.
    #[error("embedding error: {message}")]
    Embedding {
        /// Failure description.
        message: String,
    },
}

impl From<rusqlite::Error> for RetrievalError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Store(StoreError::Sqlite(e))
    }
}

/// Errors raised by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command could not complete.
    #[error("{0}")]
    ExecutionFailed(String),

    /// An argument was malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Output could not be rendered.
    #[error("output format error: {0}")]
    OutputFormat(String),
}
