//! # LogiMAS
//!
//! Multi-agent logistics assistant. A router sends each natural-language
//! query to one of six agents:
//!
//! - **coordinator**, **mobility**, **supplier**: answer from documents
//!   retrieved from the knowledge base
//! - **tracking**, **warehouse**, **cost**: call tools against the
//!   logistics database until they can answer
//!
//! The [`agent::OrchestrationGraph`] runs `router -> agent -> final_responder`
//! per request under a step budget and writes one audit entry per agent run.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use logimas::agent::{AgentConfig, OrchestrationGraph, create_provider};
//! use logimas::audit::MemoryAuditSink;
//! use logimas::retrieval::{SqliteDocumentStore, default_embedder};
//! use logimas::store::SqliteStore;
//!
//! # async fn run() -> logimas::Result<()> {
//! let config = AgentConfig::from_env()?;
//! let store = SqliteStore::open(".logimas/logimas.db")?;
//! let docs = SqliteDocumentStore::open(".logimas/logimas.db", default_embedder())?;
//!
//! let graph = OrchestrationGraph::from_config(
//!     &config,
//!     create_provider(&config)?,
//!     Arc::new(store),
//!     Arc::new(docs),
//!     Arc::new(MemoryAuditSink::new()),
//! );
//! let answer = graph.invoke("Where is shipment SHP-1001?").await?;
//! # let _ = answer;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod audit;
pub mod cli;
pub mod core;
pub mod error;
pub mod retrieval;
pub mod store;

pub use error::{Error, Result};
