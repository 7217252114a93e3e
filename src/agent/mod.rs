//! Agent routing and orchestration for LogiMAS.
//!
//! A router classifies each query into one of six agents; the selected
//! agent answers it, either from retrieved documents or by calling tools
//! against the logistics store. Model access goes through a pluggable
//! provider abstraction backed by OpenAI-compatible APIs.
//!
//! # Architecture
//!
//! ```text
//! User query → OrchestrationGraph
//!   ├── Router (schema-constrained choice of AgentKind)
//!   ├── One agent node
//!   │   ├── RagChain: coordinator, mobility, supplier
//!   │   └── ToolCallingAgent: tracking, warehouse, cost
//!   │       └── agentic loop → ToolExecutor → LogisticsStore
//!   ├── Audit log entry
//!   └── Final responder → labeled response
//! ```

pub mod agentic_loop;
pub mod budget;
pub mod client;
pub mod config;
pub mod executor;
pub mod graph;
pub mod message;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod rag;
pub mod router;
pub mod tool;
pub mod tool_agent;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types
pub use budget::StepBudget;
pub use client::create_provider;
pub use config::AgentConfig;
pub use executor::ToolExecutor;
pub use graph::{InvokeRequest, InvokeResponse, MAX_QUERY_LEN, OrchestrationGraph, validate_query};
pub use message::{ChatMessage, ChatRequest, ChatResponse, OutputSchema, Role, TokenUsage};
pub use prompt::PromptSet;
pub use provider::{LlmProvider, complete_structured};
pub use rag::RagChain;
pub use router::{Router, RouterChoice};
pub use tool::{ToolCall, ToolDefinition, ToolResult, ToolSet};
pub use tool_agent::{FallbackExecutor, ToolCallingAgent, build_tool_agent};
pub use traits::{Agent, AgentOutput, AgentResponse, DomainAgent, execute_with_tools};
