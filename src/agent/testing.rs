//! Scripted collaborators shared by the agent unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::message::{ChatRequest, ChatResponse, TokenUsage};
use super::provider::LlmProvider;
use super::tool::ToolCall;
use crate::error::{AgentError, RetrievalError};
use crate::retrieval::{RetrievedDocument, Retriever};
use crate::store::{LogisticsStore, SqliteStore};

enum Script {
    Queue(Mutex<VecDeque<ChatResponse>>),
    Repeat(ChatResponse),
    Fail,
}

/// Provider that replays canned responses and records every request.
pub struct ScriptedProvider {
    script: Script,
    tools: bool,
    calls: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    fn with_script(script: Script) -> Self {
        Self {
            script,
            tools: true,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns `responses` in order, then errors.
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self::with_script(Script::Queue(Mutex::new(responses.into())))
    }

    /// Returns `response` forever.
    pub fn repeating(response: ChatResponse) -> Self {
        Self::with_script(Script::Repeat(response))
    }

    /// Fails every call.
    pub fn failing() -> Self {
        Self::with_script(Script::Fail)
    }

    /// Reports that tools cannot be bound.
    pub fn without_tools(mut self) -> Self {
        self.tools = false;
        self
    }

    /// Number of `chat` calls made.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn supports_tools(&self) -> bool {
        self.tools
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        let exhausted = || AgentError::ApiRequest {
            message: "script exhausted".to_string(),
            status: None,
        };
        match &self.script {
            Script::Queue(queue) => queue
                .lock()
                .ok()
                .and_then(|mut q| q.pop_front())
                .ok_or_else(exhausted),
            Script::Repeat(response) => Ok(response.clone()),
            Script::Fail => Err(AgentError::ApiRequest {
                message: "upstream unavailable".to_string(),
                status: Some(503),
            }),
        }
    }
}

/// A final text answer.
pub fn text_response(content: &str) -> ChatResponse {
    ChatResponse {
        content: content.to_string(),
        usage: TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        },
        tool_calls: Vec::new(),
        finish_reason: Some("stop".to_string()),
    }
}

/// A single tool call.
pub fn tool_response(id: &str, name: &str, arguments: &str) -> ChatResponse {
    ChatResponse {
        content: String::new(),
        usage: TokenUsage::default(),
        tool_calls: vec![ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
        }],
        finish_reason: Some("tool_calls".to_string()),
    }
}

/// An initialized, empty in-memory store.
#[allow(clippy::panic)]
pub fn empty_store() -> Arc<dyn LogisticsStore> {
    let store = SqliteStore::in_memory().unwrap_or_else(|e| panic!("in_memory failed: {e}"));
    store
        .init()
        .unwrap_or_else(|e| panic!("init failed: {e}"));
    Arc::new(store)
}

/// Retriever returning fixed documents.
pub struct StaticRetriever(pub Vec<RetrievedDocument>);

impl StaticRetriever {
    /// Builds documents from plain texts with descending scores.
    pub fn from_texts(texts: &[&str]) -> Self {
        Self(
            texts
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    #[allow(clippy::cast_precision_loss)]
                    let score = 1.0 - (i as f64) * 0.1;
                    RetrievedDocument {
                        text: (*t).to_string(),
                        metadata: serde_json::json!({ "doc_id": format!("doc-{i}") }),
                        score,
                    }
                })
                .collect(),
        )
    }
}

impl Retriever for StaticRetriever {
    fn retrieve(&self, _query: &str, k: usize) -> Result<Vec<RetrievedDocument>, RetrievalError> {
        Ok(self.0.iter().take(k).cloned().collect())
    }
}

/// Retriever whose backend is always down.
pub struct FailingRetriever;

impl Retriever for FailingRetriever {
    fn retrieve(&self, _query: &str, _k: usize) -> Result<Vec<RetrievedDocument>, RetrievalError> {
        Err(RetrievalError::Embedding {
            message: "vector store unreachable".to_string(),
        })
    }
}
