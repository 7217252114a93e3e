//! Retrieval-augmented agents (coordinator, mobility, supplier).
//!
//! One shot per query: retrieve the top-k documents, join their text into
//! the template's `{context}`, and return the model's raw answer.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::budget::StepBudget;
use super::config::AgentConfig;
use super::message::{ChatRequest, user_message};
use super::prompt::build_rag_prompt;
use super::provider::LlmProvider;
use super::traits::{AgentOutput, DomainAgent};
use crate::core::AgentKind;
use crate::error::AgentError;
use crate::retrieval::{RetrievedDocument, Retriever, format_documents};

/// A retrieval-backed agent.
pub struct RagChain {
    kind: AgentKind,
    provider: Arc<dyn LlmProvider>,
    retriever: Arc<dyn Retriever>,
    template: String,
    k: usize,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl RagChain {
    /// Creates a chain for `kind` with a `{context}`/`{question}` template.
    #[must_use]
    pub fn new(
        kind: AgentKind,
        provider: Arc<dyn LlmProvider>,
        retriever: Arc<dyn Retriever>,
        template: impl Into<String>,
        config: &AgentConfig,
    ) -> Self {
        Self {
            kind,
            provider,
            retriever,
            template: template.into(),
            k: config.retrieval_k,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Retrieves context for `query`. Backend failures yield no documents.
    fn retrieve(&self, query: &str) -> Vec<RetrievedDocument> {
        match self.retriever.retrieve(query, self.k) {
            Ok(docs) => {
                debug!(agent = %self.kind, count = docs.len(), "documents retrieved");
                docs
            }
            Err(e) => {
                warn!(agent = %self.kind, error = %e, "retrieval failed; answering without context");
                Vec::new()
            }
        }
    }

    /// Answers `query` from retrieved context.
    ///
    /// # Errors
    ///
    /// Propagates model errors. Retrieval errors are not surfaced.
    pub async fn answer(&self, query: &str) -> Result<String, AgentError> {
        let docs = self.retrieve(query);
        let context = format_documents(&docs);
        let prompt = build_rag_prompt(&self.template, &context, query);

        let request = ChatRequest::new(&self.model, vec![user_message(&prompt)])
            .with_sampling(self.temperature, self.max_tokens);

        let response = self.provider.chat(&request).await?;
        Ok(response.content)
    }
}

#[async_trait]
impl DomainAgent for RagChain {
    fn kind(&self) -> AgentKind {
        self.kind
    }

    async fn run(&self, query: &str, _budget: &StepBudget) -> Result<AgentOutput, AgentError> {
        Ok(AgentOutput::new(self.answer(query).await?))
    }
}
