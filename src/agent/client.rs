//! Builds the shared model backend from configuration.

use std::sync::Arc;

use tracing::debug;

use crate::agent::config::AgentConfig;
use crate::agent::provider::LlmProvider;
use crate::agent::providers::OpenAiProvider;
use crate::error::AgentError;

/// Creates an [`LlmProvider`] based on the configured provider name.
///
/// # Supported Providers
///
/// - `"openai"` (default): any OpenAI-compatible API via `async-openai`,
///   including Groq through `OPENAI_BASE_URL`
///
/// # Errors
///
/// Returns [`AgentError::UnsupportedProvider`] for unknown provider names.
pub fn create_provider(config: &AgentConfig) -> Result<Arc<dyn LlmProvider>, AgentError> {
    let provider: Arc<dyn LlmProvider> = match config.provider.trim().to_ascii_lowercase().as_str() {
        "openai" => Arc::new(OpenAiProvider::new(config)),
        _ => {
            return Err(AgentError::UnsupportedProvider {
                name: config.provider.clone(),
            });
        }
    };
    debug!(
        provider = provider.name(),
        model = %config.model,
        router_model = %config.router_model,
        base_url = config.base_url.as_deref().unwrap_or("default"),
        "model backend ready"
    );
    Ok(provider)
}
