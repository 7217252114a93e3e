//! Agent configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.

use std::path::PathBuf;

use crate::error::AgentError;

use super::budget::DEFAULT_MAX_STEPS;
use crate::retrieval::DEFAULT_TOP_K;

/// Default model for every agent.
///
/// Matches the default `OpenAI` endpoint and supports strict structured
/// outputs. Override with `LOGIMAS_MODEL` when pointing `OPENAI_BASE_URL`
/// elsewhere.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default maximum tokens per completion.
const DEFAULT_MAX_TOKENS: u32 = 2048;
/// Default sampling temperature.
const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Configuration for the agent system.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// LLM provider name (e.g., "openai").
    pub provider: String,
    /// API key for the provider.
    pub api_key: String,
    /// Optional base URL override (any OpenAI-compatible endpoint, e.g. Groq).
    pub base_url: Option<String>,
    /// Model for the domain agents.
    pub model: String,
    /// Model for the router. Defaults to `model`.
    pub router_model: String,
    /// Maximum tokens per completion.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request-wide ceiling on node visits plus reasoning rounds.
    pub max_steps: usize,
    /// Documents retrieved per RAG query.
    pub retrieval_k: usize,
    /// Directory containing prompt template files.
    ///
    /// Missing files fall back to compiled-in defaults.
    pub prompt_dir: Option<PathBuf>,
}

impl AgentConfig {
    /// Creates a new builder for `AgentConfig`.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key is found.
    pub fn from_env() -> Result<Self, AgentError> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    provider: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    router_model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    max_steps: Option<usize>,
    retrieval_k: Option<usize>,
    prompt_dir: Option<PathBuf>,
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

impl AgentConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.provider.is_none() {
            self.provider = std::env::var("LOGIMAS_PROVIDER").ok();
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var("OPENAI_API_KEY")
                .or_else(|_| std::env::var("LOGIMAS_API_KEY"))
                .ok();
        }
        if self.base_url.is_none() {
            self.base_url = std::env::var("OPENAI_BASE_URL")
                .or_else(|_| std::env::var("LOGIMAS_BASE_URL"))
                .ok();
        }
        if self.model.is_none() {
            self.model = std::env::var("LOGIMAS_MODEL").ok();
        }
        if self.router_model.is_none() {
            self.router_model = std::env::var("LOGIMAS_ROUTER_MODEL").ok();
        }
        if self.max_steps.is_none() {
            self.max_steps = env_parse("LOGIMAS_MAX_STEPS");
        }
        if self.retrieval_k.is_none() {
            self.retrieval_k = env_parse("LOGIMAS_RETRIEVAL_K");
        }
        if self.prompt_dir.is_none() {
            self.prompt_dir = std::env::var("LOGIMAS_PROMPT_DIR").ok().map(PathBuf::from);
        }
        self
    }

    /// Sets the LLM provider name.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the agent model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the router model.
    #[must_use]
    pub fn router_model(mut self, model: impl Into<String>) -> Self {
        self.router_model = Some(model.into());
        self
    }

    /// Sets the completion token limit.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    /// Sets the request-wide step ceiling.
    #[must_use]
    pub const fn max_steps(mut self, n: usize) -> Self {
        self.max_steps = Some(n);
        self
    }

    /// Sets the number of documents retrieved per RAG query.
    #[must_use]
    pub const fn retrieval_k(mut self, k: usize) -> Self {
        self.retrieval_k = Some(k);
        self
    }

    /// Sets the prompt template directory.
    #[must_use]
    pub fn prompt_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prompt_dir = Some(dir.into());
        self
    }

    /// Builds the [`AgentConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key was set, or
    /// [`AgentError::InvalidConfig`] for a zero step budget or retrieval depth.
    pub fn build(self) -> Result<AgentConfig, AgentError> {
        let api_key = self.api_key.ok_or(AgentError::ApiKeyMissing)?;
        let max_steps = self.max_steps.unwrap_or(DEFAULT_MAX_STEPS);
        if max_steps == 0 {
            return Err(AgentError::InvalidConfig {
                message: "max_steps must be at least 1".to_string(),
            });
        }
        let retrieval_k = self.retrieval_k.unwrap_or(DEFAULT_TOP_K);
        if retrieval_k == 0 {
            return Err(AgentError::InvalidConfig {
                message: "retrieval_k must be at least 1".to_string(),
            });
        }
        let model = self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(AgentConfig {
            provider: self.provider.unwrap_or_else(|| "openai".to_string()),
            api_key,
            base_url: self.base_url,
            router_model: self.router_model.unwrap_or_else(|| model.clone()),
            model,
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_steps,
            retrieval_k,
            prompt_dir: self.prompt_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limits_rejected() {
        let steps = AgentConfig::builder().api_key("k").max_steps(0).build();
        assert!(matches!(steps, Err(AgentError::InvalidConfig { .. })));
        let k = AgentConfig::builder().api_key("k").retrieval_k(0).build();
        assert!(matches!(k, Err(AgentError::InvalidConfig { .. })));
    }

    #[test]
    fn test_builder_defaults() {
        let config = AgentConfig::builder()
            .api_key("test-key")
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.provider, "openai");
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.router_model, DEFAULT_MODEL);
        // default model is served by the default endpoint
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(config.base_url.is_none());
        assert_eq!(config.max_steps, 10);
        assert_eq!(config.retrieval_k, 5);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_builder_missing_api_key() {
        let result = AgentConfig::builder().build();
        assert!(matches!(result, Err(AgentError::ApiKeyMissing)));
    }

    #[test]
    fn test_router_model_follows_model() {
        let config = AgentConfig::builder()
            .api_key("key")
            .model("llama-3.1-8b-instant")
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.router_model, "llama-3.1-8b-instant");
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AgentConfig::builder()
            .api_key("key")
            .provider("custom")
            .router_model("small")
            .max_steps(4)
            .retrieval_k(3)
            .prompt_dir("/tmp/prompts")
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.provider, "custom");
        assert_eq!(config.router_model, "small");
        assert_eq!(config.max_steps, 4);
        assert_eq!(config.retrieval_k, 3);
        assert_eq!(config.prompt_dir, Some(PathBuf::from("/tmp/prompts")));
    }
}
