pub mod gemini;
pub mod openai;
pub mod schema;

pub use schema::StructuredOutput;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Supported LLM providers. Groq speaks the OpenAI chat-completions protocol;
/// Gemini has its own wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Groq,
    Gemini,
}

impl Provider {
    pub fn default_model(self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Groq => "llama-3.3-70b-versatile",
            Provider::Gemini => "gemini-2.0-flash",
        }
    }

    pub fn env_key(self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Groq => "GROQ_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Groq => "groq",
            Provider::Gemini => "gemini",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Some(Provider::OpenAi),
            "groq" => Some(Provider::Groq),
            "gemini" | "google" => Some(Provider::Gemini),
            _ => None,
        }
    }
}

/// Providers whose API key is present in the environment.
pub fn available_providers() -> Vec<Provider> {
    [Provider::OpenAi, Provider::Groq, Provider::Gemini]
        .into_iter()
        .filter(|p| {
            std::env::var(p.env_key())
                .map(|v| !v.trim().is_empty())
                .unwrap_or(false)
        })
        .collect()
}

/// The seam the pipelines program against: plain completion plus
/// schema-constrained JSON extraction. Object-safe so tests can stub it.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Ask the model for JSON conforming to `schema` and return it parsed.
    async fn extract_value(
        &self,
        system: &str,
        user: &str,
        schema_name: &str,
        schema: Value,
    ) -> Result<Value>;

    fn name(&self) -> &str;
}

/// Typed structured extraction on top of any [`Completion`] implementation.
pub async fn extract<T: StructuredOutput>(
    model: &dyn Completion,
    system: &str,
    user: &str,
) -> Result<T> {
    let value = model
        .extract_value(system, user, &T::type_name(), T::llm_schema())
        .await?;
    serde_json::from_value(value).map_err(|e| anyhow!("Failed to deserialize response: {e}"))
}

/// A chat model bound to one provider, model name, and API key.
#[derive(Clone)]
pub struct ChatModel {
    provider: Provider,
    api_key: String,
    model: String,
    temperature: f32,
    base_url: Option<String>,
}

const DEFAULT_TEMPERATURE: f32 = 0.3;

impl ChatModel {
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            model: provider.default_model().to_string(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: None,
        }
    }

    pub fn from_env(provider: Provider) -> Result<Self> {
        let api_key = std::env::var(provider.env_key())
            .map_err(|_| anyhow!("{} environment variable not set", provider.env_key()))?;
        Ok(Self::new(provider, api_key))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Structured extraction with a typed response. Convenience over the
    /// trait-level [`extract`].
    pub async fn extract<T: StructuredOutput>(&self, system: &str, user: &str) -> Result<T> {
        extract(self, system, user).await
    }

    fn openai_client(&self) -> openai::OpenAiCompatClient {
        let base_url = match (&self.base_url, self.provider) {
            (Some(url), _) => url.clone(),
            (None, Provider::Groq) => openai::GROQ_API_URL.to_string(),
            (None, _) => openai::OPENAI_API_URL.to_string(),
        };
        openai::OpenAiCompatClient::new(&self.api_key, base_url, self.provider.name())
    }

    fn gemini_client(&self) -> gemini::GeminiClient {
        let mut client = gemini::GeminiClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client = client.with_base_url(url);
        }
        client
    }
}

#[async_trait]
impl Completion for ChatModel {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        match self.provider {
            Provider::OpenAi | Provider::Groq => {
                self.openai_client()
                    .complete(&self.model, self.temperature, system, user)
                    .await
            }
            Provider::Gemini => {
                self.gemini_client()
                    .complete(&self.model, self.temperature, system, user)
                    .await
            }
        }
    }

    async fn extract_value(
        &self,
        system: &str,
        user: &str,
        schema_name: &str,
        schema: Value,
    ) -> Result<Value> {
        match self.provider {
            Provider::OpenAi | Provider::Groq => {
                self.openai_client()
                    .extract_value(&self.model, self.temperature, system, user, schema_name, schema)
                    .await
            }
            Provider::Gemini => {
                self.gemini_client()
                    .extract_value(&self.model, self.temperature, system, user, schema)
                    .await
            }
        }
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_defaults() {
        assert_eq!(Provider::OpenAi.default_model(), "gpt-4o-mini");
        assert_eq!(Provider::Groq.default_model(), "llama-3.3-70b-versatile");
        assert_eq!(Provider::Gemini.default_model(), "gemini-2.0-flash");
    }

    #[test]
    fn provider_parse_accepts_google_alias() {
        assert_eq!(Provider::parse("google"), Some(Provider::Gemini));
        assert_eq!(Provider::parse("OpenAI"), Some(Provider::OpenAi));
        assert_eq!(Provider::parse("mistral"), None);
    }

    #[test]
    fn chat_model_builder() {
        let model = ChatModel::new(Provider::Groq, "gsk-test")
            .with_model("llama-3.1-8b-instant")
            .with_temperature(0.0)
            .with_base_url("http://localhost:8080");
        assert_eq!(model.model(), "llama-3.1-8b-instant");
        assert_eq!(model.provider(), Provider::Groq);
        assert_eq!(model.temperature(), 0.0);
        assert_eq!(model.base_url.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn temperature_defaults_when_not_set() {
        let model = ChatModel::new(Provider::OpenAi, "sk-test");
        assert_eq!(model.temperature(), DEFAULT_TEMPERATURE);
    }
}
