use std::env;
use std::time::Duration;

use tracing::info;

/// Application configuration loaded from environment variables.
/// All provider keys are optional; which providers are usable at runtime
/// depends on which keys are present.
#[derive(Debug, Clone)]
pub struct Config {
    // LLM providers
    pub openai_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub gemini_api_key: Option<String>,

    // Search providers (DuckDuckGo needs no key)
    pub serper_api_key: Option<String>,
    pub brave_api_key: Option<String>,

    // Research tuning
    pub search_delay: Duration,
    pub max_search_chars: usize,
}

const DEFAULT_SEARCH_DELAY_MS: u64 = 1000;
const DEFAULT_MAX_SEARCH_CHARS: usize = 1500;

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            groq_api_key: optional_env("GROQ_API_KEY"),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            serper_api_key: optional_env("SERPER_API_KEY"),
            brave_api_key: optional_env("BRAVE_API_KEY"),
            search_delay: Duration::from_millis(
                env::var("SEARCH_DELAY_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_SEARCH_DELAY_MS),
            ),
            max_search_chars: env::var("MAX_SEARCH_CHARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_SEARCH_CHARS),
        }
    }

    /// Log which keys are present without printing their values.
    pub fn log_redacted(&self) {
        info!(
            openai = self.openai_api_key.is_some(),
            groq = self.groq_api_key.is_some(),
            gemini = self.gemini_api_key.is_some(),
            serper = self.serper_api_key.is_some(),
            brave = self.brave_api_key.is_some(),
            search_delay_ms = self.search_delay.as_millis() as u64,
            max_search_chars = self.max_search_chars,
            "Configuration loaded"
        );
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
