pub mod brave;
pub mod duckduckgo;
pub mod error;
pub mod images;
pub mod rate_limit;
pub mod serper;
pub mod types;
pub mod validate;
pub mod wikipedia;

pub use error::{Result, SearchError};
pub use images::ImageFinder;
pub use rate_limit::RateLimiter;
pub use types::{hits_to_text, ImageSize, SearchHit, SearchProviderKind};
pub use wikipedia::Wikipedia;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use brave::BraveSearch;
use duckduckgo::DuckDuckGo;
use serper::SerperSearch;

/// A web search provider. Implementations return parsed hits; rate limiting
/// is applied by [`SearchClient`], not by individual backends.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
    fn name(&self) -> &'static str;
}

/// API keys for the keyed providers. DuckDuckGo works without one.
#[derive(Debug, Clone, Default)]
pub struct ProviderKeys {
    pub serper: Option<String>,
    pub brave: Option<String>,
}

/// Rate-limited web search over a pluggable backend.
#[derive(Clone)]
pub struct SearchClient {
    backend: Arc<dyn SearchBackend>,
    limiter: Arc<RateLimiter>,
}

impl SearchClient {
    /// Build a client for the requested provider. Falls back to DuckDuckGo
    /// when the provider needs a key that is not configured; a missing key
    /// should degrade research, not abort it.
    pub fn for_provider(kind: SearchProviderKind, keys: &ProviderKeys, min_delay: Duration) -> Self {
        let backend: Arc<dyn SearchBackend> = match kind {
            SearchProviderKind::DuckDuckGo => Arc::new(DuckDuckGo::new()),
            SearchProviderKind::Serper => match &keys.serper {
                Some(key) => Arc::new(SerperSearch::new(key)),
                None => {
                    warn!("SERPER_API_KEY not set, falling back to DuckDuckGo");
                    Arc::new(DuckDuckGo::new())
                }
            },
            SearchProviderKind::Brave => match &keys.brave {
                Some(key) => Arc::new(BraveSearch::new(key)),
                None => {
                    warn!("BRAVE_API_KEY not set, falling back to DuckDuckGo");
                    Arc::new(DuckDuckGo::new())
                }
            },
        };

        Self {
            backend,
            limiter: Arc::new(RateLimiter::new(min_delay)),
        }
    }

    /// Build from an explicit backend and limiter. Used by tests and by
    /// callers that share one limiter across clients.
    pub fn from_backend(backend: Arc<dyn SearchBackend>, limiter: Arc<RateLimiter>) -> Self {
        Self { backend, limiter }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        self.limiter.wait().await;
        self.backend.search(query).await
    }

    /// Search and render the hits as a single research-text blob.
    pub async fn search_text(&self, query: &str) -> Result<String> {
        Ok(hits_to_text(&self.search(query).await?))
    }

    pub fn provider_name(&self) -> &'static str {
        self.backend.name()
    }
}
