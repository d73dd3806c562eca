//! Web and image search via the Brave Search API.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SearchError};
use crate::types::SearchHit;
use crate::SearchBackend;

const BRAVE_API_URL: &str = "https://api.search.brave.com/res/v1";
const IMAGE_RESULT_COUNT: u32 = 10;

pub struct BraveSearch {
    api_key: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct WebResponse {
    #[serde(default)]
    web: Option<WebResults>,
}

#[derive(Debug, Deserialize)]
struct WebResults {
    #[serde(default)]
    results: Vec<WebHit>,
}

#[derive(Debug, Deserialize)]
struct WebHit {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    results: Vec<ImageHit>,
}

#[derive(Debug, Deserialize)]
struct ImageHit {
    #[serde(default)]
    properties: Option<ImageProperties>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageProperties {
    url: Option<String>,
}

impl BraveSearch {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
        }
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let response = self
            .http
            .get(format!("{BRAVE_API_URL}{path}"))
            .header("X-Subscription-Token", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// Image search: returns direct image URLs where Brave provides them,
    /// falling back to the result page URL.
    pub async fn search_images(&self, query: &str) -> Result<Vec<String>> {
        debug!(query, "Brave image search");

        let response = self
            .get(
                "/images/search",
                &[
                    ("q", query.to_string()),
                    ("count", IMAGE_RESULT_COUNT.to_string()),
                    ("safesearch", "strict".to_string()),
                ],
            )
            .await?;
        let parsed: ImageResponse = response.json().await?;

        Ok(parsed
            .results
            .into_iter()
            .filter_map(|hit| hit.properties.and_then(|p| p.url).or(hit.url))
            .collect())
    }
}

#[async_trait]
impl SearchBackend for BraveSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        debug!(query, "Brave web search");

        let response = self.get("/web/search", &[("q", query.to_string())]).await?;
        let parsed: WebResponse = response.json().await?;

        Ok(parsed
            .web
            .map(|w| w.results)
            .unwrap_or_default()
            .into_iter()
            .map(|hit| SearchHit {
                title: hit.title,
                url: hit.url,
                snippet: hit.description,
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "brave"
    }
}
