//! Google search via the Serper API.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SearchError};
use crate::types::{ImageSize, SearchHit};
use crate::SearchBackend;

const SERPER_API_URL: &str = "https://google.serper.dev";
const IMAGE_RESULT_COUNT: u32 = 10;

pub struct SerperSearch {
    api_key: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct WebResponse {
    #[serde(default)]
    organic: Vec<OrganicHit>,
}

#[derive(Debug, Deserialize)]
struct OrganicHit {
    #[serde(default)]
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    images: Vec<ImageHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageHit {
    image_url: Option<String>,
    link: Option<String>,
}

impl SerperSearch {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
        }
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<reqwest::Response> {
        let response = self
            .http
            .post(format!("{SERPER_API_URL}{path}"))
            .header("X-API-KEY", &self.api_key)
            .json(&body)
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

    /// Image search: returns candidate image URLs, best first.
    pub async fn search_images(&self, query: &str, size: ImageSize) -> Result<Vec<String>> {
        debug!(query, "Serper image search");

        let body = serde_json::json!({
            "q": query,
            "num": IMAGE_RESULT_COUNT,
            "tbs": format!("isz:{}", size.google_param()),
        });
        let response = self.post("/images", body).await?;
        let parsed: ImageResponse = response.json().await?;

        Ok(parsed
            .images
            .into_iter()
            .filter_map(|img| img.image_url.or(img.link))
            .collect())
    }
}

#[async_trait]
impl SearchBackend for SerperSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        debug!(query, "Serper web search");

        let response = self.post("/search", serde_json::json!({ "q": query })).await?;
        let parsed: WebResponse = response.json().await?;

        Ok(parsed
            .organic
            .into_iter()
            .map(|hit| SearchHit {
                title: hit.title,
                url: hit.link,
                snippet: hit.snippet,
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "serper"
    }
}
