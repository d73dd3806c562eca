//! Page summaries from the Wikipedia REST API, used for speaker research.

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SearchError};

const WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/api/rest_v1";

pub struct Wikipedia {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    extract: String,
}

impl Wikipedia {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: WIKIPEDIA_API_URL.to_string(),
        }
    }

    /// Fetch the lead-section extract for a page title.
    /// Returns None for pages that do not exist.
    pub async fn summary(&self, title: &str) -> Result<Option<String>> {
        let encoded: String = url::form_urlencoded::byte_serialize(title.replace(' ', "_").as_bytes())
            .collect();
        let url = format!("{}/page/summary/{}", self.base_url, encoded);

        debug!(title, "Wikipedia summary lookup");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SummaryResponse = response.json().await?;
        if parsed.extract.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(parsed.extract))
        }
    }
}

impl Default for Wikipedia {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_response_parses_extract() {
        let raw = r#"{"title": "Angela Merkel", "extract": "Angela Merkel is a German politician."}"#;
        let parsed: SummaryResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.extract.starts_with("Angela Merkel"));
    }

    #[test]
    fn missing_extract_defaults_empty() {
        let parsed: SummaryResponse = serde_json::from_str(r#"{"title": "X"}"#).unwrap();
        assert!(parsed.extract.is_empty());
    }
}
