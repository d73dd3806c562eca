//! Client for the OpenAI chat-completions protocol, also spoken by Groq.

use anyhow::{anyhow, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

pub const OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub(crate) struct OpenAiCompatClient {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
    provider_name: &'static str,
}

impl OpenAiCompatClient {
    pub fn new(api_key: &str, base_url: String, provider_name: &'static str) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
            base_url,
            provider_name,
        }
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = %request.model, provider = self.provider_name, "Chat request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow!(
                "{} API error ({}): {}",
                self.provider_name,
                status,
                error_text
            ));
        }

        let chat_response: ChatResponse = response.json().await?;
        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("No response from {}", self.provider_name))
    }

    pub async fn complete(
        &self,
        model: &str,
        temperature: f32,
        system: &str,
        user: &str,
    ) -> Result<String> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: messages(system, user),
            temperature,
            response_format: None,
        };
        self.chat(&request).await
    }

    pub async fn extract_value(
        &self,
        model: &str,
        temperature: f32,
        system: &str,
        user: &str,
        schema_name: &str,
        schema: Value,
    ) -> Result<Value> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: messages(system, user),
            temperature,
            response_format: Some(serde_json::json!({
                "type": "json_schema",
                "json_schema": {
                    "name": schema_name,
                    "strict": true,
                    "schema": schema,
                }
            })),
        };

        let content = self.chat(&request).await?;
        serde_json::from_str(&content).map_err(|e| {
            anyhow!(
                "{} returned non-JSON structured output: {e}",
                self.provider_name
            )
        })
    }
}

fn messages(system: &str, user: &str) -> Vec<WireMessage> {
    vec![
        WireMessage {
            role: "system",
            content: system.to_string(),
        },
        WireMessage {
            role: "user",
            content: user.to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_without_null_response_format() {
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: messages("sys", "hello"),
            temperature: 0.3,
            response_format: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("response_format").is_none());
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
    }
}
