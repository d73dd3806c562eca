//! Client for the Gemini `generateContent` API.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

pub(crate) struct GeminiClient {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
            base_url: GEMINI_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        debug!(model, "Gemini generateContent request");

        let response = self.http.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow!("Gemini API error ({}): {}", status, error_text));
        }

        let generated: GenerateResponse = response.json().await?;
        generated
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| anyhow!("No response from Gemini"))
    }

    pub async fn complete(
        &self,
        model: &str,
        temperature: f32,
        system: &str,
        user: &str,
    ) -> Result<String> {
        let request = GenerateRequest {
            system_instruction: system_content(system),
            contents: vec![user_content(user)],
            generation_config: GenerationConfig {
                temperature,
                response_mime_type: None,
                response_schema: None,
            },
        };
        self.generate(model, &request).await
    }

    pub async fn extract_value(
        &self,
        model: &str,
        temperature: f32,
        system: &str,
        user: &str,
        schema: Value,
    ) -> Result<Value> {
        let request = GenerateRequest {
            system_instruction: system_content(system),
            contents: vec![user_content(user)],
            generation_config: GenerationConfig {
                temperature,
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(to_gemini_schema(schema)),
            },
        };

        let text = self.generate(model, &request).await?;
        serde_json::from_str(&text)
            .map_err(|e| anyhow!("Gemini returned non-JSON structured output: {e}"))
    }
}

fn system_content(text: &str) -> Content {
    Content {
        role: None,
        parts: vec![Part { text: text.to_string() }],
    }
}

fn user_content(text: &str) -> Content {
    Content {
        role: Some("user".to_string()),
        parts: vec![Part { text: text.to_string() }],
    }
}

/// Gemini's responseSchema is an OpenAPI-style subset that rejects
/// `additionalProperties`; strip it but keep everything else.
fn to_gemini_schema(mut schema: Value) -> Value {
    strip_additional_properties(&mut schema);
    schema
}

fn strip_additional_properties(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove("additionalProperties");
            for (_, v) in map.iter_mut() {
                strip_additional_properties(v);
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                strip_additional_properties(item);
            }
        }
        _ => {}
    }
}
