//! Client for an Ollama-compatible text-generation service.
//!
//! Only the non-streaming `POST /api/generate` call and the `GET /api/tags`
//! liveness check are used.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Connection settings for the text-generation service.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base HTTP URL, e.g. `http://localhost:11434`.
    pub base_url: String,
    /// Model name passed with every request.
    pub model: String,
    /// Ask the service to constrain output to valid JSON.
    pub json_format: bool,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            json_format: true,
        }
    }
}

/// Errors from the text-generation layer.
#[derive(Debug, thiserror::Error)]
pub enum TextGenerationError {
    /// The HTTP request itself failed (network, DNS, TLS, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Ollama API error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// A service that turns a prompt into free-form text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, TextGenerationError>;

    /// Check that the service is reachable.
    async fn ping(&self) -> Result<(), TextGenerationError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// HTTP client for one Ollama instance.
#[derive(Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, mut config: OllamaConfig) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self { client, config }
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            format: self.config.json_format.then_some("json"),
        }
    }

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, TextGenerationError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TextGenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, TextGenerationError> {
        tracing::debug!(model = %self.config.model, prompt_len = prompt.len(), "Requesting text generation");

        let response = self
            .client
            .post(format!("{}/api/generate", self.config.base_url))
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let body: GenerateResponse = Self::ensure_success(response).await?.json().await?;
        Ok(body.response)
    }

    async fn ping(&self) -> Result<(), TextGenerationError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.config.base_url))
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_includes_json_format() {
        let client = OllamaClient::new(OllamaConfig::default());
        let body = serde_json::to_value(client.request_body("hi")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "model": "llama3", "prompt": "hi", "stream": false, "format": "json" })
        );
    }

    #[test]
    fn request_body_omits_format_when_disabled() {
        let client = OllamaClient::new(OllamaConfig {
            json_format: false,
            ..Default::default()
        });
        let body = serde_json::to_value(client.request_body("hi")).unwrap();
        assert!(body.get("format").is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = OllamaClient::new(OllamaConfig {
            base_url: "http://ollama:11434/".into(),
            ..Default::default()
        });
        assert_eq!(client.config().base_url, "http://ollama:11434");
    }

    #[test]
    fn response_field_is_read() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"model":"llama3","response":"{}","done":true}"#).unwrap();
        assert_eq!(parsed.response, "{}");
    }

    #[test]
    fn api_error_display() {
        let err = TextGenerationError::Api {
            status: 404,
            body: "model not found".into(),
        };
        assert_eq!(err.to_string(), "Ollama API error (404): model not found");
    }
}
