//! Gemini `generateContent` client

use super::{AiError, TextGenerator};
use crate::config::AiConfig;
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default()
    }
}

/// HTTP client for the Gemini API
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: Arc<str>,
    model: Arc<str>,
    api_key: SecretString,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: SecretString, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            model: Arc::from(model),
            api_key,
        })
    }

    pub fn from_config(config: &AiConfig, api_key: SecretString) -> Result<Self> {
        Self::new(
            &config.base_url,
            &config.model,
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiClient {
    #[tracing::instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read body".to_string());
            warn!(%status, "Gemini request failed");
            return Err(AiError::Request(format!("status {}: {}", status, body)));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AiError::Request(format!("unreadable response: {}", e)))?;
        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new(
            &server.uri(),
            "gemini-3-flash-preview",
            SecretString::new("test-key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_joins_text_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-3-flash-preview:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "parts": [{ "text": "Merhaba" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "Selam, " }, { "text": "nasılsın?" }] }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server).generate("Merhaba").await.unwrap();
        assert_eq!(text, "Selam, nasılsın?");
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        assert_eq!(client(&server).generate("x").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_error_status_is_request_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
            .mount(&server)
            .await;

        let err = client(&server).generate("x").await.unwrap_err();
        match err {
            AiError::Request(msg) => assert!(msg.contains("429")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
