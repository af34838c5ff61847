//! LLM Client Abstraction
//!
//! Provides a generic interface for calling a hosted text-generation backend.
//! Supports the real Gemini REST implementation and a fake client for testing.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Fallback credential when neither env variable is set
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    45
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// LLM errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Invalid JSON response: {0}")]
    InvalidJson(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("LLM returned empty response")]
    EmptyResponse,
}

/// What the caller expects back from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    Json,
}

/// One outbound generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub response_format: ResponseFormat,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, response_format: ResponseFormat) -> Self {
        Self {
            prompt: prompt.into(),
            response_format,
        }
    }
}

/// Generic text-generation backend
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send a prompt and return the raw generated text
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError>;

    /// Model identifier, for logs and health output
    fn model(&self) -> &str;
}

// ============================================================================
// Gemini Client
// ============================================================================

/// Real client for the Gemini `generateContent` REST endpoint
pub struct GeminiClient {
    config: ProviderConfig,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: ProviderConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            config,
            api_key: api_key.into(),
            client,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body(request: &GenerationRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "contents": [
                {"role": "user", "parts": [{"text": request.prompt}]}
            ],
        });

        if request.response_format == ResponseFormat::Json {
            body["generationConfig"] = serde_json::json!({
                "responseMimeType": "application/json",
            });
        }

        body
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let url = self.url();
        debug!(
            "Calling {} ({} prompt chars, {:?})",
            self.config.model,
            request.prompt.len(),
            request.response_format
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.config.timeout_secs)
                } else {
                    LlmError::HttpError(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            // Surface the provider's own message when it sends one
            let detail = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| {
                    v.get("error")
                        .and_then(|e| e.get("message"))
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                });
            return Err(LlmError::HttpError(match detail {
                Some(msg) => format!("HTTP {} from Gemini: {}", status, msg),
                None => format!("HTTP {} from Gemini", status),
            }));
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidJson(format!("Failed to parse response: {}", e)))?;

        extract_candidate_text(&response_json)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// Concatenate the text parts of the first candidate
fn extract_candidate_text(response: &serde_json::Value) -> Result<String, LlmError> {
    let parts = response
        .get("candidates")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("content"))
        .and_then(|v| v.get("parts"))
        .and_then(|v| v.as_array())
        .ok_or(LlmError::EmptyResponse)?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}

// ============================================================================
// Fake Client
// ============================================================================

/// Fake LLM client for testing
pub struct FakeTextGenerator {
    responses: Mutex<Vec<Result<String, LlmError>>>,
    call_count: Mutex<usize>,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl FakeTextGenerator {
    /// Create a fake client with pre-defined responses
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a fake client that always returns the same text
    pub fn always_text(text: impl Into<String>) -> Self {
        Self::new(vec![Ok(text.into())])
    }

    /// Create a fake client that always returns the given JSON, serialized
    pub fn always_json(json: serde_json::Value) -> Self {
        Self::new(vec![Ok(json.to_string())])
    }

    /// Create a fake client that always returns an error
    pub fn always_error(error: LlmError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Get the number of calls made
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// The most recent request, if any call was made
    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeTextGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        *self.call_count.lock().unwrap() += 1;
        *self.last_request.lock().unwrap() = Some(request.clone());

        let mut responses = self.responses.lock().unwrap();
        match responses.len() {
            0 => Err(LlmError::EmptyResponse),
            // Keep returning the same response
            1 => responses[0].clone(),
            _ => responses.remove(0),
        }
    }

    fn model(&self) -> &str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_default() {
        let config = ProviderConfig::default();
        assert_eq!(config.endpoint, "https://generativelanguage.googleapis.com");
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout_secs, 45);
    }

    #[test]
    fn test_request_body_text_mode() {
        let body = GeminiClient::request_body(&GenerationRequest::new("hi", ResponseFormat::Text));
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_request_body_json_mode() {
        let body = GeminiClient::request_body(&GenerationRequest::new("hi", ResponseFormat::Json));
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let config = ProviderConfig {
            endpoint: "http://localhost:9999/".to_string(),
            ..Default::default()
        };
        let client = GeminiClient::new(config, "k").unwrap();
        assert_eq!(
            client.url(),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_extract_candidate_text_joins_parts() {
        let response = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "Hello, "}, {"text": "world"}]}}]
        });
        assert_eq!(extract_candidate_text(&response).unwrap(), "Hello, world");
    }

    #[test]
    fn test_extract_candidate_text_empty() {
        let response = serde_json::json!({"candidates": []});
        assert_eq!(extract_candidate_text(&response), Err(LlmError::EmptyResponse));

        let blank = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "  "}]}}]
        });
        assert_eq!(extract_candidate_text(&blank), Err(LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_fake_client_always_text() {
        let client = FakeTextGenerator::always_text("copy");
        let request = GenerationRequest::new("prompt", ResponseFormat::Text);

        assert_eq!(client.generate(&request).await.unwrap(), "copy");
        assert_eq!(client.generate(&request).await.unwrap(), "copy");
        assert_eq!(client.call_count(), 2);
        assert_eq!(client.last_request(), Some(request));
    }

    #[tokio::test]
    async fn test_fake_client_multiple_responses() {
        let client = FakeTextGenerator::new(vec![
            Ok("one".to_string()),
            Ok("two".to_string()),
            Err(LlmError::Timeout(30)),
        ]);
        let request = GenerationRequest::new("", ResponseFormat::Text);

        assert_eq!(client.generate(&request).await.unwrap(), "one");
        assert_eq!(client.generate(&request).await.unwrap(), "two");
        assert!(client.generate(&request).await.is_err());
        assert_eq!(client.call_count(), 3);
    }
}
