use crate::config::toml_config::GeminiConfig;
use crate::domain::ports::ImageGenerator;
use crate::utils::error::{ForgeError, Result};
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[allow(dead_code)]
    mime_type: Option<String>,
    data: String,
}

/// Gemini `generateContent` 圖片生成
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] }
        });

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ForgeError::ApiError {
                message: format!("{} returned {}: {}", self.model, status, text.chars().take(200).collect::<String>()),
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let parts = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        for part in parts {
            if let Some(inline) = part.inline_data {
                return Ok(base64::engine::general_purpose::STANDARD.decode(inline.data)?);
            }
            if let Some(text) = part.text {
                tracing::debug!(
                    "💬 Text response: {}",
                    text.chars().take(200).collect::<String>()
                );
            }
        }

        Err(ForgeError::ApiError {
            message: "No image in response".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn config_for(server: &MockServer) -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".to_string(),
            endpoint: server.base_url(),
            model: "gemini-test".to_string(),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_generate_returns_inline_image() {
        let server = MockServer::start();
        let png = vec![0x89, b'P', b'N', b'G', 1, 2, 3];
        let encoded = base64::engine::general_purpose::STANDARD.encode(&png);

        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-test:generateContent")
                .header("x-goog-api-key", "test-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "candidates": [{
                        "content": { "parts": [
                            { "text": "Here is your image" },
                            { "inlineData": { "mimeType": "image/png", "data": encoded } }
                        ] }
                    }]
                }));
        });

        let config = config_for(&server);
        let client = GeminiClient::new(&config, "test-key").unwrap();
        let bytes = client.generate("draw a bubble").await.unwrap();

        api_mock.assert();
        assert_eq!(bytes, png);
    }

    #[tokio::test]
    async fn test_text_only_response_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "candidates": [{ "content": { "parts": [{ "text": "I can't draw that" }] } }]
                }));
        });

        let config = config_for(&server);
        let client = GeminiClient::new(&config, "test-key").unwrap();
        let err = client.generate("draw").await.unwrap_err();

        assert!(matches!(err, ForgeError::ApiError { .. }));
    }

    #[tokio::test]
    async fn test_http_error_status_is_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(403).body("forbidden");
        });

        let config = config_for(&server);
        let client = GeminiClient::new(&config, "test-key").unwrap();
        let err = client.generate("draw").await.unwrap_err();

        assert!(matches!(err, ForgeError::ApiError { .. }));
    }
}
