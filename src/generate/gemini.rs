//! Gemini-backed implementation of the generation boundary
//!
//! Concept calls ask for a structured JSON response and decode it straight
//! into [`Concept`]; visual calls scan the response parts for inline image
//! data. Request/response shapes follow the generateContent REST API.

use super::model::InventionModel;
use super::prompt;
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::invention::{Concept, InventionRequest, ResourceMode, VisualPayload};
use async_trait::async_trait;
use serde::Deserialize;

/// HTTP client for the Gemini generateContent API
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    config: ModelConfig,
}

impl GeminiClient {
    /// Create a client from config, reading the API key from the configured
    /// environment variable
    pub fn from_config(config: ModelConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            Error::Config(format!(
                "API key environment variable {} is not set",
                config.api_key_env
            ))
        })?;
        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            config,
        })
    }

    async fn generate_content(
        &self,
        model: &str,
        body: &serde_json::Value,
    ) -> Result<GenerateContentResponse> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            model
        );
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "model call failed with {}: {}",
                status, detail
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl InventionModel for GeminiClient {
    async fn generate_concept(&self, request: &InventionRequest) -> Result<Concept> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt::concept_prompt(request) }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        let response = self
            .generate_content(&self.config.concept_model, &body)
            .await?;

        let text = response
            .first_text()
            .ok_or_else(|| Error::Generation("no text returned from model".to_string()))?;

        serde_json::from_str(&text)
            .map_err(|e| Error::Generation(format!("model returned unparseable concept: {}", e)))
    }

    async fn generate_visual(&self, prompt_text: &str, mode: ResourceMode) -> Result<VisualPayload> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt::visual_prompt(prompt_text, mode) }] }]
        });

        let response = self
            .generate_content(&self.config.visual_model, &body)
            .await
            .map_err(|e| Error::Visual(e.to_string()))?;

        response
            .first_inline_image()
            .ok_or_else(|| Error::Visual("no image data found in response".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "inlineData")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    #[serde(default, rename = "mimeType")]
    mime_type: Option<String>,
    data: String,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<String> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .find_map(|p| p.text.clone())
    }

    fn first_inline_image(self) -> Option<VisualPayload> {
        self.candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.inline_data)
            .map(|d| VisualPayload {
                mime_type: d.mime_type.unwrap_or_else(|| "image/png".to_string()),
                data: d.data,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_extraction() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"name\":\"X\"}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_text().unwrap(), "{\"name\":\"X\"}");
    }

    #[test]
    fn test_response_image_extraction() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"here is your image"},
                {"inlineData":{"mimeType":"image/png","data":"aW1n"}}
            ]}}]}"#,
        )
        .unwrap();
        let visual = response.first_inline_image().unwrap();
        assert_eq!(visual.mime_type, "image/png");
        assert_eq!(visual.data, "aW1n");
    }

    #[test]
    fn test_response_image_defaults_mime_type() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{"data":"aW1n"}}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_inline_image().unwrap().mime_type, "image/png");
    }

    #[test]
    fn test_empty_response_yields_nothing() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(response.first_text().is_none());
        assert!(response.first_inline_image().is_none());
    }
}
