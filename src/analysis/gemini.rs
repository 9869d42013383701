//! Gemini `generateContent` driver.
//!
//! Implements [`PropertyAnalyzer`] against the Gemini REST API
//! (`/v1beta/models/{model}:generateContent`) with Google Search grounding
//! and a JSON response schema.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::model::AnalysisResult;

use super::merge::{dedupe_sources, extract_citations, merge_result, parse_reply};
use super::prompt::{instruction, response_schema};
use super::{AnalysisError, AnalysisSettings, PropertyAnalyzer};

/// Public Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Driver for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiAnalyzer {
    http: reqwest::Client,
    settings: AnalysisSettings,
}

impl std::fmt::Debug for GeminiAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAnalyzer")
            .field("settings", &self.settings)
            .finish()
    }
}

impl GeminiAnalyzer {
    /// Create a new driver with the given settings.
    #[must_use]
    pub fn new(settings: AnalysisSettings) -> Self {
        Self::with_client(reqwest::Client::new(), settings)
    }

    /// Create a driver that reuses an existing HTTP client.
    #[must_use]
    pub fn with_client(http: reqwest::Client, settings: AnalysisSettings) -> Self {
        Self { http, settings }
    }

    /// Full `generateContent` URL for the configured model.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    async fn generate(&self, address: &str) -> Result<GenerateContentResponse, AnalysisError> {
        let resp = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.settings.api_key)
            .json(&request_body(address))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait::async_trait]
impl PropertyAnalyzer for GeminiAnalyzer {
    async fn analyze(&self, address: &str) -> Result<AnalysisResult, AnalysisError> {
        tracing::info!(
            name: "analysis.request",
            model = %self.settings.model,
            address = %address,
            "Requesting property analysis"
        );

        match self.generate(address).await {
            Ok(envelope) => {
                let result = envelope.into_result(address);
                tracing::info!(
                    name: "analysis.completed",
                    foundation = %result.foundation_type,
                    sources = result.grounding_sources.len(),
                    "Property analysis completed"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!(name: "analysis.failed", error = %e, "Gemini analysis error");
                Err(e)
            }
        }
    }
}

/// Request body for one address: prompt, search tool, response schema.
#[must_use]
pub fn request_body(address: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": instruction(address) }]
        }],
        "tools": [{ "google_search": {} }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}

/// `generateContent` response envelope. Only the parts we read are typed.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    /// Kept untyped; malformed chunks are filtered, not rejected.
    #[serde(default)]
    grounding_metadata: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Reply text of the first candidate, or `None` when it has no text parts.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let texts: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }

    /// Grounding chunks of the first candidate, empty when absent.
    #[must_use]
    pub fn grounding_chunks(&self) -> &[Value] {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .and_then(|m| m.get("groundingChunks"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Assemble the report for `address`.
    #[must_use]
    pub fn into_result(self, address: &str) -> AnalysisResult {
        let raw = parse_reply(self.text().as_deref());
        let sources = dedupe_sources(extract_citations(self.grounding_chunks()));
        merge_result(&raw, address, sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FoundationType, GroundingSource};

    fn analyzer(base_url: &str) -> GeminiAnalyzer {
        GeminiAnalyzer::new(AnalysisSettings {
            base_url: base_url.to_string(),
            api_key: "test-key".to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            analyzer("https://generativelanguage.googleapis.com/").endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = request_body("1 Main St");

        assert_eq!(body["tools"], json!([{ "google_search": {} }]));
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"]
                .as_array()
                .unwrap()
                .len(),
            11
        );
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("1 Main St"));
    }

    #[test]
    fn test_grounded_reply_scenario() {
        let envelope: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "{\"foundationType\":\"Basement\"," },
                        { "text": "\"yearBuilt\":\"1924\"}" }
                    ]
                },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "a", "title": "A" } },
                        { "web": { "uri": "a", "title": "A-dup" } },
                        { }
                    ]
                }
            }]
        }))
        .unwrap();

        let result = envelope.into_result("123 Maple Ave, Springfield, IL");

        assert_eq!(result.foundation_type, FoundationType::Basement);
        assert_eq!(result.year_built, "1924");
        assert_eq!(result.tax_history, "Not available");
        assert_eq!(
            result.grounding_sources,
            vec![GroundingSource {
                uri: "a".to_string(),
                title: "A".to_string()
            }]
        );
        assert_eq!(
            result.map_link,
            "https://www.google.com/maps/search/?api=1&query=123%20Maple%20Ave%2C%20Springfield%2C%20IL"
        );
    }

    #[test]
    fn test_empty_envelope_defaults() {
        let envelope: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(envelope.text().is_none());
        assert!(envelope.grounding_chunks().is_empty());

        let result = envelope.into_result("1 Main St");
        assert_eq!(result.listing_status, "Unknown");
        assert!(result.grounding_sources.is_empty());
    }
}
