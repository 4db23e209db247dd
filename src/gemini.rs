//! Gemini `generateContent` wire types and HTTP client.
//!
//! The generation endpoint is a stateless REST call: one JSON POST per
//! request, one JSON reply. Only the first candidate's first text part is
//! consumed.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Content container used in both requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A single-part user message.
    pub fn user(text: String) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part { text: Some(text) }],
        }
    }
}

/// One content part. Replies may carry parts without a text field; those
/// are treated as unusable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Structured-output constraints sent with a request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// Top-level reply envelope. Defaults keep a structurally thin reply
/// decodable so it can be classified as empty rather than malformed.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One proposed completion.
#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Extract `candidates[0].content.parts[0].text`, if present.
    pub fn first_candidate_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Failure modes of one generation attempt. Nothing is retried.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned {0}")]
    Status(StatusCode),
    #[error("reply contained no usable text")]
    EmptyReply,
}

/// Client for the generateContent endpoint. Cheap to clone; one clone is
/// handed to each in-flight request task.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Issue a single generation request and extract the reply text.
    ///
    /// One attempt, no timeout beyond the transport defaults, no retry.
    pub async fn generate(&self, request: &GenerateContentRequest) -> Result<String, GenerateError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        debug!(model = %self.model, "generate_request");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "generate_http_error");
            return Err(GenerateError::Status(status));
        }

        let reply: GenerateContentResponse = response.json().await?;
        reply
            .first_candidate_text()
            .ok_or(GenerateError::EmptyReply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_first_candidate_text_extracted_verbatim() {
        let reply = decode(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"<div>x</div>"}]}}]}"#,
        );
        assert_eq!(reply.first_candidate_text().as_deref(), Some("<div>x</div>"));
    }

    #[test]
    fn test_only_first_part_is_consumed() {
        let reply = decode(
            r#"{"candidates":[{"content":{"parts":[{"text":"first"},{"text":"second"}]}}]}"#,
        );
        assert_eq!(reply.first_candidate_text().as_deref(), Some("first"));
    }

    #[test]
    fn test_zero_candidates_yields_none() {
        let reply = decode(r#"{"candidates":[]}"#);
        assert!(reply.first_candidate_text().is_none());

        let reply = decode(r#"{}"#);
        assert!(reply.first_candidate_text().is_none());
    }

    #[test]
    fn test_candidate_without_text_field_yields_none() {
        // Candidate present but the expected text field is missing
        let reply = decode(r#"{"candidates":[{"content":{"parts":[{}]}}]}"#);
        assert!(reply.first_candidate_text().is_none());

        let reply = decode(r#"{"candidates":[{"content":{"parts":[]}}]}"#);
        assert!(reply.first_candidate_text().is_none());

        let reply = decode(r#"{"candidates":[{}]}"#);
        assert!(reply.first_candidate_text().is_none());
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content::user("hello".to_string())],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: serde_json::json!({"type": "OBJECT"}),
            }),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_request_omits_absent_generation_config() {
        let request = GenerateContentRequest {
            contents: vec![Content::user("hello".to_string())],
            generation_config: None,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("generationConfig").is_none());
    }
}
