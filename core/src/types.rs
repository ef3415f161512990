use serde::{Deserialize, Serialize};

/// Helper struct to encapsulate model details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct GeminiModel {
    pub api_key: String,
    pub model_name: String,
}

impl GeminiModel {
    pub fn new(api_key: String, model_name: Option<String>) -> Self {
        Self {
            api_key,
            model_name: model_name.unwrap_or_else(|| crate::config::DEFAULT_MODEL.to_string()),
        }
    }
}

/// Request to Gemini API to generate content
#[derive(Serialize, Debug)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<SafetySetting>,
}

/// Content structure for requests and responses
#[derive(Serialize, Clone, Debug, Deserialize, PartialEq)]
pub struct Content {
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Part structure for a piece of content
#[derive(Serialize, Clone, Debug, Deserialize, PartialEq)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn text(text: String) -> Self {
        Self { text: Some(text) }
    }
}

/// Generation configuration options
#[derive(Serialize, Debug, Default, Clone, PartialEq)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

/// Per-category content filter sent along with a request
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

impl SafetySetting {
    pub fn new(category: &str, threshold: &str) -> Self {
        Self {
            category: category.to_string(),
            threshold: threshold.to_string(),
        }
    }

    /// Blocks hate speech and harassment at the lowest probability level.
    pub fn strict_defaults() -> Vec<Self> {
        vec![
            Self::new("HARM_CATEGORY_HATE_SPEECH", "BLOCK_LOW_AND_ABOVE"),
            Self::new("HARM_CATEGORY_HARASSMENT", "BLOCK_LOW_AND_ABOVE"),
        ]
    }
}

/// Response from Gemini API
#[derive(Deserialize, Debug, Serialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Candidate in the response
#[derive(Deserialize, Debug, Serialize)]
pub struct Candidate {
    pub content: Option<ContentResponsePart>,
    #[serde(rename = "finishReason", skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Content part in the response
#[derive(Deserialize, Debug, Serialize)]
pub struct ContentResponsePart {
    #[serde(default)]
    pub parts: Vec<PartResponse>,
    pub role: Option<String>,
}

/// Part response from the API
#[derive(Deserialize, Debug, Serialize)]
pub struct PartResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_skips_empty_fields() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text("hi".to_string())],
                role: Some("user".to_string()),
            }],
            system_instruction: None,
            generation_config: None,
            safety_settings: Vec::new(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({ "contents": [{ "parts": [{ "text": "hi" }], "role": "user" }] })
        );
    }

    #[test]
    fn test_response_with_finish_reason_only() {
        let body = json!({ "candidates": [{ "finishReason": "SAFETY" }] });
        let response: GenerateContentResponse = serde_json::from_value(body).unwrap();

        assert_eq!(response.candidates.len(), 1);
        assert!(response.candidates[0].content.is_none());
        assert_eq!(response.candidates[0].finish_reason.as_deref(), Some("SAFETY"));
    }
}
