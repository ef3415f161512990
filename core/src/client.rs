use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::{GeminiConfig, DEFAULT_API_BASE_URL};
use crate::errors::{GeminiError, GeminiResult};
use crate::session::Message;
use crate::types::*;

/// Anything that can answer a chat turn given the preceding history
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_message(&self, history: &[Message], user_text: &str) -> GeminiResult<String>;
}

/// Client for interacting with the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
    model: GeminiModel,
}

impl GeminiClient {
    /// Create a new Gemini API client
    pub fn new(config: GeminiConfig) -> GeminiResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GeminiError::ConfigError(
                    "API key is not set. Please set the GEMINI_API_KEY environment variable."
                        .to_string(),
                )
            })?;

        let model = GeminiModel::new(api_key, config.model_name.clone());

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            config,
            model,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model.model_name
    }

    /// Get the generateContent URL, without the key
    fn get_base_url(&self) -> String {
        let base = self
            .config
            .api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/');
        format!("{}/models/{}:generateContent", base, self.model.model_name)
    }

    /// Generate content using the Gemini API
    pub async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let url = self.get_base_url();
        debug!(url = %url, contents = request.contents.len(), "Calling generateContent");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.model.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiError::RequestError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.map_err(|e| {
                GeminiError::ResponseError(format!("Failed to read error response: {}", e))
            })?;

            return Err(GeminiError::HttpError {
                status_code: status.as_u16(),
                message: format!("API request failed: {}", error_body),
            });
        }

        let response_body = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GeminiError::ParsingError(format!("Failed to parse response: {}", e)))?;

        Ok(response_body)
    }

    /// Builds a request carrying the prior history, the new user turn, the
    /// persona instruction and the sampling parameters.
    pub(crate) fn create_chat_request(
        &self,
        history: &[Message],
        user_message: &str,
    ) -> GenerateContentRequest {
        let system_instruction = self.config.system_prompt.as_ref().map(|prompt| Content {
            parts: vec![Part::text(prompt.clone())],
            role: None,
        });

        let mut contents: Vec<Content> = history.iter().map(Message::to_content).collect();
        contents.push(Message::user(user_message).to_content());

        let generation = self.config.generation.clone().unwrap_or_default();

        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: Some(generation.to_generation_config()),
            safety_settings: self.config.resolved_safety_settings(),
        }
    }

    /// Helper method to extract text from a response
    ///
    /// All text parts of the first candidate are concatenated.
    pub fn extract_text_from_response(
        &self,
        response: &GenerateContentResponse,
    ) -> GeminiResult<String> {
        let candidate = response.candidates.first().ok_or_else(|| {
            GeminiError::ResponseError("No candidates in response".to_string())
        })?;

        let content = candidate.content.as_ref().ok_or_else(|| {
            GeminiError::ResponseError(match &candidate.finish_reason {
                Some(reason) => format!("No content in candidate (finish reason: {})", reason),
                None => "No content in candidate".to_string(),
            })
        })?;

        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();

        if text.is_empty() {
            return Err(GeminiError::ResponseError("No text in content".to_string()));
        }

        Ok(text)
    }
}

#[async_trait]
impl ChatBackend for GeminiClient {
    async fn send_message(&self, history: &[Message], user_text: &str) -> GeminiResult<String> {
        let request = self.create_chat_request(history, user_text);
        let response = self.generate_content(request).await?;
        self.extract_text_from_response(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SafetyPreset;
    use crate::persona::TRAVEL_MITRA_INSTRUCTION;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> GeminiConfig {
        GeminiConfig::travel_mitra().merge(&GeminiConfig {
            api_key: Some("test-key".to_string()),
            api_base_url: Some(base_url.to_string()),
            ..Default::default()
        })
    }

    fn text_reply(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }], "role": "model" },
                "finishReason": "STOP"
            }]
        })
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let result = GeminiClient::new(GeminiConfig::travel_mitra());
        assert!(matches!(result, Err(GeminiError::ConfigError(_))));

        let blank = GeminiConfig {
            api_key: Some("   ".to_string()),
            ..GeminiConfig::travel_mitra()
        };
        assert!(matches!(GeminiClient::new(blank), Err(GeminiError::ConfigError(_))));
    }

    #[test]
    fn test_chat_request_shape() {
        let client = GeminiClient::new(test_config("http://localhost")).unwrap();
        let history = vec![Message::user("Hi"), Message::model("Hello!")];

        let request = client.create_chat_request(&history, "Where should I go in May?");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value["contents"],
            json!([
                { "parts": [{ "text": "Hi" }], "role": "user" },
                { "parts": [{ "text": "Hello!" }], "role": "model" },
                { "parts": [{ "text": "Where should I go in May?" }], "role": "user" }
            ])
        );
        assert_eq!(
            value["system_instruction"]["parts"][0]["text"],
            json!(TRAVEL_MITRA_INSTRUCTION)
        );
        assert_eq!(value["generation_config"]["top_k"], json!(64));
        assert_eq!(value["generation_config"]["max_output_tokens"], json!(8192));
        assert_eq!(value["generation_config"]["response_mime_type"], json!("text/plain"));
        assert!(value.get("safety_settings").is_none());
    }

    #[test]
    fn test_chat_request_includes_safety_settings() {
        let config = GeminiConfig {
            safety: Some(SafetyPreset::Strict),
            ..test_config("http://localhost")
        };
        let client = GeminiClient::new(config).unwrap();

        let value = serde_json::to_value(client.create_chat_request(&[], "hi")).unwrap();
        assert_eq!(
            value["safety_settings"][0],
            json!({ "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_LOW_AND_ABOVE" })
        );
    }

    #[tokio::test]
    async fn test_send_message_posts_history_and_returns_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [
                    { "parts": [{ "text": "Plan Kerala" }], "role": "user" },
                    { "parts": [{ "text": "Sure!" }], "role": "model" },
                    { "parts": [{ "text": "5 days please" }], "role": "user" }
                ],
                "generation_config": { "top_k": 64 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_reply("Day 1: Kochi")))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config(&server.uri())).unwrap();
        let history = vec![Message::user("Plan Kerala"), Message::model("Sure!")];

        let reply = client.send_message(&history, "5 days please").await.unwrap();
        assert_eq!(reply, "Day 1: Kochi");
    }

    #[tokio::test]
    async fn test_http_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config(&server.uri())).unwrap();
        let err = client.send_message(&[], "hi").await.unwrap_err();

        match err {
            GeminiError::HttpError {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 429);
                assert!(message.contains("quota exceeded"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parsing_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config(&server.uri())).unwrap();
        let err = client.send_message(&[], "hi").await.unwrap_err();
        assert!(matches!(err, GeminiError::ParsingError(_)));
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let client = GeminiClient::new(test_config("http://localhost")).unwrap();
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hello, " }, { "text": "traveller" }] } }]
        }))
        .unwrap();

        assert_eq!(
            client.extract_text_from_response(&response).unwrap(),
            "Hello, traveller"
        );
    }

    #[test]
    fn test_extract_text_without_candidates() {
        let client = GeminiClient::new(test_config("http://localhost")).unwrap();
        let response = GenerateContentResponse { candidates: vec![] };
        assert!(matches!(
            client.extract_text_from_response(&response),
            Err(GeminiError::ResponseError(_))
        ));
    }
}
