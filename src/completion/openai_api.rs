use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, error, info};

use super::model_family;
use super::{CompletionBackend, CompletionError, CompletionRequest};
use async_trait::async_trait;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    r#type: Option<String>,
    code: Option<String>,
}

/// Chat-completions backend against the OpenAI API.
pub struct OpenAiBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl OpenAiBackend {
    pub fn new(api_key: Option<String>, endpoint: Option<String>) -> Self {
        let client = reqwest::Client::new();
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        info!("Initialized OpenAI backend with endpoint: {}", endpoint);

        Self {
            client,
            endpoint,
            api_key,
        }
    }

    /// Map a request to the wire body, selecting the token-limit parameter
    /// name by model family and dropping temperature where unsupported.
    fn wire_body(request: &CompletionRequest) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| json!({ "role": m.role, "content": m.content }))
            .collect();

        let mut body = Map::new();
        body.insert("model".to_string(), json!(request.model));
        body.insert("messages".to_string(), json!(messages));
        body.insert(
            model_family::token_param_name(&request.model).to_string(),
            json!(request.max_output_tokens),
        );
        if let Some(temperature) = request.temperature {
            if model_family::supports_temperature(&request.model) {
                body.insert("temperature".to_string(), json!(temperature));
            }
        }
        Value::Object(body)
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "OpenAI API"
    }

    fn is_available(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let api_key = self.api_key.as_deref().unwrap_or_default();
        let body = Self::wire_body(request);

        debug!("Sending completion request for model {}", request.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!(
                "Completion request failed with status {}: {}",
                status, response_text
            );

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&response_text) {
                return Err(CompletionError::Api {
                    status: status.as_u16(),
                    message: format!(
                        "{} (type: {:?}, code: {:?})",
                        error_response.error.message,
                        error_response.error.r#type,
                        error_response.error.code
                    ),
                });
            }

            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: response_text,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&response_text)
            .map_err(|e| CompletionError::Malformed(format!("invalid response JSON: {e}")))?;

        let content = parsed
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| CompletionError::Malformed("response had no content".to_string()))?;

        debug!("Completion response preview: {:.100}", content);

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::Message;

    fn request(model: &str, temperature: Option<f32>) -> CompletionRequest {
        CompletionRequest {
            model: model.to_string(),
            messages: vec![Message::system("s"), Message::user("u")],
            max_output_tokens: 800,
            temperature,
        }
    }

    #[test]
    fn wire_body_uses_max_tokens_for_older_models() {
        let body = OpenAiBackend::wire_body(&request("gpt-3.5-turbo", Some(0.3)));
        assert_eq!(body["max_tokens"], 800);
        assert!(body.get("max_completion_tokens").is_none());
        assert_eq!(body["temperature"], 0.3);
    }

    #[test]
    fn wire_body_uses_max_completion_tokens_for_newer_models() {
        let body = OpenAiBackend::wire_body(&request("gpt-4o", Some(0.3)));
        assert_eq!(body["max_completion_tokens"], 800);
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn wire_body_drops_temperature_for_o3_mini() {
        let body = OpenAiBackend::wire_body(&request("o3-mini", Some(0.3)));
        assert!(body.get("temperature").is_none());
        assert_eq!(body["max_completion_tokens"], 800);
    }

    #[test]
    fn backend_unavailable_without_key() {
        assert!(!OpenAiBackend::new(None, None).is_available());
        assert!(!OpenAiBackend::new(Some(String::new()), None).is_available());
        assert!(OpenAiBackend::new(Some("sk-test".to_string()), None).is_available());
    }
}
