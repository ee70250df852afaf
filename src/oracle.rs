use crate::config::OracleConfig;
use crate::error::OracleError;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// An external text-translation service.
///
/// One call carries a whole batch; the orchestrator owns prompting and
/// response parsing, so an oracle only moves text back and forth.
pub trait TranslationOracle {
    fn submit(
        &self,
        system_instruction: &str,
        user_prompt: &str,
    ) -> impl Future<Output = Result<String, OracleError>> + Send;
}

/// OpenAI Chat Completion request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Check if a model is a reasoning model that doesn't support temperature
fn is_reasoning_model(model: &str) -> bool {
    model.starts_with("gpt-5")
        || model.starts_with("o1")
        || model.starts_with("o3")
        || model.starts_with("o4")
}

/// Oracle backed by an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiOracle {
    client: reqwest::Client,
    config: OracleConfig,
}

impl OpenAiOracle {
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OracleError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn request<'a>(&'a self, system_instruction: &'a str, user_prompt: &'a str) -> ChatRequest<'a> {
        // Reasoning models don't support temperature - use reasoning_effort instead
        let is_reasoning = is_reasoning_model(&self.config.model);
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system_instruction,
                },
                Message {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: if is_reasoning {
                None
            } else {
                Some(self.config.temperature)
            },
            reasoning_effort: if is_reasoning { Some("low") } else { None },
        }
    }
}

impl TranslationOracle for OpenAiOracle {
    async fn submit(&self, system_instruction: &str, user_prompt: &str) -> Result<String, OracleError> {
        let request = self.request(system_instruction, user_prompt);

        let response = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout(self.config.timeout)
                } else {
                    OracleError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            let status = status.as_u16();
            return Err(match status {
                401 | 403 => OracleError::Auth { status, body },
                _ => OracleError::Status { status, body },
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Decode(e.to_string()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(OracleError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn create_test_config(api_url: &str, model: &str) -> OracleConfig {
        OracleConfig {
            api_key: "test-openai-key".to_string(),
            model: model.to_string(),
            api_url: api_url.to_string(),
            temperature: 0.3,
            timeout: Duration::from_secs(5),
        }
    }

    fn create_openai_response(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [
                {
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": content
                    },
                    "finish_reason": "stop"
                }
            ]
        })
    }

    async fn oracle_for(mock_server: &MockServer, model: &str) -> OpenAiOracle {
        let config = create_test_config(
            &format!("{}/v1/chat/completions", mock_server.uri()),
            model,
        );
        OpenAiOracle::new(config).unwrap()
    }

    #[test]
    fn test_is_reasoning_model() {
        assert!(is_reasoning_model("gpt-5-mini"));
        assert!(is_reasoning_model("o1-preview"));
        assert!(is_reasoning_model("o3"));
        assert!(is_reasoning_model("o4-mini"));
        assert!(!is_reasoning_model("gpt-4.1-mini"));
        assert!(!is_reasoning_model("gpt-4o"));
    }

    #[test]
    fn test_request_serialization() {
        let oracle = OpenAiOracle::new(create_test_config("http://unused", "gpt-4.1-mini")).unwrap();
        let json = serde_json::to_string(&oracle.request("sys", "user")).unwrap();

        assert!(json.contains("gpt-4.1-mini"));
        assert!(json.contains("0.3"));
        assert!(json.contains(r#""role":"system""#));
        assert!(json.contains(r#""role":"user""#));
        assert!(!json.contains("reasoning_effort"));
    }

    #[test]
    fn test_request_serialization_reasoning_model() {
        let oracle = OpenAiOracle::new(create_test_config("http://unused", "gpt-5-mini")).unwrap();
        let json = serde_json::to_string(&oracle.request("sys", "user")).unwrap();

        assert!(json.contains(r#""reasoning_effort":"low""#));
        assert!(!json.contains("temperature"));
    }

    #[tokio::test]
    async fn test_submit_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-openai-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4.1-mini",
                "messages": [
                    {"role": "system", "content": "Translate to French."},
                    {"role": "user", "content": "1. Save changes"}
                ]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(create_openai_response("1. Enregistrer les modifications")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let oracle = oracle_for(&mock_server, "gpt-4.1-mini").await;
        let result = oracle
            .submit("Translate to French.", "1. Save changes")
            .await
            .unwrap();

        assert_eq!(result, "1. Enregistrer les modifications");
    }

    #[tokio::test]
    async fn test_submit_auth_failure_is_fatal() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"error": {"message": "Invalid API key"}}"#),
            )
            .mount(&mock_server)
            .await;

        let oracle = oracle_for(&mock_server, "gpt-4.1-mini").await;
        let err = oracle.submit("sys", "user").await.unwrap_err();

        assert!(matches!(err, OracleError::Auth { status: 401, .. }));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_submit_server_error_is_retryable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service unavailable"))
            .mount(&mock_server)
            .await;

        let oracle = oracle_for(&mock_server, "gpt-4.1-mini").await;
        let err = oracle.submit("sys", "user").await.unwrap_err();

        assert!(matches!(err, OracleError::Status { status: 503, .. }));
        assert!(err.is_retryable());
        assert!(err.to_string().contains("Service unavailable"));
    }

    #[tokio::test]
    async fn test_submit_empty_choices() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&mock_server)
            .await;

        let oracle = oracle_for(&mock_server, "gpt-4.1-mini").await;
        let err = oracle.submit("sys", "user").await.unwrap_err();

        assert!(matches!(err, OracleError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_submit_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let oracle = oracle_for(&mock_server, "gpt-4.1-mini").await;
        let err = oracle.submit("sys", "user").await.unwrap_err();

        assert!(matches!(err, OracleError::Decode(_)));
    }

    #[tokio::test]
    async fn test_submit_client_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(create_openai_response("late"))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let mut config = create_test_config(
            &format!("{}/v1/chat/completions", mock_server.uri()),
            "gpt-4.1-mini",
        );
        config.timeout = Duration::from_millis(200);
        let oracle = OpenAiOracle::new(config).unwrap();

        let err = oracle.submit("sys", "user").await.unwrap_err();
        assert!(matches!(err, OracleError::Timeout(_)));
    }
}
