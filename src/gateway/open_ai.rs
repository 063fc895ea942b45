use crate::config::ProviderConfig;
use crate::error::RecipeError;
use crate::gateway::CompletionGateway;
use crate::model::PromptBundle;
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

pub struct OpenAIGateway {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f64,
}

impl std::fmt::Debug for OpenAIGateway {
    // Keeps the credential out of debug output
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIGateway")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl OpenAIGateway {
    /// Create a new OpenAI gateway from configuration
    ///
    /// The credential must already be present in `config.api_key`; nothing
    /// is read from the environment here.
    pub fn new(config: &ProviderConfig) -> Result<Self, RecipeError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(RecipeError::MissingCredential)?
            .to_string();

        let mut builder = Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| RecipeError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(OpenAIGateway {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Create a gateway with an explicit credential and otherwise default settings
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, RecipeError> {
        Self::new(&ProviderConfig::with_api_key(api_key))
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, RecipeError> {
        let mut config = ProviderConfig::with_api_key(api_key);
        config.base_url = base_url.to_string();
        Self::new(&config)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, prompts: &PromptBundle) -> Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": prompts.system_prompt()},
                {"role": "user", "content": prompts.user_prompt()}
            ],
            "temperature": self.temperature
        })
    }
}

#[async_trait]
impl CompletionGateway for OpenAIGateway {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, prompts: &PromptBundle) -> Result<String, RecipeError> {
        info!("Requesting recipe completion (model: {})", self.model);

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.request_body(prompts))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The body is only used to enrich the message
            let body = response.text().await.unwrap_or_default();
            let message = upstream_error_message(status, &body);
            warn!("Completion request failed: {}", message);
            return Err(RecipeError::UpstreamStatus {
                code: status.as_u16(),
                message,
            });
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);
        extract_content(&response_body)
    }
}

/// Pull the first choice's message content out of a chat completion body.
fn extract_content(response_body: &Value) -> Result<String, RecipeError> {
    let first_choice = response_body["choices"]
        .as_array()
        .and_then(|choices| choices.first())
        .ok_or(RecipeError::EmptyCompletion)?;

    first_choice["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or(RecipeError::EmptyCompletion)
}

/// `API error: <code> - <reason>`, plus the provider's own message when the
/// body carries one in the usual `{"error": {"message": ...}}` shape.
fn upstream_error_message(status: StatusCode, body: &str) -> String {
    let mut message = format!(
        "API error: {} - {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
    );

    let detail = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        value["error"]["message"]
            .as_str()
            .or_else(|| value["error"].as_str())
            .map(str::to_string)
    });
    if let Some(detail) = detail.filter(|d| !d.trim().is_empty()) {
        message.push_str(": ");
        message.push_str(&detail);
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RecipeOptions, RecipeRequest};
    use crate::prompt;
    use mockito::{Matcher, Server};

    fn prompts() -> PromptBundle {
        prompt::assemble(&RecipeRequest::new(
            "pasta, tomatoes",
            "Vegetarian",
            "Performance",
            RecipeOptions::default(),
        ))
    }

    #[tokio::test]
    async fn test_complete() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer fake_api_key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "choices": [{
                        "message": {
                            "content": "<div class=\"recipe-container\"><h1 class=\"recipe-title\">Pasta Pomodoro</h1></div>"
                        }
                    }]
                }"#,
            )
            .create_async()
            .await;

        let gateway = OpenAIGateway::with_base_url("fake_api_key", &server.url()).unwrap();
        let result = gateway.complete(&prompts()).await.unwrap();
        assert_eq!(
            result,
            "<div class=\"recipe-container\"><h1 class=\"recipe-title\">Pasta Pomodoro</h1></div>"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_request_body_shape() {
        let prompts = prompts();
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::Json(json!({
                "model": "gpt-4-turbo",
                "messages": [
                    {"role": "system", "content": prompts.system_prompt()},
                    {"role": "user", "content": prompts.user_prompt()}
                ],
                "temperature": 0.7
            })))
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"content": "ok"}}]}"#)
            .create_async()
            .await;

        let gateway = OpenAIGateway::with_base_url("fake_api_key", &server.url()).unwrap();
        assert_eq!(gateway.complete(&prompts).await.unwrap(), "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_api_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"message": "Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let gateway = OpenAIGateway::with_base_url("fake_api_key", &server.url()).unwrap();
        let err = gateway.complete(&prompts()).await.unwrap_err();
        match err {
            RecipeError::UpstreamStatus { code, message } => {
                assert_eq!(code, 401);
                assert_eq!(
                    message,
                    "API error: 401 - Unauthorized: Incorrect API key provided"
                );
            }
            other => panic!("expected upstream status error, got {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_choices() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let gateway = OpenAIGateway::with_base_url("fake_api_key", &server.url()).unwrap();
        let err = gateway.complete(&prompts()).await.unwrap_err();
        assert!(matches!(err, RecipeError::EmptyCompletion));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_json_success_body_is_transport_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let gateway = OpenAIGateway::with_base_url("fake_api_key", &server.url()).unwrap();
        let err = gateway.complete(&prompts()).await.unwrap_err();
        assert!(matches!(err, RecipeError::Transport(_)), "got {:?}", err);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        // Accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let silent = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let mut config = ProviderConfig::with_api_key("fake_api_key");
        config.base_url = format!("http://{}", addr);
        config.timeout_secs = 1;
        let gateway = OpenAIGateway::new(&config).unwrap();

        let err = gateway.complete(&prompts()).await.unwrap_err();
        match err {
            RecipeError::Transport(message) => {
                assert!(message.starts_with("request timed out"), "{}", message)
            }
            other => panic!("expected transport error, got {:?}", other),
        }
        silent.abort();
    }

    #[test]
    fn test_missing_credential() {
        let config = ProviderConfig::default();
        assert!(matches!(
            OpenAIGateway::new(&config),
            Err(RecipeError::MissingCredential)
        ));
        assert!(matches!(
            OpenAIGateway::with_api_key("   "),
            Err(RecipeError::MissingCredential)
        ));
    }

    #[test]
    fn test_debug_hides_credential() {
        let gateway = OpenAIGateway::with_api_key("sk-secret").unwrap();
        assert!(!format!("{:?}", gateway).contains("sk-secret"));
    }

    #[test]
    fn test_extract_content_variants() {
        assert!(matches!(
            extract_content(&json!({})),
            Err(RecipeError::EmptyCompletion)
        ));
        assert!(matches!(
            extract_content(&json!({"choices": [{"message": {}}]})),
            Err(RecipeError::EmptyCompletion)
        ));
        assert_eq!(
            extract_content(&json!({"choices": [
                {"message": {"content": "first"}},
                {"message": {"content": "second"}}
            ]}))
            .unwrap(),
            "first"
        );
    }

    #[test]
    fn test_upstream_error_message_without_body() {
        assert_eq!(
            upstream_error_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "API error: 500 - Internal Server Error"
        );
        assert_eq!(
            upstream_error_message(StatusCode::BAD_REQUEST, r#"{"error": "Invalid request"}"#),
            "API error: 400 - Bad Request: Invalid request"
        );
    }
}
