//! Plan requesters: the mock template and the Anthropic Messages API client.

use crate::config::secrets::SecretString;
use crate::config::toml_config::LlmConfig;
use crate::core::prompt::{build_prompt, mock_plan};
use crate::domain::model::PlanRequest;
use crate::domain::ports::PlanRequester;
use crate::utils::error::{PlanError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, Default)]
pub struct MockPlanRequester;

#[async_trait]
impl PlanRequester for MockPlanRequester {
    fn kind(&self) -> &'static str {
        "mock"
    }

    async fn request_plan(&self, request: &PlanRequest) -> Result<String> {
        tracing::debug!("Generating mock plan for {}", request.name);
        Ok(mock_plan(request))
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

/// Anthropic 錯誤回應只取 type 與 message，其他內容原樣保留
fn describe_api_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => format!(
            "API returned status {}: {} ({})",
            status, parsed.error.message, parsed.error.kind
        ),
        Err(_) => format!("API returned status {}", status),
    }
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

pub struct ClaudePlanRequester {
    client: Client,
    endpoint: String,
    api_key: SecretString,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ClaudePlanRequester {
    pub fn new(config: &LlmConfig, api_key: SecretString) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/v1/messages", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn extract_text(response: MessagesResponse) -> Option<String> {
        let text = response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[async_trait]
impl PlanRequester for ClaudePlanRequester {
    fn kind(&self) -> &'static str {
        "claude"
    }

    async fn request_plan(&self, request: &PlanRequest) -> Result<String> {
        let prompt = build_prompt(request);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        tracing::debug!("Making API request to: {} (model {})", self.endpoint, self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("⚠️ LLM request failed: {}", e);
                PlanError::unavailable(if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    e.to_string()
                })
            })?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!("⚠️ LLM API returned {}: {}", status, detail);
            return Err(PlanError::unavailable(describe_api_error(status, &detail)));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| PlanError::unavailable(format!("malformed API response: {}", e)))?;

        Self::extract_text(parsed)
            .ok_or_else(|| PlanError::unavailable("API response contained no text"))
    }
}

/// Claude when a key is configured, the mock template otherwise.
pub fn planner_from_config(
    config: &LlmConfig,
    api_key: Option<SecretString>,
) -> Result<Box<dyn PlanRequester>> {
    match api_key {
        Some(key) => {
            tracing::info!("🤖 Using Claude planner (model {})", config.model);
            Ok(Box::new(ClaudePlanRequester::new(config, key)?))
        }
        None => {
            tracing::info!("🧪 No API key configured, using mock planner");
            Ok(Box::new(MockPlanRequester))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Goal;
    use httpmock::prelude::*;

    fn request() -> PlanRequest {
        PlanRequest {
            name: "Sara".to_string(),
            goal: Goal::LoseWeight,
            fasting_sugar: 100,
            pre_meal_sugar: 115,
            post_meal_sugar: 170,
            dietary_preferences: "pescatarian".to_string(),
            exclusions: "dairy".to_string(),
        }
    }

    fn config_for(server: &MockServer) -> LlmConfig {
        LlmConfig {
            base_url: server.base_url(),
            ..LlmConfig::default()
        }
    }

    #[tokio::test]
    async fn test_mock_requester_is_deterministic() {
        let requester = MockPlanRequester;
        let first = requester.request_plan(&request()).await.unwrap();
        let second = requester.request_plan(&request()).await.unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("Hi Sara,"));
    }

    #[tokio::test]
    async fn test_claude_requester_joins_text_blocks() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/messages")
                .header("x-api-key", "sk-test")
                .header("anthropic-version", ANTHROPIC_VERSION);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "content": [
                        {"type": "text", "text": "Breakfast: oats"},
                        {"type": "text", "text": "Lunch: salad"}
                    ]
                }));
        });

        let requester =
            ClaudePlanRequester::new(&config_for(&server), SecretString::new("sk-test")).unwrap();
        let plan = requester.request_plan(&request()).await.unwrap();

        api_mock.assert();
        assert_eq!(plan, "Breakfast: oats\nLunch: salad");
    }

    #[tokio::test]
    async fn test_claude_requester_server_error_is_unavailable() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(500).body("overloaded");
        });

        let requester =
            ClaudePlanRequester::new(&config_for(&server), SecretString::new("sk-test")).unwrap();
        let err = requester.request_plan(&request()).await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, PlanError::PlanUnavailable { .. }));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_claude_requester_reports_api_error_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(401).json_body(serde_json::json!({
                "type": "error",
                "error": {"type": "authentication_error", "message": "invalid x-api-key"}
            }));
        });

        let requester =
            ClaudePlanRequester::new(&config_for(&server), SecretString::new("sk-bad")).unwrap();
        match requester.request_plan(&request()).await {
            Err(PlanError::PlanUnavailable { reason }) => {
                assert!(reason.contains("401"));
                assert!(reason.contains("invalid x-api-key (authentication_error)"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_describe_api_error_without_json_body() {
        let reason = describe_api_error(reqwest::StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(reason, "API returned status 502 Bad Gateway");
    }

    #[tokio::test]
    async fn test_claude_requester_empty_content_is_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(200).json_body(serde_json::json!({ "content": [] }));
        });

        let requester =
            ClaudePlanRequester::new(&config_for(&server), SecretString::new("sk-test")).unwrap();
        let err = requester.request_plan(&request()).await.unwrap_err();
        assert!(matches!(err, PlanError::PlanUnavailable { .. }));
    }

    #[test]
    fn test_planner_selection() {
        let config = LlmConfig::default();
        assert_eq!(planner_from_config(&config, None).unwrap().kind(), "mock");
        assert_eq!(
            planner_from_config(&config, Some(SecretString::new("sk")))
                .unwrap()
                .kind(),
            "claude"
        );
    }
}
