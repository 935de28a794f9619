use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ChatConfig;
use crate::error::{KnowledgeError, KnowledgeResult};
use crate::models::ChatMessage;

/// The language-model call at the end of the pipeline
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, messages: &[ChatMessage]) -> KnowledgeResult<String>;
}

/// OpenAI-compatible `/chat/completions` client
pub struct OpenAIChatGenerator {
    client: Client,
    config: ChatConfig,
}

impl OpenAIChatGenerator {
    pub fn new(config: ChatConfig) -> KnowledgeResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| KnowledgeError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
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

#[async_trait]
impl Generator for OpenAIChatGenerator {
    async fn generate(&self, messages: &[ChatMessage]) -> KnowledgeResult<String> {
        let request = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| KnowledgeError::Generation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(KnowledgeError::Generation(format!(
                "OpenAI API error {}: {}",
                status, body
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| KnowledgeError::Generation(format!("Failed to parse response: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(KnowledgeError::Generation(
                "model returned an empty answer".to_string(),
            ));
        }

        debug!(model = %self.config.model, chars = content.len(), "Generated answer");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn generator(base_url: String) -> OpenAIChatGenerator {
        OpenAIChatGenerator::new(ChatConfig::new("sk-test").with_base_url(base_url)).unwrap()
    }

    fn messages() -> Vec<ChatMessage> {
        vec![ChatMessage::system("be helpful"), ChatMessage::user("hi")]
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "max_tokens": 512,
                "messages": [
                    { "role": "system", "content": "be helpful" },
                    { "role": "user", "content": "hi" }
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{ "message": { "role": "assistant", "content": " Hello! " } }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let answer = generator(server.url()).generate(&messages()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(answer, "Hello!");
    }

    #[tokio::test]
    async fn test_empty_answer_is_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "choices": [{ "message": { "content": "  " } }] }).to_string())
            .create_async()
            .await;

        let err = generator(server.url())
            .generate(&messages())
            .await
            .unwrap_err();

        assert!(matches!(err, KnowledgeError::Generation(_)));
    }

    #[tokio::test]
    async fn test_api_error_is_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let err = generator(server.url())
            .generate(&messages())
            .await
            .unwrap_err();

        assert!(matches!(err, KnowledgeError::Generation(ref msg) if msg.contains("429")));
    }
}
