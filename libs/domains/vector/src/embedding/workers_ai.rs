use std::time::Duration;

use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or, env_required};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{EmbeddingProvider, ensure_provider};
use crate::error::{VectorError, VectorResult};
use crate::models::{EmbeddingModel, EmbeddingProviderType, EmbeddingResult};

const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Cloudflare Workers AI configuration
#[derive(Debug, Clone, PartialEq)]
pub struct WorkersAiConfig {
    pub account_id: String,
    pub api_token: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl WorkersAiConfig {
    pub fn new(account_id: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn run_url(&self, model: EmbeddingModel) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.base_url,
            self.account_id,
            model.model_name()
        )
    }
}

impl FromEnv for WorkersAiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            account_id: env_required("CLOUDFLARE_ACCOUNT_ID")?,
            api_token: env_required("CLOUDFLARE_API_TOKEN")?,
            base_url: env_or_default("CLOUDFLARE_AI_BASE_URL", DEFAULT_BASE_URL),
            timeout_secs: env_parse_or("EMBEDDING_TIMEOUT_SECS", 10)?,
        })
    }
}

/// Workers AI text-embedding provider (`@cf/baai/bge-*` models)
pub struct WorkersAiProvider {
    client: Client,
    config: WorkersAiConfig,
}

impl WorkersAiProvider {
    pub fn new(config: WorkersAiConfig) -> VectorResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VectorError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> VectorResult<Self> {
        Self::new(WorkersAiConfig::from_env()?)
    }
}

#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    text: &'a [String],
}

#[derive(Debug, Deserialize)]
struct RunResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<RunResult>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Workers AI either answers inline or hands back a request id for a queued job.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RunResult {
    Queued {
        request_id: String,
    },
    Inline {
        #[serde(default)]
        shape: Vec<usize>,
        data: Vec<Vec<f32>>,
    },
}

fn describe_errors(errors: &[ApiMessage]) -> String {
    if errors.is_empty() {
        return "no error details".to_string();
    }
    errors
        .iter()
        .map(|e| format!("{}: {}", e.code, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[async_trait]
impl EmbeddingProvider for WorkersAiProvider {
    fn provider_type(&self) -> EmbeddingProviderType {
        EmbeddingProviderType::WorkersAi
    }

    async fn embed(&self, model: EmbeddingModel, text: &str) -> VectorResult<EmbeddingResult> {
        let results = self.embed_batch(model, &[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| VectorError::Embedding("No embedding returned".to_string()))
    }

    async fn embed_batch(
        &self,
        model: EmbeddingModel,
        texts: &[String],
    ) -> VectorResult<Vec<EmbeddingResult>> {
        ensure_provider(model, EmbeddingProviderType::WorkersAi)?;

        if texts.is_empty() {
            return Ok(vec![]);
        }

        let response = self
            .client
            .post(self.config.run_url(model))
            .bearer_auth(&self.config.api_token)
            .json(&RunRequest { text: texts })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(VectorError::Embedding(format!(
                "Workers AI error ({}): {}",
                status, error_text
            )));
        }

        let body: RunResponse = response.json().await?;
        if !body.success {
            return Err(VectorError::Embedding(format!(
                "Workers AI reported failure: {}",
                describe_errors(&body.errors)
            )));
        }

        match body.result {
            Some(RunResult::Inline { shape, data }) => {
                if data.len() != texts.len() || data.iter().any(|v| v.is_empty()) {
                    return Err(VectorError::Embedding(format!(
                        "expected {} embeddings, got {} (shape {:?})",
                        texts.len(),
                        data.len(),
                        shape
                    )));
                }
                debug!(model = %model, count = data.len(), "Workers AI embeddings received");
                Ok(data
                    .into_iter()
                    .map(|values| EmbeddingResult::new(values, 0))
                    .collect())
            }
            Some(RunResult::Queued { request_id }) => {
                warn!(model = %model, %request_id, "Workers AI queued the embedding request");
                Err(VectorError::EmbeddingDeferred(request_id))
            }
            None => Err(VectorError::Embedding(
                "Workers AI returned no result".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    const RUN_PATH: &str = "/accounts/acc-1/ai/run/@cf/baai/bge-base-en-v1.5";

    fn provider(base_url: String) -> WorkersAiProvider {
        WorkersAiProvider::new(WorkersAiConfig::new("acc-1", "cf-token").with_base_url(base_url))
            .unwrap()
    }

    #[tokio::test]
    async fn test_embed_inline_result() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", RUN_PATH)
            .match_header("authorization", "Bearer cf-token")
            .match_body(Matcher::Json(json!({ "text": ["refund policy"] })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "success": true,
                    "errors": [],
                    "result": { "shape": [1, 3], "data": [[0.5, 0.25, 0.125]] }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let result = provider(server.url())
            .embed(EmbeddingModel::BgeBaseEnV15, "refund policy")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.values, vec![0.5, 0.25, 0.125]);
        assert_eq!(result.dimension, 3);
    }

    #[test]
    fn test_run_result_variants() {
        let queued: RunResponse = serde_json::from_value(json!({
            "success": true,
            "errors": [],
            "result": { "request_id": "req-42" }
        }))
        .unwrap();
        assert!(matches!(queued.result, Some(RunResult::Queued { ref request_id }) if request_id == "req-42"));

        let inline: RunResponse = serde_json::from_value(json!({
            "success": true,
            "errors": [],
            "result": { "shape": [1, 2], "data": [[0.5, 0.25]] }
        }))
        .unwrap();
        assert!(matches!(inline.result, Some(RunResult::Inline { ref data, .. }) if data.len() == 1));
    }

    #[tokio::test]
    async fn test_queued_result_is_deferred_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", RUN_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "success": true,
                    "errors": [],
                    "result": { "request_id": "req-42" }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let err = provider(server.url())
            .embed(EmbeddingModel::BgeBaseEnV15, "hi")
            .await
            .unwrap_err();

        assert!(matches!(err, VectorError::EmbeddingDeferred(ref id) if id == "req-42"));
    }

    #[tokio::test]
    async fn test_empty_data_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", RUN_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "success": true,
                    "errors": [],
                    "result": { "shape": [0], "data": [] }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let err = provider(server.url())
            .embed(EmbeddingModel::BgeBaseEnV15, "hi")
            .await
            .unwrap_err();

        assert!(matches!(err, VectorError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", RUN_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "success": false,
                    "errors": [{ "code": 5007, "message": "model not found" }],
                    "result": null
                })
                .to_string(),
            )
            .create_async()
            .await;

        let err = provider(server.url())
            .embed(EmbeddingModel::BgeBaseEnV15, "hi")
            .await
            .unwrap_err();

        assert!(matches!(err, VectorError::Embedding(ref msg) if msg.contains("model not found")));
    }

    #[tokio::test]
    async fn test_http_error_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", RUN_PATH)
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let err = provider(server.url())
            .embed(EmbeddingModel::BgeBaseEnV15, "hi")
            .await
            .unwrap_err();

        assert!(matches!(err, VectorError::Embedding(ref msg) if msg.contains("401")));
    }

    #[tokio::test]
    async fn test_rejects_openai_model() {
        let server = mockito::Server::new_async().await;
        let err = provider(server.url())
            .embed(EmbeddingModel::TextEmbedding3Small, "hi")
            .await
            .unwrap_err();

        assert!(matches!(err, VectorError::Validation(_)));
    }

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("CLOUDFLARE_ACCOUNT_ID", Some("acc-9")),
                ("CLOUDFLARE_API_TOKEN", Some("tok")),
                ("CLOUDFLARE_AI_BASE_URL", None),
                ("EMBEDDING_TIMEOUT_SECS", None),
            ],
            || {
                let config = WorkersAiConfig::from_env().unwrap();
                assert_eq!(config.account_id, "acc-9");
                assert_eq!(config.api_token, "tok");
                assert_eq!(config.base_url, DEFAULT_BASE_URL);
                assert_eq!(config.timeout_secs, 10);
                assert_eq!(
                    config.run_url(EmbeddingModel::BgeSmallEnV15),
                    "https://api.cloudflare.com/client/v4/accounts/acc-9/ai/run/@cf/baai/bge-small-en-v1.5"
                );
            },
        );
    }

    #[test]
    fn test_config_requires_token() {
        temp_env::with_vars(
            [
                ("CLOUDFLARE_ACCOUNT_ID", Some("acc-9")),
                ("CLOUDFLARE_API_TOKEN", None),
            ],
            || {
                assert!(WorkersAiConfig::from_env().is_err());
            },
        );
    }
}
