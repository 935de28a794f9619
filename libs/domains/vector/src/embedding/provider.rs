use async_trait::async_trait;

use crate::error::VectorResult;
use crate::models::{EmbeddingModel, EmbeddingProviderType, EmbeddingResult};

/// Trait for embedding generation providers
///
/// One call, no retries. Timeouts and deferred answers surface as errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn provider_type(&self) -> EmbeddingProviderType;

    /// Generate embedding for a single text
    async fn embed(&self, model: EmbeddingModel, text: &str) -> VectorResult<EmbeddingResult>;

    /// Generate embeddings for multiple texts, in input order
    async fn embed_batch(
        &self,
        model: EmbeddingModel,
        texts: &[String],
    ) -> VectorResult<Vec<EmbeddingResult>>;
}
