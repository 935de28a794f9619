use std::sync::Arc;

use async_trait::async_trait;
use domain_vector::{EmbeddingModel, EmbeddingProvider};

use crate::error::{KnowledgeError, KnowledgeResult};

/// Turns a question into a query vector for the knowledge index
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> KnowledgeResult<Vec<f32>>;
}

/// [`QueryEmbedder`] over a hosted [`EmbeddingProvider`].
///
/// Vectors whose length differs from the model's dimension are rejected; the
/// index was built for exactly that dimension.
#[derive(Clone)]
pub struct ProviderEmbedder {
    provider: Arc<dyn EmbeddingProvider>,
    model: EmbeddingModel,
}

impl ProviderEmbedder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, model: EmbeddingModel) -> Self {
        Self { provider, model }
    }

    pub fn model(&self) -> EmbeddingModel {
        self.model
    }
}

#[async_trait]
impl QueryEmbedder for ProviderEmbedder {
    async fn embed(&self, text: &str) -> KnowledgeResult<Vec<f32>> {
        let result = self.provider.embed(self.model, text).await?;

        let expected = self.model.dimension() as usize;
        if result.values.len() != expected {
            return Err(KnowledgeError::Embedding(format!(
                "{} returned {} dimensions, expected {}",
                self.model,
                result.values.len(),
                expected
            )));
        }

        Ok(result.values)
    }
}
