mod openai;
mod provider;
mod workers_ai;

pub use openai::{OpenAIConfig, OpenAIProvider};
pub use provider::EmbeddingProvider;
pub use workers_ai::{WorkersAiConfig, WorkersAiProvider};

use crate::error::{VectorError, VectorResult};
use crate::models::EmbeddingModel;

/// Rejects a model that the provider cannot serve.
pub(crate) fn ensure_provider(
    model: EmbeddingModel,
    expected: crate::models::EmbeddingProviderType,
) -> VectorResult<()> {
    if model.provider() == expected {
        Ok(())
    } else {
        Err(VectorError::Validation(format!(
            "model {} is not served by {:?}",
            model, expected
        )))
    }
}
