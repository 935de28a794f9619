use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::VectorError;

/// Which hosted API serves an embedding model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmbeddingProviderType {
    OpenAI,
    WorkersAi,
}

/// Supported embedding models
///
/// The index is built for exactly one of these; query and document vectors
/// must come from the same model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmbeddingModel {
    /// OpenAI text-embedding-3-small (1536 dimensions)
    #[default]
    TextEmbedding3Small,
    /// OpenAI text-embedding-3-large (3072 dimensions)
    TextEmbedding3Large,
    /// OpenAI text-embedding-ada-002 (1536 dimensions)
    TextEmbeddingAda002,
    /// Workers AI @cf/baai/bge-small-en-v1.5 (384 dimensions)
    BgeSmallEnV15,
    /// Workers AI @cf/baai/bge-base-en-v1.5 (768 dimensions)
    BgeBaseEnV15,
    /// Workers AI @cf/baai/bge-large-en-v1.5 (1024 dimensions)
    BgeLargeEnV15,
}

impl EmbeddingModel {
    pub fn dimension(&self) -> u32 {
        match self {
            EmbeddingModel::TextEmbedding3Small => 1536,
            EmbeddingModel::TextEmbedding3Large => 3072,
            EmbeddingModel::TextEmbeddingAda002 => 1536,
            EmbeddingModel::BgeSmallEnV15 => 384,
            EmbeddingModel::BgeBaseEnV15 => 768,
            EmbeddingModel::BgeLargeEnV15 => 1024,
        }
    }

    /// Identifier the provider API expects
    pub fn model_name(&self) -> &'static str {
        match self {
            EmbeddingModel::TextEmbedding3Small => "text-embedding-3-small",
            EmbeddingModel::TextEmbedding3Large => "text-embedding-3-large",
            EmbeddingModel::TextEmbeddingAda002 => "text-embedding-ada-002",
            EmbeddingModel::BgeSmallEnV15 => "@cf/baai/bge-small-en-v1.5",
            EmbeddingModel::BgeBaseEnV15 => "@cf/baai/bge-base-en-v1.5",
            EmbeddingModel::BgeLargeEnV15 => "@cf/baai/bge-large-en-v1.5",
        }
    }

    pub fn provider(&self) -> EmbeddingProviderType {
        match self {
            EmbeddingModel::TextEmbedding3Small
            | EmbeddingModel::TextEmbedding3Large
            | EmbeddingModel::TextEmbeddingAda002 => EmbeddingProviderType::OpenAI,
            EmbeddingModel::BgeSmallEnV15
            | EmbeddingModel::BgeBaseEnV15
            | EmbeddingModel::BgeLargeEnV15 => EmbeddingProviderType::WorkersAi,
        }
    }

    const ALL: [EmbeddingModel; 6] = [
        EmbeddingModel::TextEmbedding3Small,
        EmbeddingModel::TextEmbedding3Large,
        EmbeddingModel::TextEmbeddingAda002,
        EmbeddingModel::BgeSmallEnV15,
        EmbeddingModel::BgeBaseEnV15,
        EmbeddingModel::BgeLargeEnV15,
    ];
}

impl fmt::Display for EmbeddingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model_name())
    }
}

/// Parses the provider-facing model name, e.g. `@cf/baai/bge-base-en-v1.5`.
impl FromStr for EmbeddingModel {
    type Err = VectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        EmbeddingModel::ALL
            .into_iter()
            .find(|m| m.model_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| VectorError::Config(format!("unknown embedding model '{}'", s)))
    }
}

/// One embedding vector as returned by a provider
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingResult {
    pub values: Vec<f32>,
    pub dimension: u32,
    pub tokens_used: u32,
}

impl EmbeddingResult {
    pub fn new(values: Vec<f32>, tokens_used: u32) -> Self {
        Self {
            dimension: values.len() as u32,
            values,
            tokens_used,
        }
    }
}

/// Nearest-neighbour query against the shared collection
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub vector: Vec<f32>,
    pub limit: u64,
}

impl SearchQuery {
    pub fn new(vector: Vec<f32>, limit: u64) -> Self {
        Self { vector, limit }
    }
}

/// A ranked hit. Payload is returned as stored; nothing is validated here.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub id: Uuid,
    pub score: f32,
    pub payload: Option<serde_json::Value>,
}

impl SearchResult {
    /// String field from the payload, if present
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.as_ref()?.get(key)?.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_model_names_and_dimensions() {
        assert_eq!(
            EmbeddingModel::TextEmbedding3Small.model_name(),
            "text-embedding-3-small"
        );
        assert_eq!(EmbeddingModel::TextEmbedding3Small.dimension(), 1536);
        assert_eq!(
            EmbeddingModel::BgeBaseEnV15.model_name(),
            "@cf/baai/bge-base-en-v1.5"
        );
        assert_eq!(EmbeddingModel::BgeBaseEnV15.dimension(), 768);
        assert_eq!(EmbeddingModel::BgeLargeEnV15.dimension(), 1024);
    }

    #[test]
    fn test_model_provider() {
        assert_eq!(
            EmbeddingModel::TextEmbeddingAda002.provider(),
            EmbeddingProviderType::OpenAI
        );
        assert_eq!(
            EmbeddingModel::BgeSmallEnV15.provider(),
            EmbeddingProviderType::WorkersAi
        );
    }

    #[test]
    fn test_model_from_str() {
        assert_eq!(
            " @cf/baai/bge-base-en-v1.5 ".parse::<EmbeddingModel>().unwrap(),
            EmbeddingModel::BgeBaseEnV15
        );
        assert_eq!(
            "TEXT-EMBEDDING-3-LARGE".parse::<EmbeddingModel>().unwrap(),
            EmbeddingModel::TextEmbedding3Large
        );
        assert!(matches!(
            "word2vec".parse::<EmbeddingModel>(),
            Err(VectorError::Config(_))
        ));
    }

    #[test]
    fn test_payload_str() {
        let hit = SearchResult {
            id: Uuid::new_v4(),
            score: 0.9,
            payload: Some(json!({ "tenant_id": "abc", "n": 3 })),
        };
        assert_eq!(hit.payload_str("tenant_id"), Some("abc"));
        assert_eq!(hit.payload_str("n"), None);
        assert_eq!(hit.payload_str("missing"), None);

        let bare = SearchResult {
            payload: None,
            ..hit
        };
        assert_eq!(bare.payload_str("tenant_id"), None);
    }
}
