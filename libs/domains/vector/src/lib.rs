//! Vector Domain Library
//!
//! Hosted embedding models and the Qdrant similarity index behind two traits.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌───────────────────┐
//! │ VectorRepository │     │ EmbeddingProvider │
//! │   (trait)        │     │    (trait)        │
//! └────────┬─────────┘     └────────┬──────────┘
//!          │                        │
//! ┌────────▼─────────┐     ┌────────▼──────────┐
//! │ QdrantRepository │     │ OpenAIProvider    │
//! │ (shared          │     │ WorkersAiProvider │
//! │  collection)     │     └───────────────────┘
//! └──────────────────┘
//! ```
//!
//! Neither side knows about tenants. Callers get raw ranked hits with their
//! payloads and decide what to trust.
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::FromEnv;
//! use domain_vector::{
//!     EmbeddingModel, EmbeddingProvider, OpenAIProvider, QdrantConfig, QdrantRepository,
//!     SearchQuery, VectorRepository,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = OpenAIProvider::from_env()?;
//! let embedding = provider
//!     .embed(EmbeddingModel::TextEmbedding3Small, "how do I reset my password")
//!     .await?;
//!
//! let index = QdrantRepository::new(QdrantConfig::from_env()?)?;
//! let hits = index.search(SearchQuery::new(embedding.values, 10)).await?;
//! # Ok(())
//! # }
//! ```

pub mod embedding;
pub mod error;
pub mod models;
pub mod qdrant;
pub mod repository;

pub use embedding::{
    EmbeddingProvider, OpenAIConfig, OpenAIProvider, WorkersAiConfig, WorkersAiProvider,
};
pub use error::{VectorError, VectorResult};
pub use models::{EmbeddingModel, EmbeddingProviderType, EmbeddingResult, SearchQuery, SearchResult};
pub use qdrant::{QdrantConfig, QdrantRepository};
pub use repository::VectorRepository;
