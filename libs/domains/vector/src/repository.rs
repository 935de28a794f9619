use async_trait::async_trait;

use crate::error::VectorResult;
use crate::models::{SearchQuery, SearchResult};

/// Read side of the similarity index.
///
/// Results come back in descending score order with their payloads. No
/// tenant filtering happens at this layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorRepository: Send + Sync {
    /// Nearest neighbours of `query.vector`, at most `query.limit` of them
    async fn search(&self, query: SearchQuery) -> VectorResult<Vec<SearchResult>>;

    /// Round-trip to the index server
    async fn health_check(&self) -> VectorResult<()>;
}
