use std::sync::Arc;

use async_trait::async_trait;
use domain_tenants::TenantId;
use domain_vector::{SearchQuery, SearchResult, VectorRepository};
use tracing::debug;

use crate::error::{KnowledgeError, KnowledgeResult};
use crate::models::EntryId;

/// Payload key holding the owning tenant id of a point
pub const TENANT_PAYLOAD_KEY: &str = "tenant_id";

/// One ranked hit from the shared index.
///
/// `tenant_id` is whatever the point's payload claims, `None` when absent or
/// unparseable. Such candidates never survive the tenant filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub entry_id: EntryId,
    pub score: f32,
    pub tenant_id: Option<TenantId>,
}

impl From<SearchResult> for Candidate {
    fn from(hit: SearchResult) -> Self {
        let tenant_id = hit
            .payload_str(TENANT_PAYLOAD_KEY)
            .and_then(|raw| raw.parse::<TenantId>().ok());

        Self {
            entry_id: EntryId::new(hit.id),
            score: hit.score,
            tenant_id,
        }
    }
}

/// Similarity search over every tenant's entries, best first
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KnowledgeIndex: Send + Sync {
    async fn search(&self, vector: Vec<f32>, limit: usize) -> KnowledgeResult<Vec<Candidate>>;
}

/// [`KnowledgeIndex`] backed by a [`VectorRepository`]
#[derive(Clone)]
pub struct VectorKnowledgeIndex {
    repository: Arc<dyn VectorRepository>,
}

impl VectorKnowledgeIndex {
    pub fn new(repository: Arc<dyn VectorRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl KnowledgeIndex for VectorKnowledgeIndex {
    async fn search(&self, vector: Vec<f32>, limit: usize) -> KnowledgeResult<Vec<Candidate>> {
        let hits = self
            .repository
            .search(SearchQuery::new(vector, limit as u64))
            .await
            .map_err(|e| KnowledgeError::Search(e.to_string()))?;

        let candidates: Vec<Candidate> = hits.into_iter().map(Candidate::from).collect();
        let untagged = candidates.iter().filter(|c| c.tenant_id.is_none()).count();
        if untagged > 0 {
            debug!(untagged, "Search hits without a usable tenant_id payload");
        }

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_vector::{VectorError, VectorResult};
    use serde_json::json;
    use uuid::Uuid;

    struct FixedRepository(VectorResult<Vec<SearchResult>>);

    #[async_trait]
    impl VectorRepository for FixedRepository {
        async fn search(&self, query: SearchQuery) -> VectorResult<Vec<SearchResult>> {
            assert_eq!(query.limit, 10);
            match &self.0 {
                Ok(hits) => Ok(hits.clone()),
                Err(e) => Err(VectorError::Qdrant(e.to_string())),
            }
        }

        async fn health_check(&self) -> VectorResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_payload_tenant_is_parsed() {
        let tenant = Uuid::new_v4();
        let good = Uuid::new_v4();
        let bad = Uuid::new_v4();
        let bare = Uuid::new_v4();
        let repo = FixedRepository(Ok(vec![
            SearchResult {
                id: good,
                score: 0.9,
                payload: Some(json!({ "tenant_id": tenant.to_string() })),
            },
            SearchResult {
                id: bad,
                score: 0.8,
                payload: Some(json!({ "tenant_id": "not-a-uuid" })),
            },
            SearchResult {
                id: bare,
                score: 0.7,
                payload: None,
            },
        ]));

        let candidates = VectorKnowledgeIndex::new(Arc::new(repo))
            .search(vec![0.1; 4], 10)
            .await
            .unwrap();

        assert_eq!(
            candidates,
            vec![
                Candidate {
                    entry_id: EntryId::new(good),
                    score: 0.9,
                    tenant_id: Some(TenantId::new(tenant)),
                },
                Candidate {
                    entry_id: EntryId::new(bad),
                    score: 0.8,
                    tenant_id: None,
                },
                Candidate {
                    entry_id: EntryId::new(bare),
                    score: 0.7,
                    tenant_id: None,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_repository_error_is_search_error() {
        let repo = FixedRepository(Err(VectorError::Qdrant("unavailable".into())));

        let err = VectorKnowledgeIndex::new(Arc::new(repo))
            .search(vec![0.1; 4], 10)
            .await
            .unwrap_err();

        assert!(matches!(err, KnowledgeError::Search(_)));
    }
}
