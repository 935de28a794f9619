//! Tenant-scoped retrieval with recency fallback.
//!
//! One request runs strictly in sequence: resolve tenant, embed, search,
//! filter to the tenant, resolve rows. Gateway failures never escape; they
//! route the request onto the fallback path instead.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use domain_tenants::{TenantId, TenantProfile, TenantResolver, TenantSelector};
use tracing::{debug, info, instrument, warn};

use crate::config::RetrievalConfig;
use crate::embedder::QueryEmbedder;
use crate::error::{KnowledgeError, KnowledgeResult};
use crate::index::{Candidate, KnowledgeIndex};
use crate::models::{EntryId, FallbackReason, KnowledgeEntry, RetrievalDiagnostics, RetrievalSource};
use crate::store::KnowledgeStore;

/// A validated question addressed to one tenant
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalQuery {
    question: String,
    selector: TenantSelector,
}

impl RetrievalQuery {
    /// Rejects a question that is empty after trimming.
    pub fn new(question: &str, selector: TenantSelector) -> KnowledgeResult<Self> {
        let question = validate_question(question)?;

        Ok(Self {
            question: question.to_string(),
            selector,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn selector(&self) -> &TenantSelector {
        &self.selector
    }
}

/// Trimmed question, or a validation error when nothing is left.
pub fn validate_question(question: &str) -> KnowledgeResult<&str> {
    let question = question.trim();
    if question.is_empty() {
        return Err(KnowledgeError::Validation(
            "question must not be empty".to_string(),
        ));
    }
    Ok(question)
}

/// Entries for one query, from exactly one path
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalResult {
    pub tenant: TenantProfile,
    pub entries: Vec<KnowledgeEntry>,
    pub source: RetrievalSource,
    pub diagnostics: RetrievalDiagnostics,
}

#[derive(Clone)]
pub struct RetrievalEngine {
    resolver: TenantResolver,
    embedder: Arc<dyn QueryEmbedder>,
    index: Arc<dyn KnowledgeIndex>,
    store: Arc<dyn KnowledgeStore>,
    config: RetrievalConfig,
}

impl RetrievalEngine {
    pub fn new(
        resolver: TenantResolver,
        embedder: Arc<dyn QueryEmbedder>,
        index: Arc<dyn KnowledgeIndex>,
        store: Arc<dyn KnowledgeStore>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            resolver,
            embedder,
            index,
            store,
            config,
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Errors only for an unknown tenant or a failed tenant lookup.
    #[instrument(skip(self, query), fields(tenant = %query.selector()))]
    pub async fn retrieve(&self, query: &RetrievalQuery) -> KnowledgeResult<RetrievalResult> {
        let tenant = self.resolver.resolve(query.selector()).await?;
        let mut diagnostics = RetrievalDiagnostics::default();

        let ids = match self.embedder.embed(query.question()).await {
            Ok(vector) => self.semantic_ids(vector, tenant.id, &mut diagnostics).await,
            Err(e) => {
                warn!(error = %e, "Embedding failed; using recent entries");
                diagnostics.fallback_reason = Some(FallbackReason::EmbeddingFailed);
                Vec::new()
            }
        };

        diagnostics.post_filter_count = ids.len();
        diagnostics.matching_ids = ids.clone();

        let (entries, source) = if ids.is_empty() {
            (self.recent(tenant.id).await, RetrievalSource::Recent)
        } else {
            match self.store.get_by_ids(&ids, tenant.id).await {
                Ok(rows) => {
                    let ordered = order_by_ids(rows, &ids, tenant.id);
                    if ordered.is_empty() {
                        warn!(
                            matching = ids.len(),
                            "Index points have no rows; using recent entries"
                        );
                        diagnostics.fallback_reason = Some(FallbackReason::EntriesMissing);
                        (self.recent(tenant.id).await, RetrievalSource::Recent)
                    } else {
                        (ordered, RetrievalSource::Semantic)
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Entry lookup failed; using recent entries");
                    diagnostics.fallback_reason = Some(FallbackReason::StoreFailed);
                    (self.recent(tenant.id).await, RetrievalSource::Recent)
                }
            }
        };

        diagnostics.entries_retrieved = entries.len();
        info!(
            tenant_id = %tenant.id,
            source = ?source,
            semantic_matches = diagnostics.semantic_match_count,
            post_filter = diagnostics.post_filter_count,
            entries = entries.len(),
            fallback_reason = ?diagnostics.fallback_reason,
            "Retrieval completed"
        );

        Ok(RetrievalResult {
            tenant,
            entries,
            source,
            diagnostics,
        })
    }

    async fn semantic_ids(
        &self,
        vector: Vec<f32>,
        tenant_id: TenantId,
        diagnostics: &mut RetrievalDiagnostics,
    ) -> Vec<EntryId> {
        let candidates = match self.index.search(vector, self.config.candidate_limit).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, "Vector search failed; using recent entries");
                diagnostics.fallback_reason = Some(FallbackReason::SearchFailed);
                return Vec::new();
            }
        };

        diagnostics.semantic_match_count = candidates.len();
        diagnostics.candidate_ids = candidates.iter().map(|c| c.entry_id).collect();

        let ids = filter_candidates(
            &candidates,
            tenant_id,
            self.config.max_entries,
            self.config.min_score,
        );
        debug!(
            candidates = candidates.len(),
            kept = ids.len(),
            "Tenant filter applied"
        );

        if ids.is_empty() {
            diagnostics.fallback_reason = Some(FallbackReason::NoTenantMatches);
        }
        ids
    }

    async fn recent(&self, tenant_id: TenantId) -> Vec<KnowledgeEntry> {
        match self.store.get_recent(tenant_id, self.config.max_entries).await {
            Ok(mut entries) => {
                entries.retain(|e| e.tenant_id == tenant_id);
                entries.truncate(self.config.max_entries);
                entries
            }
            Err(e) => {
                warn!(error = %e, "Recent entries unavailable; answering without context");
                Vec::new()
            }
        }
    }
}

/// Keeps the tenant's candidates in score order, first occurrence of each id,
/// at most `max` of them.
fn filter_candidates(
    candidates: &[Candidate],
    tenant_id: TenantId,
    max: usize,
    min_score: Option<f32>,
) -> Vec<EntryId> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .filter(|c| c.tenant_id == Some(tenant_id))
        .filter(|c| min_score.is_none_or(|min| c.score >= min))
        .filter(|c| seen.insert(c.entry_id))
        .map(|c| c.entry_id)
        .take(max)
        .collect()
}

/// Re-applies the similarity order to rows fetched in arbitrary order.
fn order_by_ids(
    rows: Vec<KnowledgeEntry>,
    ids: &[EntryId],
    tenant_id: TenantId,
) -> Vec<KnowledgeEntry> {
    let mut by_id: HashMap<EntryId, KnowledgeEntry> = rows
        .into_iter()
        .filter(|e| e.tenant_id == tenant_id)
        .map(|e| (e.id, e))
        .collect();

    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}
