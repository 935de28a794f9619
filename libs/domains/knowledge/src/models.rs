use std::fmt;

use chrono::{DateTime, Utc};
use domain_tenants::TenantId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Identifier shared by a `faqs` row and its vector point.
///
/// Both the store and the index speak in `EntryId`, so the join between
/// search hits and rows cannot silently mix id spaces.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct EntryId(pub Uuid);

impl EntryId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for EntryId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One question/answer pair owned by exactly one tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: EntryId,
    pub tenant_id: TenantId,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Which path produced the retrieved entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalSource {
    /// Similarity order from the vector index
    Semantic,
    /// Newest-first fallback
    Recent,
}

/// Why retrieval fell back to recent entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    EmbeddingFailed,
    SearchFailed,
    NoTenantMatches,
    EntriesMissing,
    StoreFailed,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FallbackReason::EmbeddingFailed => "embedding_failed",
            FallbackReason::SearchFailed => "search_failed",
            FallbackReason::NoTenantMatches => "no_tenant_matches",
            FallbackReason::EntriesMissing => "entries_missing",
            FallbackReason::StoreFailed => "store_failed",
        };
        f.write_str(s)
    }
}

/// Counts and ids recorded at each retrieval stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievalDiagnostics {
    /// Raw hits returned by the index, any tenant
    pub semantic_match_count: usize,
    pub candidate_ids: Vec<EntryId>,
    /// Ids left after the tenant filter and bound
    pub post_filter_count: usize,
    pub matching_ids: Vec<EntryId>,
    pub entries_retrieved: usize,
    pub fallback_reason: Option<FallbackReason>,
}

/// Chat message roles understood by the generation API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Caller identity installed as a request extension by the auth layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedTenant(pub TenantId);

/// Body of `POST /chat`
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Visitor's question; must contain non-whitespace text
    #[validate(length(max = 2000))]
    pub question: String,
    /// Tenant to answer for, by id
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    /// Tenant to answer for, by handle
    #[serde(default)]
    #[validate(length(max = 64))]
    pub tenant_handle: Option<String>,
    /// Ask for retrieval diagnostics (owner only)
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub answer: String,
    pub context_used: bool,
    pub entries_used: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
}

/// Retrieval diagnostics returned to the tenant owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub semantic_match_count: usize,
    /// Raw hit ids before the tenant filter, any tenant
    pub candidate_ids: Vec<EntryId>,
    pub post_filter_count: usize,
    pub matching_ids: Vec<EntryId>,
    pub entries_retrieved: usize,
    pub tenant_id: TenantId,
    pub tenant_handle: String,
    pub source: RetrievalSource,
    pub fallback_reason: Option<FallbackReason>,
}
