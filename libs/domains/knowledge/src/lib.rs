//! Knowledge Domain
//!
//! Tenant-scoped retrieval over FAQ entries with a recency fallback, and the
//! chat endpoint built on it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← POST /chat
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ ChatService │  ← engine → composer → generator, apology on failure
//! └──────┬──────┘
//!        │
//! ┌──────▼──────────┐   TenantResolver   (domain_tenants)
//! │ RetrievalEngine │── QueryEmbedder    (domain_vector providers)
//! └─────────────────┘   KnowledgeIndex   (Qdrant, shared collection)
//!                       KnowledgeStore   (Pg `faqs` / in-memory)
//! ```
//!
//! Entries and index points share one id type, [`EntryId`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_knowledge::*;
//! # fn wire(
//! #     tenants: domain_tenants::TenantResolver,
//! #     embedder: Arc<dyn QueryEmbedder>,
//! #     index: Arc<dyn KnowledgeIndex>,
//! #     generator: Arc<dyn Generator>,
//! # ) -> axum::Router {
//! let engine = RetrievalEngine::new(
//!     tenants,
//!     embedder,
//!     index,
//!     Arc::new(InMemoryKnowledgeStore::new()),
//!     RetrievalConfig::default(),
//! );
//! let service = ChatService::new(engine, PromptComposer::default(), generator);
//! handlers::router(service)
//! # }
//! ```

pub mod composer;
pub mod config;
pub mod embedder;
pub mod engine;
pub mod entity;
pub mod error;
pub mod generation;
pub mod handlers;
pub mod index;
pub mod models;
pub mod postgres;
pub mod service;
pub mod store;

pub use composer::{ComposedPrompt, PromptComposer};
pub use config::{ChatConfig, RetrievalConfig};
pub use embedder::{ProviderEmbedder, QueryEmbedder};
pub use engine::{RetrievalEngine, RetrievalQuery, RetrievalResult};
pub use error::{KnowledgeError, KnowledgeResult};
pub use generation::{Generator, OpenAIChatGenerator};
pub use index::{Candidate, KnowledgeIndex, VectorKnowledgeIndex};
pub use models::{
    AuthenticatedTenant, ChatMessage, ChatRequest, ChatResponse, DebugInfo, EntryId,
    FallbackReason, KnowledgeEntry, RetrievalDiagnostics, RetrievalSource, Role,
};
pub use postgres::PgKnowledgeStore;
pub use service::ChatService;
pub use store::{InMemoryKnowledgeStore, KnowledgeStore};
