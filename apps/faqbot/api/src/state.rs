//! Application state management.
//!
//! Shared state passed to the readiness handler and used to build the domain
//! routers: configuration, the PostgreSQL pool, the Qdrant index and the chat
//! service wired on top of them.

use std::sync::Arc;

use domain_knowledge::ChatService;
use domain_vector::QdrantRepository;

/// Shared application state.
///
/// Cloning is cheap: the pool, the index and the service internals are all
/// reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool (`profiles`, `faqs`)
    pub db: database::postgres::DatabaseConnection,
    /// Shared Qdrant collection holding every tenant's entry vectors
    pub index: Arc<QdrantRepository>,
    /// Retrieval, prompt composition and generation for `POST /chat`
    pub chat: ChatService,
}
