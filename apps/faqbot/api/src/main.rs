use std::sync::Arc;

use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_knowledge::{
    ChatService, OpenAIChatGenerator, PgKnowledgeStore, PromptComposer, ProviderEmbedder,
    RetrievalEngine, VectorKnowledgeIndex,
};
use domain_tenants::{PgTenantRepository, TenantResolver};
use domain_vector::{EmbeddingProvider, OpenAIProvider, QdrantRepository, WorkersAiProvider};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::{Config, EmbeddingConfig};
use state::AppState;

fn embedding_provider(config: &EmbeddingConfig) -> eyre::Result<Arc<dyn EmbeddingProvider>> {
    let provider: Arc<dyn EmbeddingProvider> = match config {
        EmbeddingConfig::OpenAI { config, .. } => Arc::new(OpenAIProvider::new(config.clone())?),
        EmbeddingConfig::WorkersAi { config, .. } => {
            Arc::new(WorkersAiProvider::new(config.clone())?)
        }
    };
    Ok(provider)
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let db =
        database::postgres::connect_from_config_with_retry(config.database.clone(), None).await?;

    info!(
        url = %config.qdrant.url,
        collection = %config.qdrant.collection,
        "Configuring Qdrant client"
    );
    let index = Arc::new(QdrantRepository::new(config.qdrant.clone())?);

    info!(model = %config.embedding.model(), "Using embedding model");
    let embedder = ProviderEmbedder::new(
        embedding_provider(&config.embedding)?,
        config.embedding.model(),
    );

    let engine = RetrievalEngine::new(
        TenantResolver::new(PgTenantRepository::new(db.clone())),
        Arc::new(embedder),
        Arc::new(VectorKnowledgeIndex::new(index.clone())),
        Arc::new(PgKnowledgeStore::new(db.clone())),
        config.retrieval.clone(),
    );
    let composer = PromptComposer::new(config.retrieval.max_context_chars);
    let generator = Arc::new(OpenAIChatGenerator::new(config.chat.clone())?);
    let chat = ChatService::new(engine, composer, generator);

    let state = AppState {
        config,
        db,
        index,
        chat,
    };

    // Build router with API routes (pass reference, not ownership!)
    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;

    // - /health: liveness check with app name/version
    // - /ready: readiness check against PostgreSQL and Qdrant
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    // State moves into the cleanup future
    let server = state.config.server.clone();
    info!(
        timeout_secs = server.shutdown_timeout_secs,
        "Starting faqbot API with graceful shutdown"
    );
    create_production_app(
        app,
        &server,
        server.shutdown_timeout(),
        async move {
            info!("Shutting down: closing database connections");
            match state.db.close().await {
                Ok(_) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Faqbot API shutdown complete");
    Ok(())
}
