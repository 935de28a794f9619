use axum::{Extension, Json, Router, extract::State, routing::post};
use axum_helpers::{ErrorResponse, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::KnowledgeResult;
use crate::models::{
    AuthenticatedTenant, ChatRequest, ChatResponse, DebugInfo, FallbackReason, RetrievalSource,
};
use crate::service::ChatService;

/// OpenAPI documentation for the chat API
#[derive(OpenApi)]
#[openapi(
    paths(chat),
    components(schemas(ChatRequest, ChatResponse, DebugInfo, RetrievalSource, FallbackReason)),
    tags(
        (name = "chat", description = "Tenant-scoped question answering")
    )
)]
pub struct ApiDoc;

/// Create the chat router, mounted by the app under `/chat`
pub fn router(service: ChatService) -> Router {
    Router::new()
        .route("/", post(chat))
        .with_state(Arc::new(service))
}

/// Answer a visitor's question from a tenant's knowledge base
#[utoipa::path(
    post,
    path = "",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Answer, possibly an apology", body = ChatResponse),
        (status = 400, description = "Empty question or bad tenant selector", body = ErrorResponse),
        (status = 404, description = "Tenant not found", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
async fn chat(
    State(service): State<Arc<ChatService>>,
    requester: Option<Extension<AuthenticatedTenant>>,
    ValidatedJson(request): ValidatedJson<ChatRequest>,
) -> KnowledgeResult<Json<ChatResponse>> {
    let requester = requester.map(|Extension(AuthenticatedTenant(id))| id);
    let response = service.ask(request, requester).await?;
    Ok(Json(response))
}
