use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "FAQ Bot API",
        version = "0.1.0",
        description = "Answers visitors' questions from each tenant's own knowledge base"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/chat", api = domain_knowledge::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
