use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_tenants::TenantError;
use domain_vector::VectorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Tenant not found: {0}")]
    TenantNotFound(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Vector search failed: {0}")]
    Search(String),

    #[error("Knowledge store error: {0}")]
    Store(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type KnowledgeResult<T> = Result<T, KnowledgeError>;

impl From<TenantError> for KnowledgeError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::NotFound(selector) => KnowledgeError::TenantNotFound(selector),
            TenantError::Validation(msg) => KnowledgeError::Validation(msg),
            TenantError::Internal(msg) => KnowledgeError::Internal(msg),
        }
    }
}

impl From<core_config::ConfigError> for KnowledgeError {
    fn from(err: core_config::ConfigError) -> Self {
        KnowledgeError::Config(err.to_string())
    }
}

impl From<VectorError> for KnowledgeError {
    fn from(err: VectorError) -> Self {
        match err {
            VectorError::Qdrant(msg) => KnowledgeError::Search(msg),
            VectorError::Config(msg) => KnowledgeError::Config(msg),
            other => KnowledgeError::Embedding(other.to_string()),
        }
    }
}

/// Convert KnowledgeError to AppError for standardized error responses
impl From<KnowledgeError> for AppError {
    fn from(err: KnowledgeError) -> Self {
        match err {
            KnowledgeError::Validation(msg) => AppError::BadRequest(msg),
            KnowledgeError::TenantNotFound(selector) => {
                AppError::NotFound(format!("Tenant {} not found", selector))
            }
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

impl IntoResponse for KnowledgeError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_tenant_errors_keep_their_class() {
        assert!(matches!(
            KnowledgeError::from(TenantError::NotFound("handle 'x'".into())),
            KnowledgeError::TenantNotFound(_)
        ));
        assert!(matches!(
            KnowledgeError::from(TenantError::Validation("both".into())),
            KnowledgeError::Validation(_)
        ));
        assert!(matches!(
            KnowledgeError::from(TenantError::Internal("db".into())),
            KnowledgeError::Internal(_)
        ));
    }

    #[test]
    fn test_vector_errors() {
        assert!(matches!(
            KnowledgeError::from(VectorError::Qdrant("down".into())),
            KnowledgeError::Search(_)
        ));
        assert!(matches!(
            KnowledgeError::from(VectorError::EmbeddingDeferred("req".into())),
            KnowledgeError::Embedding(_)
        ));
    }

    #[test]
    fn test_http_status() {
        let cases = [
            (KnowledgeError::Validation("empty".into()), StatusCode::BAD_REQUEST),
            (KnowledgeError::TenantNotFound("id x".into()), StatusCode::NOT_FOUND),
            (
                KnowledgeError::Store("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
