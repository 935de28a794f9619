use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TenantError {
    #[error("Tenant not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type TenantResult<T> = Result<T, TenantError>;

impl From<TenantError> for AppError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::NotFound(selector) => {
                AppError::NotFound(format!("Tenant {} not found", selector))
            }
            TenantError::Validation(msg) => AppError::BadRequest(msg),
            TenantError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for TenantError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
