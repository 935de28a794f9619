//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has passed `validator` checks.
///
/// Malformed JSON is rejected as [`AppError::JsonExtractorRejection`], failed
/// validation as [`AppError::ValidationError`] with per-field details.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct Ask {
///     #[validate(length(max = 2000))]
///     question: String,
/// }
///
/// async fn ask(ValidatedJson(body): ValidatedJson<Ask>) -> String { body.question }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
