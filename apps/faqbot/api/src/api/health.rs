//! Readiness handler with real PostgreSQL and Qdrant checks.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use domain_vector::VectorRepository;

/// Readiness check endpoint.
///
/// Runs `SELECT 1` against the pool and a health round-trip to Qdrant via
/// the generic `run_health_checks` utility from axum-helpers.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
        (
            "database",
            Box::pin(async {
                database::postgres::check_health(&state.db)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ),
        (
            "qdrant",
            Box::pin(async {
                state
                    .index
                    .health_check()
                    .await
                    .map_err(|e| format!("Qdrant health check failed: {}", e))
            }),
        ),
    ];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}
