//! # Axum Helpers
//!
//! Shared plumbing for the HTTP services in this workspace.
//!
//! - **[`server`]**: router assembly with OpenAPI docs, health endpoints, graceful shutdown
//! - **[`http`]**: response security headers
//! - **[`errors`]**: structured JSON error responses with error codes
//! - **[`extractors`]**: validated JSON bodies
//!
//! ```ignore
//! let router = axum_helpers::create_router::<ApiDoc>(api_routes).await?;
//! let app = router.merge(health_router(app_info!()));
//! create_production_app(app, &config.server, Duration::from_secs(30), async {}).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks,
};

pub use http::security_headers;

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::ValidatedJson;
