//! Server infrastructure: router assembly, health endpoints, graceful shutdown.

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{build_router, cors_layer_from_env, create_production_app, create_router};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::ShutdownCoordinator;
