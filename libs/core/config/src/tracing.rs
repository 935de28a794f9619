use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Default filter for development when `RUST_LOG` is unset.
const DEV_FILTER: &str = "debug,hyper=info,h2=info,tower=info,sqlx=warn,sea_orm=info";
/// Default filter for production when `RUST_LOG` is unset.
const PROD_FILTER: &str = "info,sqlx=warn,sea_orm=warn";

/// Install color-eyre with the project-standard configuration.
///
/// Call this first in `main()` so startup failures render with locations.
/// Safe to call multiple times.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize tracing for the given environment.
///
/// - **Production**: flattened JSON events for log aggregation, targets hidden.
/// - **Development**: pretty, human-readable output.
///
/// Both install `tracing_error::ErrorLayer` so span traces are captured on errors.
/// `RUST_LOG` overrides the default filter. Repeated calls are a no-op, which is
/// what tests rely on.
pub fn init_tracing(environment: &Environment) {
    let is_production = environment.is_production();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if is_production {
            EnvFilter::new(PROD_FILTER)
        } else {
            EnvFilter::new(DEV_FILTER)
        }
    });

    let result = if is_production {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!(environment = ?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing(&Environment::Development);
        init_tracing(&Environment::Production);
        init_tracing(&Environment::Development);
    }

    #[test]
    fn test_init_tracing_with_rust_log_env() {
        temp_env::with_var("RUST_LOG", Some("warn"), || {
            init_tracing(&Environment::Production);
        });
    }

    #[test]
    fn test_default_filters_parse() {
        assert!(EnvFilter::try_new(DEV_FILTER).is_ok());
        assert!(EnvFilter::try_new(PROD_FILTER).is_ok());
    }
}
