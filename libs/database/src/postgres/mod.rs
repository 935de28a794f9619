//! PostgreSQL connection management over SeaORM.

mod config;
mod connector;
mod health;

pub use config::PostgresConfig;
pub use connector::{connect_from_config_with_retry, connect_with_options};
pub use health::check_health;

pub use sea_orm::{DatabaseConnection, DbErr};
