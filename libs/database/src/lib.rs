//! PostgreSQL connectivity shared by the domain crates.
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{PostgresConfig, connect_from_config_with_retry};
//!
//! let db = connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! database::postgres::check_health(&db).await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
