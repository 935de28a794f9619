//! Tenants Domain
//!
//! A tenant is a chatbot owner. This crate maps a tenant id or handle to the
//! canonical identity and display profile used to personalize answers.
//!
//! ```text
//! ┌────────────────┐
//! │ TenantResolver │  ← selector validation, NotFound
//! └───────┬────────┘
//!         │
//! ┌───────▼──────────┐
//! │ TenantRepository │  ← Pg (`profiles` table) or in-memory
//! └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_tenants::{InMemoryTenantRepository, TenantResolver, TenantSelector};
//!
//! # async fn example() -> Result<(), domain_tenants::TenantError> {
//! let resolver = TenantResolver::new(InMemoryTenantRepository::new());
//! let selector = TenantSelector::from_parts(None, Some("alice"))?;
//! let profile = resolver.resolve(&selector).await?;
//! println!("{}", profile.display_name);
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod resolver;

pub use error::{TenantError, TenantResult};
pub use models::{TenantId, TenantProfile, TenantSelector};
pub use postgres::PgTenantRepository;
pub use repository::{InMemoryTenantRepository, TenantRepository};
pub use resolver::TenantResolver;
