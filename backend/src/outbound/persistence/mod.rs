//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations translate between Diesel rows and domain
//! types and nothing more. Rows (`models.rs`) and table definitions
//! (`schema.rs`) stay private to this module. Connections come from a `bb8`
//! pool of `diesel-async` connections; every database failure is mapped
//! into the owning port's error enum.
//!
//! # Example
//!
//! ```no_run
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! use skymarket::outbound::persistence::{DbPool, DieselAdRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/skymarket")).await?;
//! let ads = DieselAdRepository::new(pool);
//! # let _ = ads;
//! # Ok(())
//! # }
//! ```

mod diesel_ad_repository;
mod diesel_basic_error_mapping;
mod diesel_comment_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_ad_repository::DieselAdRepository;
pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
