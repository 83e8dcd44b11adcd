//! PostgreSQL adapters for the driven ports.
//!
//! Adapters translate between Diesel rows and domain types and map database
//! failures into port errors. Row structs and table definitions stay private
//! to this module.
//!
//! ```ignore
//! use ticketing_backend::outbound::persistence::{DbPool, DieselDiscountCodeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/ticketing")).await?;
//! let codes = DieselDiscountCodeRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_caller_directory;
mod diesel_discount_code_repository;
mod diesel_event_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_caller_directory::DieselCallerDirectory;
pub use diesel_discount_code_repository::DieselDiscountCodeRepository;
pub use diesel_event_repository::DieselEventRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
