//! PostgreSQL adapters built on Diesel, `diesel-async` and `bb8`.
//!
//! Adapters translate between row structs and domain types and map database
//! failures onto port errors. Row structs and the schema stay private to this
//! module.

mod diesel_course_catalog;
mod diesel_enrollment_repository;
mod diesel_identity_provider;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_course_catalog::DieselCourseCatalog;
pub use diesel_enrollment_repository::DieselEnrollmentRepository;
pub use diesel_identity_provider::DieselIdentityProvider;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
