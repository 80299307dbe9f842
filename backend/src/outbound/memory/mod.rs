//! In-process adapters used when no database URL is configured and in tests.
//!
//! State lives for the lifetime of the process. Locks are never held across
//! an `.await`.

mod course_catalog;
mod enrollment_repository;
mod identity_provider;

pub use course_catalog::StaticCourseCatalog;
pub use enrollment_repository::MemoryEnrollmentRepository;
pub use identity_provider::MemoryIdentityProvider;
