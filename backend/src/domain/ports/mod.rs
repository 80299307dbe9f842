//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod course_catalog;
mod enrollment_repository;
mod handoff_store;
mod identity_provider;

#[cfg(test)]
pub use course_catalog::MockCourseCatalog;
pub use course_catalog::{CourseCatalog, CourseCatalogError, SeedOutcome};
#[cfg(test)]
pub use enrollment_repository::MockEnrollmentRepository;
pub use enrollment_repository::{EnrollmentRepository, EnrollmentRepositoryError};
#[cfg(test)]
pub use handoff_store::MockHandoffStore;
pub use handoff_store::{HandoffStore, HandoffStoreError};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityProvider, IdentityProviderError};
