//! Driven port for reading the course catalog.

use async_trait::async_trait;

use crate::domain::{Course, CourseId};

use super::define_port_error;

define_port_error! {
    /// Errors raised while loading catalog data.
    pub enum CourseCatalogError {
        /// The catalog store could not be reached.
        Connection { message: String } => "course catalog unavailable: {message}",
        /// The catalog store failed the query or returned malformed rows.
        Query { message: String } => "course catalog query failed: {message}",
    }
}

/// Outcome of [`CourseCatalog::seed_if_empty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The collection was empty and `inserted` courses were written.
    Applied { inserted: usize },
    /// The collection already held courses; nothing was written.
    AlreadySeeded,
}

/// Ordered course listing and lookup by id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    /// Every listed course, fully materialised, in catalog order.
    async fn list_courses(&self) -> Result<Vec<Course>, CourseCatalogError>;

    /// Look up one course. Repeated calls with the same id return the same
    /// value.
    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, CourseCatalogError>;

    /// Populate the catalog with `courses` only when it holds no entries.
    async fn seed_if_empty(&self, courses: &[Course]) -> Result<SeedOutcome, CourseCatalogError>;
}
