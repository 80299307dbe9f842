//! Driven port persisting enrollment records.

use async_trait::async_trait;

use crate::domain::{Enrollment, IdempotencyKey, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by enrollment persistence adapters.
    pub enum EnrollmentRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "enrollment store unavailable: {message}",
        /// The store failed the write or query.
        Query { message: String } => "enrollment store error: {message}",
        /// A record with the same idempotency key already exists for the user.
        DuplicateKey { message: String } => "duplicate enrollment key: {message}",
    }
}

/// Append-only enrollment storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Store a new record.
    async fn insert(&self, enrollment: &Enrollment) -> Result<(), EnrollmentRepositoryError>;

    /// Find the record `user_id` created with `key`, if any.
    async fn find_by_idempotency_key(
        &self,
        user_id: &UserId,
        key: &IdempotencyKey,
    ) -> Result<Option<Enrollment>, EnrollmentRepositoryError>;

    /// Records owned by `user_id`, newest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Enrollment>, EnrollmentRepositoryError>;
}
