//! PostgreSQL-backed [`EnrollmentRepository`].
//!
//! Records are insert-only. The partial unique index on
//! `(user_id, idempotency_key)` turns a replayed key into
//! [`EnrollmentRepositoryError::DuplicateKey`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{EnrollmentRepository, EnrollmentRepositoryError};
use crate::domain::{Enrollment, IdempotencyKey, UserId};

use super::error_mapping::DbFailure;
use super::models::EnrollmentRow;
use super::pool::DbPool;
use super::schema::enrollments;

#[derive(Clone)]
pub struct DieselEnrollmentRepository {
    pool: DbPool,
}

impl DieselEnrollmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: DbFailure) -> EnrollmentRepositoryError {
    match failure {
        DbFailure::Connection(message) => EnrollmentRepositoryError::connection(message),
        DbFailure::UniqueViolation(constraint) => EnrollmentRepositoryError::duplicate_key(
            constraint.unwrap_or_else(|| "enrollments_user_idempotency_key_idx".to_owned()),
        ),
        DbFailure::Query(message) => EnrollmentRepositoryError::query(message),
    }
}

fn map_diesel(error: diesel::result::Error) -> EnrollmentRepositoryError {
    map_failure(error.into())
}

fn into_domain(row: EnrollmentRow) -> Result<Enrollment, EnrollmentRepositoryError> {
    Enrollment::try_from(row).map_err(EnrollmentRepositoryError::query)
}

#[async_trait]
impl EnrollmentRepository for DieselEnrollmentRepository {
    async fn insert(&self, enrollment: &Enrollment) -> Result<(), EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| map_failure(err.into()))?;
        diesel::insert_into(enrollments::table)
            .values(&EnrollmentRow::from(enrollment))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn find_by_idempotency_key(
        &self,
        user_id: &UserId,
        key: &IdempotencyKey,
    ) -> Result<Option<Enrollment>, EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| map_failure(err.into()))?;
        enrollments::table
            .filter(enrollments::user_id.eq(user_id.as_uuid()))
            .filter(enrollments::idempotency_key.eq(key.as_uuid()))
            .select(EnrollmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?
            .map(into_domain)
            .transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Enrollment>, EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| map_failure(err.into()))?;
        enrollments::table
            .filter(enrollments::user_id.eq(user_id.as_uuid()))
            .order(enrollments::created_at.desc())
            .select(EnrollmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?
            .into_iter()
            .map(into_domain)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("enrollments_user_idempotency_key_idx".to_owned()))]
    #[case(None)]
    fn unique_violation_is_a_duplicate_key(#[case] constraint: Option<String>) {
        let err = map_failure(DbFailure::UniqueViolation(constraint));
        assert!(matches!(err, EnrollmentRepositoryError::DuplicateKey { .. }));
    }

    #[rstest]
    fn query_failures_keep_their_message() {
        let err = map_failure(DbFailure::Query("database error".to_owned()));
        assert_eq!(err, EnrollmentRepositoryError::query("database error"));
    }
}
