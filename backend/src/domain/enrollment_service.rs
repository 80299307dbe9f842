//! Enrollment submission and listing.
//!
//! Submissions without an idempotency key are never deduplicated: two
//! identical requests store two records. With a key, a repeat by the same
//! user replays the original confirmation.

use std::sync::Arc;

use mockable::Clock;
use serde_json::{Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use super::catalog_service::CatalogService;
use super::navigation::login_required;
use super::ports::{CourseCatalog, EnrollmentRepository, EnrollmentRepositoryError};
use super::{
    Course, CourseId, Enrollment, EnrollmentConfirmation, EnrollmentField, EnrollmentForm,
    EnrollmentValidationError, Error, IdempotencyKey, Identity,
};

#[derive(Clone)]
pub struct EnrollmentService {
    repository: Arc<dyn EnrollmentRepository>,
    catalog: Arc<dyn CourseCatalog>,
    clock: Arc<dyn Clock>,
}

fn validation_error(error: &EnrollmentValidationError) -> Error {
    let fields: Vec<Value> = error
        .errors()
        .iter()
        .map(|field| json!({ "field": field.field.as_str(), "message": field.message }))
        .collect();
    let mut mapped = Error::invalid_request(error.to_string()).with_detail("fields", fields);
    if let Some(first) = error.first() {
        mapped = mapped.with_detail("field", first.field.as_str());
    }
    mapped
}

fn map_write_error(error: EnrollmentRepositoryError) -> Error {
    warn!(%error, "enrollment write failed");
    Error::service_unavailable("Enrollment failed. Please try again.")
        .with_detail("retryable", true)
}

impl EnrollmentService {
    pub fn new(
        repository: Arc<dyn EnrollmentRepository>,
        catalog: Arc<dyn CourseCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            catalog,
            clock,
        }
    }

    async fn resolve_course(&self, course_id: CourseId) -> Result<Course, Error> {
        self.catalog
            .get_course(course_id)
            .await
            .map_err(CatalogService::map_catalog_error)?
            .ok_or_else(|| {
                validation_error(&EnrollmentValidationError::single(
                    EnrollmentField::CourseId,
                    "Please select a course",
                ))
            })
    }

    async fn replay(&self, existing: Enrollment) -> Result<EnrollmentConfirmation, Error> {
        let course = self.resolve_course(existing.course_id).await?;
        info!(enrollment_id = %existing.id, "replaying enrollment for idempotency key");
        Ok(EnrollmentConfirmation {
            enrollment_id: existing.id,
            enrolled_user: existing.full_name,
            course,
            replayed: true,
        })
    }

    async fn find_by_key(
        &self,
        identity: &Identity,
        key: &IdempotencyKey,
    ) -> Result<Option<Enrollment>, Error> {
        self.repository
            .find_by_idempotency_key(identity.user_id(), key)
            .await
            .map_err(map_write_error)
    }

    /// Validate and persist one enrollment.
    ///
    /// Nothing is written unless the caller is authenticated, every field is
    /// valid, and the course resolves in the catalog.
    pub async fn submit(
        &self,
        identity: Option<&Identity>,
        form: &EnrollmentForm,
        idempotency_key: Option<IdempotencyKey>,
    ) -> Result<EnrollmentConfirmation, Error> {
        let identity = identity.ok_or_else(login_required)?;
        let valid = form.validate().map_err(|error| validation_error(&error))?;

        if let Some(key) = idempotency_key.as_ref() {
            if let Some(existing) = self.find_by_key(identity, key).await? {
                return self.replay(existing).await;
            }
        }

        let course = self.resolve_course(valid.course_id()).await?;
        let enrollment = Enrollment {
            id: Uuid::new_v4(),
            full_name: valid.full_name().to_owned(),
            email: valid.email().clone(),
            course_id: course.id,
            user_id: identity.user_id().clone(),
            created_at: self.clock.utc(),
            idempotency_key,
        };

        match self.repository.insert(&enrollment).await {
            Ok(()) => {}
            Err(EnrollmentRepositoryError::DuplicateKey { .. }) => {
                // Lost a race against a concurrent request with the same key.
                if let Some(key) = enrollment.idempotency_key.as_ref() {
                    if let Some(existing) = self.find_by_key(identity, key).await? {
                        return self.replay(existing).await;
                    }
                }
                return Err(Error::conflict("Enrollment already submitted"));
            }
            Err(error) => return Err(map_write_error(error)),
        }

        info!(
            enrollment_id = %enrollment.id,
            user_id = %identity.user_id(),
            course_id = %course.id,
            "enrollment stored"
        );
        Ok(EnrollmentConfirmation {
            enrollment_id: enrollment.id,
            enrolled_user: enrollment.full_name,
            course,
            replayed: false,
        })
    }

    /// Enrollments owned by the caller, newest first.
    pub async fn list_for_user(
        &self,
        identity: Option<&Identity>,
    ) -> Result<Vec<Enrollment>, Error> {
        let identity = identity.ok_or_else(login_required)?;
        self.repository
            .list_for_user(identity.user_id())
            .await
            .map_err(|error| {
                warn!(%error, "enrollment listing failed");
                Error::service_unavailable("Failed to load enrollments. Please try again.")
                    .with_detail("retryable", true)
            })
    }
}

#[cfg(test)]
#[path = "enrollment_service_tests.rs"]
mod tests;
