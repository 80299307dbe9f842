//! Catalog read use-cases and the enrollment form's preselection.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use super::navigation::back_to_catalog;
use super::ports::{CourseCatalog, CourseCatalogError};
use super::{Course, CourseId, Error};

/// Courses plus the id the enrollment form should preselect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentFormView {
    pub courses: Vec<Course>,
    pub selected_course_id: Option<CourseId>,
}

#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CourseCatalog>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CourseCatalog>) -> Self {
        Self { catalog }
    }

    /// Map catalog failures to a retryable `ServiceUnavailable`.
    pub(crate) fn map_catalog_error(error: CourseCatalogError) -> Error {
        warn!(%error, "course catalog load failed");
        Error::service_unavailable("Failed to load courses. Please try again.")
            .with_detail("retryable", true)
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>, Error> {
        self.catalog
            .list_courses()
            .await
            .map_err(Self::map_catalog_error)
    }

    /// Fetch one course, or send the caller back to the catalog.
    pub async fn get_course(&self, id: CourseId) -> Result<Course, Error> {
        self.catalog
            .get_course(id)
            .await
            .map_err(Self::map_catalog_error)?
            .ok_or_else(|| back_to_catalog(format!("Course {id} not found")))
    }

    /// Build the enrollment form view.
    ///
    /// A previously selected course must still exist in the catalog;
    /// otherwise the caller is sent back to pick again.
    pub async fn enrollment_form(
        &self,
        selected: Option<&Course>,
    ) -> Result<EnrollmentFormView, Error> {
        let courses = self.list_courses().await?;
        let selected_course_id = match selected {
            Some(course) if courses.iter().any(|listed| listed.id == course.id) => {
                Some(course.id)
            }
            Some(course) => {
                return Err(back_to_catalog(format!(
                    "Selected course {} is no longer available",
                    course.id
                )));
            }
            None => None,
        };
        Ok(EnrollmentFormView {
            courses,
            selected_course_id,
        })
    }
}
