//! Compiled-in course catalog with optional simulated latency.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ports::{CourseCatalog, CourseCatalogError, SeedOutcome};
use crate::domain::{Course, CourseId, seed_courses};

/// Catalog held in memory, in id order.
pub struct StaticCourseCatalog {
    courses: RwLock<Vec<Course>>,
    latency: Duration,
}

impl StaticCourseCatalog {
    /// Catalog holding the six seed courses.
    pub fn seeded() -> Self {
        Self::from_courses(seed_courses())
    }

    /// Catalog with no courses; populate it with
    /// [`CourseCatalog::seed_if_empty`].
    pub fn empty() -> Self {
        Self::from_courses(Vec::new())
    }

    pub fn from_courses(mut courses: Vec<Course>) -> Self {
        courses.sort_by_key(|course| course.id);
        Self {
            courses: RwLock::new(courses),
            latency: Duration::ZERO,
        }
    }

    /// Delay every read by `latency`, mimicking a remote catalog.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn snapshot(&self) -> Vec<Course> {
        self.courses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl CourseCatalog for StaticCourseCatalog {
    async fn list_courses(&self) -> Result<Vec<Course>, CourseCatalogError> {
        self.simulate_latency().await;
        Ok(self.snapshot())
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, CourseCatalogError> {
        self.simulate_latency().await;
        Ok(self
            .courses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|course| course.id == id)
            .cloned())
    }

    async fn seed_if_empty(&self, courses: &[Course]) -> Result<SeedOutcome, CourseCatalogError> {
        let mut stored = self.courses.write().unwrap_or_else(PoisonError::into_inner);
        if !stored.is_empty() {
            return Ok(SeedOutcome::AlreadySeeded);
        }
        stored.extend_from_slice(courses);
        stored.sort_by_key(|course| course.id);
        Ok(SeedOutcome::Applied {
            inserted: courses.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn seeded_catalog_lists_six_courses_in_order() {
        let courses = StaticCourseCatalog::seeded()
            .list_courses()
            .await
            .expect("list");
        let ids: Vec<i32> = courses.iter().map(|course| course.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[rstest]
    #[tokio::test]
    async fn seeding_only_applies_once() {
        let catalog = StaticCourseCatalog::empty();
        let first = catalog.seed_if_empty(&seed_courses()).await.expect("seed");
        let second = catalog.seed_if_empty(&seed_courses()).await.expect("seed");

        assert_eq!(first, SeedOutcome::Applied { inserted: 6 });
        assert_eq!(second, SeedOutcome::AlreadySeeded);
        assert_eq!(catalog.list_courses().await.expect("list").len(), 6);
    }

    #[rstest]
    #[tokio::test]
    async fn latency_delays_reads() {
        let catalog = StaticCourseCatalog::seeded().with_latency(Duration::from_millis(20));
        let started = tokio::time::Instant::now();
        let course = catalog.get_course(CourseId::new(3)).await.expect("get");
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert_eq!(course.map(|c| c.title), Some("Data Science Fundamentals".to_owned()));
    }
}
