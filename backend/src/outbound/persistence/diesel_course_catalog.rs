//! PostgreSQL-backed [`CourseCatalog`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{CourseCatalog, CourseCatalogError, SeedOutcome};
use crate::domain::{Course, CourseId};

use super::error_mapping::DbFailure;
use super::models::CourseRow;
use super::pool::DbPool;
use super::schema::courses;

/// Reads the `courses` table in id order.
#[derive(Clone)]
pub struct DieselCourseCatalog {
    pool: DbPool,
}

impl DieselCourseCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: DbFailure) -> CourseCatalogError {
    match failure {
        DbFailure::Connection(message) => CourseCatalogError::connection(message),
        DbFailure::UniqueViolation(constraint) => CourseCatalogError::query(format!(
            "unique violation on {}",
            constraint.as_deref().unwrap_or("courses")
        )),
        DbFailure::Query(message) => CourseCatalogError::query(message),
    }
}

fn map_diesel(error: diesel::result::Error) -> CourseCatalogError {
    map_failure(error.into())
}

#[async_trait]
impl CourseCatalog for DieselCourseCatalog {
    async fn list_courses(&self) -> Result<Vec<Course>, CourseCatalogError> {
        let mut conn = self.pool.get().await.map_err(|err| map_failure(err.into()))?;
        let rows = courses::table
            .order(courses::id.asc())
            .select(CourseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(rows.into_iter().map(Course::from).collect())
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, CourseCatalogError> {
        let mut conn = self.pool.get().await.map_err(|err| map_failure(err.into()))?;
        let row = courses::table
            .find(id.get())
            .select(CourseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        Ok(row.map(Course::from))
    }

    async fn seed_if_empty(&self, seed: &[Course]) -> Result<SeedOutcome, CourseCatalogError> {
        let rows: Vec<CourseRow> = seed.iter().map(CourseRow::from).collect();
        let mut conn = self.pool.get().await.map_err(|err| map_failure(err.into()))?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                // Serialise concurrent seeders; the loser sees a populated table.
                diesel::sql_query("LOCK TABLE courses IN EXCLUSIVE MODE")
                    .execute(conn)
                    .await?;
                let existing: i64 = courses::table.count().get_result(conn).await?;
                if existing > 0 {
                    return Ok(SeedOutcome::AlreadySeeded);
                }
                let inserted = diesel::insert_into(courses::table)
                    .values(&rows)
                    .execute(conn)
                    .await?;
                Ok(SeedOutcome::Applied { inserted })
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unique_violation_during_seed_is_a_query_error() {
        let err = map_failure(DbFailure::UniqueViolation(Some("courses_pkey".to_owned())));
        assert_eq!(err, CourseCatalogError::query("unique violation on courses_pkey"));
    }

    #[rstest]
    fn pool_timeouts_are_connection_errors() {
        let err = map_failure(DbFailure::Connection("timed out".to_owned()));
        assert!(matches!(err, CourseCatalogError::Connection { .. }));
    }
}
