//! In-process enrollment store used when no database is configured.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{EnrollmentRepository, EnrollmentRepositoryError};
use crate::domain::{Enrollment, IdempotencyKey, UserId};

/// Append-only list of enrollments in insertion order.
#[derive(Default)]
pub struct MemoryEnrollmentRepository {
    records: Mutex<Vec<Enrollment>>,
}

impl MemoryEnrollmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, Vec<Enrollment>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

#[async_trait]
impl EnrollmentRepository for MemoryEnrollmentRepository {
    async fn insert(&self, enrollment: &Enrollment) -> Result<(), EnrollmentRepositoryError> {
        let mut records = self.records();
        if let Some(key) = enrollment.idempotency_key {
            let clash = records.iter().any(|existing| {
                existing.user_id == enrollment.user_id && existing.idempotency_key == Some(key)
            });
            if clash {
                return Err(EnrollmentRepositoryError::duplicate_key(key.to_string()));
            }
        }
        records.push(enrollment.clone());
        Ok(())
    }

    async fn find_by_idempotency_key(
        &self,
        user_id: &UserId,
        key: &IdempotencyKey,
    ) -> Result<Option<Enrollment>, EnrollmentRepositoryError> {
        Ok(self
            .records()
            .iter()
            .find(|record| {
                &record.user_id == user_id && record.idempotency_key.as_ref() == Some(key)
            })
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Enrollment>, EnrollmentRepositoryError> {
        let mut owned: Vec<Enrollment> = self
            .records()
            .iter()
            .filter(|record| &record.user_id == user_id)
            .cloned()
            .collect();
        // Ties keep the most recent insert first.
        owned.reverse();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CourseId, EmailAddress};
    use chrono::{Duration, TimeZone, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    fn enrollment(user: &UserId, minutes: i64, key: Option<IdempotencyKey>) -> Enrollment {
        Enrollment {
            id: Uuid::new_v4(),
            full_name: "Jane Doe".to_owned(),
            email: EmailAddress::new("jane@example.com").expect("email"),
            course_id: CourseId::new(2),
            user_id: user.clone(),
            created_at: Utc
                .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
                .single()
                .expect("timestamp")
                + Duration::minutes(minutes),
            idempotency_key: key,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn lists_only_the_owner_newest_first() {
        let repo = MemoryEnrollmentRepository::new();
        let jane = UserId::random();
        let older = enrollment(&jane, 0, None);
        let newer = enrollment(&jane, 5, None);
        repo.insert(&older).await.expect("insert");
        repo.insert(&enrollment(&UserId::random(), 1, None))
            .await
            .expect("insert");
        repo.insert(&newer).await.expect("insert");

        let listed = repo.list_for_user(&jane).await.expect("list");

        assert_eq!(listed, vec![newer, older]);
    }

    #[rstest]
    #[tokio::test]
    async fn identical_records_without_key_are_both_kept() {
        let repo = MemoryEnrollmentRepository::new();
        let jane = UserId::random();
        repo.insert(&enrollment(&jane, 0, None)).await.expect("first");
        repo.insert(&enrollment(&jane, 0, None)).await.expect("second");
        assert_eq!(repo.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn reused_key_is_a_duplicate() {
        let repo = MemoryEnrollmentRepository::new();
        let jane = UserId::random();
        let key = IdempotencyKey::random();
        let first = enrollment(&jane, 0, Some(key));
        repo.insert(&first).await.expect("first");

        let err = repo
            .insert(&enrollment(&jane, 1, Some(key)))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, EnrollmentRepositoryError::DuplicateKey { .. }));
        assert_eq!(
            repo.find_by_idempotency_key(&jane, &key).await.expect("find"),
            Some(first)
        );
    }
}
