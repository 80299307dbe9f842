//! Diesel row structs. Internal to the persistence adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Course, CourseId, EmailAddress, Enrollment, IdempotencyKey, Identity, UserId,
};

use super::schema::{courses, enrollments, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

impl UserRow {
    /// Split into the domain identity and the stored hash.
    ///
    /// Fails only if a row was written around the email normaliser.
    pub fn into_parts(self) -> Result<(Identity, String), String> {
        let email = EmailAddress::new(&self.email)
            .map_err(|err| format!("stored email for user {} is invalid: {err}", self.id))?;
        Ok((
            Identity::new(UserId::from_uuid(self.id), email),
            self.password_hash,
        ))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub duration: String,
    pub level: String,
    pub image: String,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Self {
            id: CourseId::new(row.id),
            title: row.title,
            description: row.description,
            instructor: row.instructor,
            duration: row.duration,
            level: row.level,
            image: row.image,
        }
    }
}

impl From<&Course> for CourseRow {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.get(),
            title: course.title.clone(),
            description: course.description.clone(),
            instructor: course.instructor.clone(),
            duration: course.duration.clone(),
            level: course.level.clone(),
            image: course.image.clone(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EnrollmentRow {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub course_id: i32,
    pub user_id: Uuid,
    pub idempotency_key: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<&Enrollment> for EnrollmentRow {
    fn from(record: &Enrollment) -> Self {
        Self {
            id: record.id,
            full_name: record.full_name.clone(),
            email: record.email.to_string(),
            course_id: record.course_id.get(),
            user_id: *record.user_id.as_uuid(),
            idempotency_key: record.idempotency_key.map(|key| *key.as_uuid()),
            created_at: record.created_at,
        }
    }
}

impl TryFrom<EnrollmentRow> for Enrollment {
    type Error = String;

    fn try_from(row: EnrollmentRow) -> Result<Self, Self::Error> {
        let email = EmailAddress::new(&row.email)
            .map_err(|err| format!("stored email for enrollment {} is invalid: {err}", row.id))?;
        Ok(Self {
            id: row.id,
            full_name: row.full_name,
            email,
            course_id: CourseId::new(row.course_id),
            user_id: UserId::from_uuid(row.user_id),
            created_at: row.created_at,
            idempotency_key: row.idempotency_key.map(IdempotencyKey::from_uuid),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed_courses;
    use rstest::rstest;

    #[rstest]
    fn course_rows_convert_both_ways() {
        let course = seed_courses().remove(1);
        let row = CourseRow::from(&course);
        assert_eq!(row.id, 2);
        assert_eq!(Course::from(row), course);
    }

    #[rstest]
    fn enrollment_with_bad_stored_email_is_rejected() {
        let row = EnrollmentRow {
            id: Uuid::new_v4(),
            full_name: "Jane Doe".to_owned(),
            email: "not-an-email".to_owned(),
            course_id: 2,
            user_id: Uuid::new_v4(),
            idempotency_key: None,
            created_at: Utc::now(),
        };
        assert!(Enrollment::try_from(row).is_err());
    }

    #[rstest]
    fn user_row_splits_into_identity_and_hash() {
        let id = Uuid::new_v4();
        let row = UserRow {
            id,
            email: "jane@example.com".to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
        };
        let (identity, hash) = row.into_parts().expect("valid row");
        assert_eq!(identity.user_id().as_uuid(), &id);
        assert_eq!(hash, "$argon2id$stub");
    }
}
