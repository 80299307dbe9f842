//! Enrollment form validation, records, and confirmations.
//!
//! The form is validated as a whole before any write so callers receive every
//! failing field at once.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Course, CourseId, EmailAddress, UserId};

/// Minimum number of characters in a trimmed full name.
pub const FULL_NAME_MIN_LEN: usize = 2;

/// Form field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EnrollmentField {
    FullName,
    Email,
    CourseId,
}

impl EnrollmentField {
    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::CourseId => "courseId",
        }
    }
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: EnrollmentField,
    pub message: String,
}

impl FieldError {
    fn new(field: EnrollmentField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// All validation failures for one submission, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentValidationError {
    errors: Vec<FieldError>,
}

impl EnrollmentValidationError {
    /// Single-field failure.
    pub fn single(field: EnrollmentField, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(field, message)],
        }
    }

    /// Failing fields in declaration order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First failing field, used as the headline of the error payload.
    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }
}

impl fmt::Display for EnrollmentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first() {
            Some(error) => f.write_str(&error.message),
            None => f.write_str("enrollment form is invalid"),
        }
    }
}

impl std::error::Error for EnrollmentValidationError {}

/// Raw form values as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrollmentForm {
    pub full_name: String,
    pub email: String,
    pub course_id: Option<i32>,
}

/// Form values that passed validation. The course still has to resolve in
/// the catalog before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEnrollmentForm {
    full_name: String,
    email: EmailAddress,
    course_id: CourseId,
}

impl ValidEnrollmentForm {
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn course_id(&self) -> CourseId {
        self.course_id
    }
}

impl EnrollmentForm {
    /// Validate every field and collect all failures.
    ///
    /// # Examples
    /// ```
    /// use learnhub::domain::EnrollmentForm;
    ///
    /// let form = EnrollmentForm {
    ///     full_name: "Jane Doe".into(),
    ///     email: "jane@example.com".into(),
    ///     course_id: Some(2),
    /// };
    /// assert!(form.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<ValidEnrollmentForm, EnrollmentValidationError> {
        let mut errors = Vec::new();

        let full_name = self.full_name.trim();
        if full_name.chars().count() < FULL_NAME_MIN_LEN {
            errors.push(FieldError::new(
                EnrollmentField::FullName,
                "Full name must be at least 2 characters",
            ));
        }

        let email = EmailAddress::new(&self.email)
            .map_err(|_| {
                errors.push(FieldError::new(
                    EnrollmentField::Email,
                    "Please enter a valid email address",
                ));
            })
            .ok();

        let course_id = match self.course_id {
            Some(id) if id > 0 => Some(CourseId::new(id)),
            _ => {
                errors.push(FieldError::new(
                    EnrollmentField::CourseId,
                    "Please select a course",
                ));
                None
            }
        };

        match (email, course_id) {
            (Some(email), Some(course_id)) if errors.is_empty() => Ok(ValidEnrollmentForm {
                full_name: full_name.to_owned(),
                email,
                course_id,
            }),
            _ => Err(EnrollmentValidationError { errors }),
        }
    }
}

/// Client-supplied key that makes a submission safe to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(Uuid);

/// Reasons an idempotency key is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdempotencyKeyValidationError {
    EmptyKey,
    InvalidKey,
}

impl fmt::Display for IdempotencyKeyValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "idempotency key must not be empty"),
            Self::InvalidKey => write!(f, "idempotency key must be a valid UUID"),
        }
    }
}

impl std::error::Error for IdempotencyKeyValidationError {}

impl IdempotencyKey {
    /// Parse a key; surrounding whitespace is rejected rather than trimmed.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdempotencyKeyValidationError> {
        let raw = raw.as_ref();
        if raw.is_empty() {
            return Err(IdempotencyKeyValidationError::EmptyKey);
        }
        if raw.trim() != raw {
            return Err(IdempotencyKeyValidationError::InvalidKey);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| IdempotencyKeyValidationError::InvalidKey)
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored record of a user's intent to join a course. Never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: Uuid,
    pub full_name: String,
    pub email: EmailAddress,
    pub course_id: CourseId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<IdempotencyKey>,
}

/// Result of a successful submission.
///
/// `replayed` is set when an idempotency key matched an earlier submission
/// and no new record was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentConfirmation {
    pub enrollment_id: Uuid,
    pub enrolled_user: String,
    pub course: Course,
    pub replayed: bool,
}
