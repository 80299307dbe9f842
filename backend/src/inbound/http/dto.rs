//! Request and response bodies for the JSON API.
//!
//! Domain types stay free of `ToSchema`; these DTOs own the wire shape and
//! the OpenAPI description.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Course, Enrollment, EnrollmentConfirmation, EnrollmentFormView, Identity, WelcomeView,
};

/// Request body for `POST /api/v1/register` and `POST /api/v1/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "secret1", format = Password)]
    pub password: String,
}

/// Signed-in user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
}

impl From<&Identity> for IdentityResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            user_id: identity.user_id().to_string(),
            email: identity.email().to_string(),
        }
    }
}

/// Auth transition outcome with the view the client should show next.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: Option<IdentityResponse>,
    #[schema(example = "/courses")]
    pub redirect: String,
}

/// Catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    #[schema(example = 2)]
    pub id: i32,
    #[schema(example = "Advanced React Patterns")]
    pub title: String,
    pub description: String,
    #[schema(example = "Michael Chen")]
    pub instructor: String,
    #[schema(example = "6 weeks")]
    pub duration: String,
    #[schema(example = "Advanced")]
    pub level: String,
    pub image: String,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id.get(),
            title: course.title,
            description: course.description,
            instructor: course.instructor,
            duration: course.duration,
            level: course.level,
            image: course.image,
        }
    }
}

/// Enrollment form data: every course plus the preselected one.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentFormResponse {
    pub courses: Vec<CourseResponse>,
    pub selected_course_id: Option<i32>,
    /// Prefill for the email field, taken from the signed-in identity.
    pub email: String,
}

impl EnrollmentFormResponse {
    pub fn new(view: EnrollmentFormView, identity: &Identity) -> Self {
        Self {
            courses: view.courses.into_iter().map(CourseResponse::from).collect(),
            selected_course_id: view.selected_course_id.map(|id| id.get()),
            email: identity.email().to_string(),
        }
    }
}

/// Request body for `POST /api/v1/enrollments`.
///
/// Fields are optional on the wire so missing values surface as field
/// validation errors rather than JSON decoding failures.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    #[schema(example = "Jane Doe")]
    pub full_name: Option<String>,
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
    #[schema(example = 2)]
    pub course_id: Option<i32>,
}

/// Confirmation of a stored enrollment.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentConfirmationResponse {
    pub enrollment_id: String,
    #[schema(example = "Jane Doe")]
    pub enrolled_user: String,
    pub course: CourseResponse,
    /// Set when an `Idempotency-Key` matched an earlier submission.
    pub replayed: bool,
    #[schema(example = "/welcome")]
    pub redirect: String,
}

impl EnrollmentConfirmationResponse {
    pub fn new(confirmation: EnrollmentConfirmation, redirect: &str) -> Self {
        Self {
            enrollment_id: confirmation.enrollment_id.to_string(),
            enrolled_user: confirmation.enrolled_user,
            course: CourseResponse::from(confirmation.course),
            replayed: confirmation.replayed,
            redirect: redirect.to_owned(),
        }
    }
}

/// Stored enrollment owned by the caller.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub course_id: i32,
    pub created_at: String,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            id: enrollment.id.to_string(),
            full_name: enrollment.full_name,
            email: enrollment.email.to_string(),
            course_id: enrollment.course_id.get(),
            created_at: enrollment.created_at.to_rfc3339(),
        }
    }
}

/// Confirmation view rebuilt from the handoff slots.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeResponse {
    #[schema(example = "Jane Doe")]
    pub enrolled_user: String,
    pub course: CourseResponse,
    /// Signed-in user shown in the page header.
    pub user: IdentityResponse,
}

impl WelcomeResponse {
    pub fn new(view: WelcomeView, identity: &Identity) -> Self {
        Self {
            enrolled_user: view.enrolled_user,
            course: CourseResponse::from(view.course),
            user: IdentityResponse::from(identity),
        }
    }
}
