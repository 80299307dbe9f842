//! Enrollment handlers.
//!
//! ```text
//! GET  /api/v1/enrollment
//! POST /api/v1/enrollments {"fullName":"Jane Doe","email":"jane@example.com","courseId":2}
//! GET  /api/v1/enrollments
//! ```
//!
//! A successful submission writes the enrolled name and course into the
//! handoff slots read by `GET /api/v1/welcome`.

use actix_web::{HttpRequest, HttpResponse, get, post, web};

use crate::domain::navigation::WELCOME_PATH;
use crate::domain::{EnrollmentForm, ErrorCode, HandoffSlot};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    EnrollmentConfirmationResponse, EnrollmentFormResponse, EnrollmentRequest, EnrollmentResponse,
};
use crate::inbound::http::idempotency::idempotency_key;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

impl From<EnrollmentRequest> for EnrollmentForm {
    fn from(request: EnrollmentRequest) -> Self {
        Self {
            full_name: request.full_name.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
            course_id: request.course_id,
        }
    }
}

/// Enrollment form data with the previously selected course preselected.
///
/// A selection that no longer exists in the catalog is dropped from the
/// session and the caller is sent back to the catalog.
#[utoipa::path(
    get,
    path = "/api/v1/enrollment",
    responses(
        (status = 200, description = "Form data", body = EnrollmentFormResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Selected course no longer listed", body = ErrorSchema),
        (status = 503, description = "Catalog unavailable", body = ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "enrollmentForm"
)]
#[get("/enrollment")]
pub async fn enrollment_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<EnrollmentFormResponse>> {
    let identity = session.require_identity()?;
    let handoff = session.handoff();
    let selected = handoff.selected_course()?;
    match state.catalog.enrollment_form(selected.as_ref()).await {
        Ok(view) => Ok(web::Json(EnrollmentFormResponse::new(view, &identity))),
        Err(error) => {
            if error.code() == ErrorCode::NotFound {
                handoff.clear(HandoffSlot::SelectedCourse);
            }
            Err(error)
        }
    }
}

/// Submit an enrollment.
///
/// Without an `Idempotency-Key`, identical submissions store separate
/// records. With one, a repeat returns the original confirmation.
#[utoipa::path(
    post,
    path = "/api/v1/enrollments",
    request_body = EnrollmentRequest,
    params(
        ("Idempotency-Key" = Option<String>, Header, description = "UUID making the submission safe to retry")
    ),
    responses(
        (status = 201, description = "Enrollment stored", body = EnrollmentConfirmationResponse),
        (status = 200, description = "Earlier submission replayed", body = EnrollmentConfirmationResponse),
        (status = 400, description = "Invalid form", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 503, description = "Enrollment store unavailable", body = ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "submitEnrollment"
)]
#[post("/enrollments")]
pub async fn submit_enrollment(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    payload: web::Json<EnrollmentRequest>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_identity()?;
    let key = idempotency_key(request.headers())?;
    let form = EnrollmentForm::from(payload.into_inner());
    let confirmation = state
        .enrollments
        .submit(Some(&identity), &form, key)
        .await?;
    session.handoff().record_confirmation(&confirmation)?;

    let mut response = if confirmation.replayed {
        HttpResponse::Ok()
    } else {
        HttpResponse::Created()
    };
    Ok(response.json(EnrollmentConfirmationResponse::new(
        confirmation,
        WELCOME_PATH,
    )))
}

/// Enrollments owned by the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/enrollments",
    responses(
        (status = 200, description = "Caller's enrollments", body = [EnrollmentResponse]),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 503, description = "Enrollment store unavailable", body = ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "listEnrollments"
)]
#[get("/enrollments")]
pub async fn list_enrollments(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<EnrollmentResponse>>> {
    let identity = session.identity()?;
    let enrollments = state.enrollments.list_for_user(identity.as_ref()).await?;
    Ok(web::Json(
        enrollments
            .into_iter()
            .map(EnrollmentResponse::from)
            .collect(),
    ))
}

#[cfg(test)]
#[path = "enrollments_tests.rs"]
mod tests;
