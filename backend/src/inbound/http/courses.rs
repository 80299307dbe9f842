//! Catalog handlers.
//!
//! ```text
//! GET  /api/v1/courses
//! GET  /api/v1/courses/{id}
//! POST /api/v1/courses/{id}/select
//! ```
//!
//! Browsing requires a signed-in session. Selecting a course stores it in
//! the `selected_course` handoff slot for the enrollment form.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::CourseId;
use crate::domain::navigation::ENROLL_PATH;
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::CourseResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize)]
pub struct CoursePath {
    id: i32,
}

/// Response body for `POST /api/v1/courses/{id}/select`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectCourseResponse {
    pub course: CourseResponse,
    #[schema(example = "/enroll")]
    pub redirect: String,
}

/// List every course in catalog order.
#[utoipa::path(
    get,
    path = "/api/v1/courses",
    responses(
        (status = 200, description = "Course catalog", body = [CourseResponse]),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 503, description = "Catalog unavailable", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "listCourses"
)]
#[get("/courses")]
pub async fn list_courses(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CourseResponse>>> {
    session.require_identity()?;
    let courses = state.catalog.list_courses().await?;
    Ok(web::Json(
        courses.into_iter().map(CourseResponse::from).collect(),
    ))
}

/// Fetch one course.
#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    params(("id" = i32, Path, description = "Course identifier")),
    responses(
        (status = 200, description = "Course", body = CourseResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown course", body = ErrorSchema),
        (status = 503, description = "Catalog unavailable", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "getCourse"
)]
#[get("/courses/{id}")]
pub async fn get_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CoursePath>,
) -> ApiResult<web::Json<CourseResponse>> {
    session.require_identity()?;
    let course = state.catalog.get_course(CourseId::new(path.id)).await?;
    Ok(web::Json(CourseResponse::from(course)))
}

/// Remember a course for the enrollment form.
#[utoipa::path(
    post,
    path = "/api/v1/courses/{id}/select",
    params(("id" = i32, Path, description = "Course identifier")),
    responses(
        (status = 200, description = "Course selected", body = SelectCourseResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown course", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "selectCourse"
)]
#[post("/courses/{id}/select")]
pub async fn select_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CoursePath>,
) -> ApiResult<web::Json<SelectCourseResponse>> {
    session.require_identity()?;
    let course = state.catalog.get_course(CourseId::new(path.id)).await?;
    session.handoff().set_selected_course(&course)?;
    debug!(course_id = %course.id, "course selected");
    Ok(web::Json(SelectCourseResponse {
        course: CourseResponse::from(course),
        redirect: ENROLL_PATH.to_owned(),
    }))
}

#[cfg(test)]
#[path = "courses_tests.rs"]
mod tests;
