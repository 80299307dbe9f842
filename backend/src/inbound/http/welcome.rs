//! Confirmation view rebuilt from the handoff slots.

use actix_web::{get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::WelcomeResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;

/// Show the last confirmed enrollment for this browser.
///
/// Requires a signed-in session first, then both the `enrolled_user` and
/// `selected_course` slots.
#[utoipa::path(
    get,
    path = "/api/v1/welcome",
    responses(
        (status = 200, description = "Enrollment confirmation", body = WelcomeResponse),
        (status = 401, description = "Not signed in; redirect to /login", body = ErrorSchema),
        (status = 404, description = "No confirmation; redirect to /courses", body = ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "welcome"
)]
#[get("/welcome")]
pub async fn welcome(session: SessionContext) -> ApiResult<web::Json<WelcomeResponse>> {
    let identity = session.require_identity()?;
    let view = session.handoff().welcome()?;
    Ok(web::Json(WelcomeResponse::new(view, &identity)))
}
