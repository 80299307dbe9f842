//! OpenAPI document for the `/api/v1` surface and health probes.
//!
//! Served by Swagger UI in debug builds and printed by the `openapi-dump`
//! binary. Domain types stay free of `utoipa`; error payloads are described
//! through the wrappers in [`crate::inbound::http::schemas`].

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::courses::SelectCourseResponse;
use crate::inbound::http::dto::{
    AuthResponse, CourseResponse, CredentialsRequest, EnrollmentConfirmationResponse,
    EnrollmentFormResponse, EnrollmentRequest, EnrollmentResponse, IdentityResponse,
    WelcomeResponse,
};
use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Registers the `session` cookie as the default security scheme.
struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by POST /api/v1/register or /api/v1/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SessionCookieAddon),
    info(
        title = "LearnHub API",
        description = "Course catalog browsing and enrollment behind a cookie session."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::courses::list_courses,
        crate::inbound::http::courses::get_course,
        crate::inbound::http::courses::select_course,
        crate::inbound::http::enrollments::enrollment_form,
        crate::inbound::http::enrollments::submit_enrollment,
        crate::inbound::http::enrollments::list_enrollments,
        crate::inbound::http::welcome::welcome,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CredentialsRequest,
        IdentityResponse,
        AuthResponse,
        CourseResponse,
        SelectCourseResponse,
        EnrollmentFormResponse,
        EnrollmentRequest,
        EnrollmentConfirmationResponse,
        EnrollmentResponse,
        WelcomeResponse,
        ProbeStatus,
        ErrorSchema,
        ErrorCodeSchema,
    )),
    tags(
        (name = "auth", description = "Registration, login and session identity"),
        (name = "courses", description = "Course catalog"),
        (name = "enrollments", description = "Enrollment form, submission and confirmation"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
