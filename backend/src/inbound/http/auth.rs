//! Account handlers: registration, login, logout, and the current identity.
//!
//! ```text
//! POST /api/v1/register {"email":"jane@example.com","password":"secret1"}
//! POST /api/v1/login    {"email":"jane@example.com","password":"secret1"}
//! POST /api/v1/logout
//! GET  /api/v1/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde_json::json;

use crate::domain::navigation::{CATALOG_PATH, LOGIN_PATH};
use crate::domain::{Credentials, Error, IdentityValidationError, SessionId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{AuthResponse, CredentialsRequest, IdentityResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

fn map_credentials_error(err: &IdentityValidationError) -> Error {
    let (field, code) = match err {
        IdentityValidationError::EmptyEmail => ("email", "empty_email"),
        IdentityValidationError::InvalidEmail => ("email", "invalid_email"),
        IdentityValidationError::EmptyPassword => ("password", "empty_password"),
        IdentityValidationError::WeakPassword { .. } => ("password", "weak_password"),
        IdentityValidationError::EmptyUserId | IdentityValidationError::InvalidUserId => {
            ("userId", "invalid_user_id")
        }
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

fn parse_credentials(payload: web::Json<CredentialsRequest>) -> Result<Credentials, Error> {
    let request = payload.into_inner();
    Credentials::try_from_parts(&request.email, &request.password)
        .map_err(|err| map_credentials_error(&err))
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid email or weak password", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Identity provider unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = parse_credentials(payload)?;
    let sign_in = SessionId::random();
    let identity = state.auth.register(&credentials, sign_in).await?;
    session.persist_identity(&identity, sign_in)?;
    Ok(HttpResponse::Created().json(AuthResponse {
        user: Some(IdentityResponse::from(&identity)),
        redirect: CATALOG_PATH.to_owned(),
    }))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Identity provider unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let credentials = parse_credentials(payload)?;
    let sign_in = SessionId::random();
    let identity = state.auth.login(&credentials, sign_in).await?;
    session.persist_identity(&identity, sign_in)?;
    Ok(web::Json(AuthResponse {
        user: Some(IdentityResponse::from(&identity)),
        redirect: CATALOG_PATH.to_owned(),
    }))
}

/// End the session and drop every handoff slot.
///
/// Succeeds for anonymous callers too, so a stale tab can always log out.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Session ended", body = AuthResponse)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AuthResponse>> {
    let handoff = session.handoff();
    if let (Some(identity), Some(sign_in)) = (handoff.current_user()?, handoff.auth_session()?) {
        state.auth.logout(&identity, sign_in).await;
    }
    handoff.clear_all();
    Ok(web::Json(AuthResponse {
        user: None,
        redirect: LOGIN_PATH.to_owned(),
    }))
}

/// Current signed-in identity.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Signed-in user", body = IdentityResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(session: SessionContext) -> ApiResult<web::Json<IdentityResponse>> {
    let identity = session.require_identity()?;
    Ok(web::Json(IdentityResponse::from(&identity)))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
