//! WebSocket inbound adapter pushing auth-state changes to the browser.
//!
//! `GET /ws/auth` upgrades only for a signed-in session and an allow-listed
//! `Origin`. The connection then receives the current identity followed by
//! every later login or logout of the same user.

use actix_web::http::header::{HeaderValue, ORIGIN};
use actix_web::web::{self, Payload};
use actix_web::{HttpRequest, HttpResponse, get};
use tracing::{error, info, warn};
use url::Url;

use crate::inbound::http::session::SessionContext;

mod session;

pub mod messages;
pub mod state;

use state::AllowedOrigins;

/// Upgrade to the auth-state push channel.
#[get("/auth")]
pub async fn ws_auth(
    state: web::Data<state::WsState>,
    session: SessionContext,
    req: HttpRequest,
    body: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origins = req.headers().get_all(ORIGIN);
    let origin = origins.next().ok_or_else(|| {
        warn!("missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origins.next().is_some() {
        warn!("multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }
    validate_origin(&state.allowed_origins, origin)?;

    let (identity, sign_in) = session.require_sign_in()?;
    let (response, ws_session, stream) = actix_ws::handle(&req, body).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        error
    })?;
    info!(user_id = %identity.user_id(), "auth-state socket opened");
    actix_web::rt::spawn(session::handle_auth_session(
        state.auth.clone(),
        identity,
        sign_in,
        ws_session,
        stream,
    ));
    Ok(response)
}

fn validate_origin(allowed: &AllowedOrigins, header: &HeaderValue) -> actix_web::Result<()> {
    let raw = header.to_str().map_err(|error| {
        warn!(error = %error, "Origin header is not valid UTF-8");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;
    let origin = Url::parse(raw).map_err(|error| {
        warn!(error = %error, "Origin header is not a URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;
    if allowed.admits(&origin) {
        Ok(())
    } else {
        warn!(origin = raw, "rejected WebSocket upgrade from disallowed Origin");
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}
