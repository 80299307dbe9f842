//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! the app wiring used by more than one suite lives here. Each helper builds
//! only from the public library surface.

use std::sync::Arc;

use actix_http::Request;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};

use learnhub::Trace;
use learnhub::domain::AuthStateNotifier;
use learnhub::inbound::http::configure_api;
use learnhub::inbound::http::state::{HttpState, HttpStatePorts};
use learnhub::inbound::ws;
use learnhub::inbound::ws::state::{AllowedOrigins, WsState};
use learnhub::outbound::memory::{
    MemoryEnrollmentRepository, MemoryIdentityProvider, StaticCourseCatalog,
};

/// Origin admitted by [`TestServer::new`].
pub const FRONTEND_ORIGIN: &str = "http://localhost:3000";

/// Shared state for one simulated deployment.
///
/// Apps built from the same `TestServer` share accounts, enrollments and
/// the cookie key, so a cookie issued by one app works on the next.
#[derive(Clone)]
pub struct TestServer {
    pub http: web::Data<HttpState>,
    pub ws: web::Data<WsState>,
    key: Key,
}

impl TestServer {
    pub fn new() -> Self {
        let http = HttpState::new(
            HttpStatePorts {
                identity: Arc::new(MemoryIdentityProvider::new()),
                catalog: Arc::new(StaticCourseCatalog::seeded()),
                enrollments: Arc::new(MemoryEnrollmentRepository::new()),
                clock: Arc::new(DefaultClock),
            },
            AuthStateNotifier::new(),
        );
        let origins = AllowedOrigins::parse([FRONTEND_ORIGIN, "https://*.learnhub.example"])
            .expect("allow-list");
        let ws = WsState::new(http.auth.clone(), origins);
        Self {
            http: web::Data::new(http),
            ws: web::Data::new(ws),
            key: Key::generate(),
        }
    }

    fn session_middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name("session".to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(false)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(SameSite::Lax)
            .session_lifecycle(PersistentSession::default().session_ttl(CookieDuration::hours(2)))
            .build()
    }

    /// The production route layout: `/api/v1`, `/ws/auth`, trace middleware.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(self.http.clone())
            .app_data(self.ws.clone())
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(self.session_middleware())
                    .configure(configure_api),
            )
            .service(
                web::scope("/ws")
                    .wrap(self.session_middleware())
                    .service(ws::ws_auth),
            )
    }
}

/// The `session` cookie set on `response`, if any.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Register `email` with a valid password and return the session cookie.
pub async fn sign_up<S>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/register")
        .set_json(json!({ "email": email, "password": "secret1" }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    session_cookie(&response).expect("session cookie")
}

/// Read a JSON body.
pub async fn json_body(response: ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("json body")
}
