//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::{build_ports, seed_catalog};

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use learnhub::Trace;
#[cfg(debug_assertions)]
use learnhub::doc::ApiDoc;
use learnhub::domain::AuthStateNotifier;
use learnhub::inbound::http::configure_api;
use learnhub::inbound::http::health::{HealthState, live, ready};
use learnhub::inbound::http::state::HttpState;
use learnhub::inbound::ws;
use learnhub::inbound::ws::state::WsState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SESSION_TTL_HOURS: i64 = 2;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn session_middleware(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(actix_web::cookie::time::Duration::hours(SESSION_TTL_HOURS)),
        )
        .build()
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        ws_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let api = web::scope("/api/v1")
        .wrap(session_middleware(key.clone(), cookie_secure, same_site))
        .configure(configure_api);
    let sockets = web::scope("/ws")
        .wrap(session_middleware(key, cookie_secure, same_site))
        .service(ws::ws_auth);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(ws_state)
        .wrap(Trace)
        .service(api)
        .service(sockets)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app
}

/// Assemble ports, seed the catalog, and bind the listener.
///
/// Readiness flips once the catalog is seeded and the socket is bound.
///
/// # Errors
///
/// Propagates seeding failures and [`std::io::Error`] from binding.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ports = build_ports(&config);
    seed_catalog(ports.catalog.as_ref(), config.seed_courses).await?;

    let notifier = AuthStateNotifier::new();
    let http_state = HttpState::new(ports, notifier);
    let ws_state = web::Data::new(WsState::new(
        http_state.auth.clone(),
        config.allowed_origins.clone(),
    ));
    let http_state = web::Data::new(http_state);
    let ServerConfig {
        session,
        bind_addr,
        ..
    } = config;
    let (key, cookie_secure, same_site) = (session.key, session.cookie_secure, session.same_site);

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            ws_state: ws_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}
