//! HTTP inbound adapter exposing the JSON API under `/api/v1`.

use actix_web::web;

pub mod auth;
pub mod courses;
pub mod dto;
pub mod enrollments;
pub mod error;
pub mod health;
pub mod idempotency;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod welcome;

pub use error::ApiResult;

/// Register every `/api/v1` handler on a scope.
///
/// The caller wraps the scope in session middleware and provides
/// [`state::HttpState`] as app data.
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
/// use learnhub::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::current_user)
        .service(courses::list_courses)
        .service(courses::get_course)
        .service(courses::select_course)
        .service(enrollments::enrollment_form)
        .service(enrollments::submit_enrollment)
        .service(enrollments::list_enrollments)
        .service(welcome::welcome);
}
