//! Behavioural tests for the auth-state socket's upgrade checks.

mod support;

use actix_web::http::header::HeaderValue;
use actix_web::{
    http::{StatusCode, header},
    test::{self, TestRequest},
};
use rstest::rstest;

use support::{FRONTEND_ORIGIN, TestServer, sign_up};

// Example Sec-WebSocket-Key from RFC 6455 section 1.3 used to satisfy handshake requirements.
const RFC6455_SAMPLE_KEY: &str = "dGhlIHNhbXBsZSBub25jZQ==";

fn handshake_request() -> TestRequest {
    TestRequest::get()
        .uri("/ws/auth")
        .insert_header((header::UPGRADE, "websocket"))
        .insert_header((header::CONNECTION, "Upgrade"))
        .insert_header((header::SEC_WEBSOCKET_VERSION, "13"))
        .insert_header((header::SEC_WEBSOCKET_KEY, RFC6455_SAMPLE_KEY))
}

#[derive(Debug, Clone, Copy)]
/// Origin header shapes a browser or a hostile client might send.
enum OriginHeaderCase {
    /// No Origin header present.
    Missing,
    /// Origin not in the allow-list.
    Unlisted,
    /// Multiple Origin headers (forbidden by RFC 6455).
    Multiple,
    /// Invalid UTF-8.
    Malformed,
    /// Wildcard entries match subdomains only, never the bare host.
    BareWildcardHost,
}

fn with_origin(request: TestRequest, origin_case: OriginHeaderCase) -> TestRequest {
    match origin_case {
        OriginHeaderCase::Missing => request,
        OriginHeaderCase::Unlisted => {
            request.append_header((header::ORIGIN, "https://example.com"))
        }
        OriginHeaderCase::Multiple => request
            .append_header((header::ORIGIN, FRONTEND_ORIGIN))
            .append_header((header::ORIGIN, "https://example.com")),
        OriginHeaderCase::Malformed => {
            let invalid = HeaderValue::from_bytes(&[0x80]).expect("opaque Origin header value");
            request.insert_header((header::ORIGIN, invalid))
        }
        OriginHeaderCase::BareWildcardHost => {
            request.insert_header((header::ORIGIN, "https://learnhub.example"))
        }
    }
}

#[rstest]
#[case(FRONTEND_ORIGIN)]
#[case("https://app.learnhub.example")]
fn upgrades_signed_in_clients_from_allowed_origins(#[case] origin: &str) {
    actix_rt::System::new().block_on(async move {
        let server = TestServer::new();
        let app = test::init_service(server.app()).await;
        let cookie = sign_up(&app, "jane@example.com").await;

        let req = handshake_request()
            .cookie(cookie)
            .insert_header((header::ORIGIN, origin))
            .to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(
            response.status(),
            StatusCode::SWITCHING_PROTOCOLS,
            "origin {origin}"
        );
    });
}

#[rstest]
#[case(OriginHeaderCase::Missing, StatusCode::FORBIDDEN)]
#[case(OriginHeaderCase::Unlisted, StatusCode::FORBIDDEN)]
#[case(OriginHeaderCase::Multiple, StatusCode::BAD_REQUEST)]
#[case(OriginHeaderCase::Malformed, StatusCode::BAD_REQUEST)]
#[case(OriginHeaderCase::BareWildcardHost, StatusCode::FORBIDDEN)]
fn rejects_disallowed_origin_headers(
    #[case] origin_case: OriginHeaderCase,
    #[case] expected: StatusCode,
) {
    actix_rt::System::new().block_on(async move {
        let server = TestServer::new();
        let app = test::init_service(server.app()).await;
        let cookie = sign_up(&app, "jane@example.com").await;

        let req = with_origin(handshake_request().cookie(cookie), origin_case).to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), expected, "{origin_case:?}");
    });
}

#[rstest]
fn anonymous_clients_cannot_subscribe() {
    actix_rt::System::new().block_on(async move {
        let server = TestServer::new();
        let app = test::init_service(server.app()).await;

        let req = handshake_request()
            .insert_header((header::ORIGIN, FRONTEND_ORIGIN))
            .to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    });
}
