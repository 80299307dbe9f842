//! Behaviour tests for the browse, select, enroll and welcome journey.
//!
//! Each step drives the full `/api/v1` surface through the in-memory
//! adapters, carrying the session cookie between requests the way a browser
//! would.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

mod support;

use std::cell::RefCell;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test::{self as actix_test, TestRequest};
use learnhub::domain::TRACE_ID_HEADER;
use learnhub::inbound::http::idempotency::IDEMPOTENCY_KEY_HEADER;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

use support::{TestServer, json_body, session_cookie, sign_up};

const RETRY_KEY: &str = "0d8f9a42-3c61-4f0a-b1a7-9e2c5d4b7a10";

#[derive(Debug, Clone)]
struct Recorded {
    status: StatusCode,
    trace_id: Option<String>,
    body: Value,
}

struct JourneyWorld {
    runner: actix_rt::SystemRunner,
    server: TestServer,
    cookie: RefCell<Option<Cookie<'static>>>,
    responses: RefCell<Vec<Recorded>>,
}

impl JourneyWorld {
    fn new() -> Self {
        Self {
            runner: actix_rt::System::new(),
            server: TestServer::new(),
            cookie: RefCell::new(None),
            responses: RefCell::new(Vec::new()),
        }
    }

    /// Send `request` with the current cookie and record the outcome.
    fn send(&self, request: TestRequest) {
        let request = match self.cookie.borrow().clone() {
            Some(cookie) => request.cookie(cookie),
            None => request,
        };
        let app = self.server.app();
        let recorded = self.runner.block_on(async move {
            let service = actix_test::init_service(app).await;
            let response = actix_test::call_service(&service, request.to_request()).await;
            let status = response.status();
            let trace_id = response
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let cookie = session_cookie(&response);
            let body = json_body(response).await;
            (
                Recorded {
                    status,
                    trace_id,
                    body,
                },
                cookie,
            )
        });
        let (recorded, cookie) = recorded;
        if let Some(cookie) = cookie {
            *self.cookie.borrow_mut() = Some(cookie);
        }
        self.responses.borrow_mut().push(recorded);
    }

    fn last(&self) -> Recorded {
        self.responses
            .borrow()
            .last()
            .cloned()
            .expect("a recorded response")
    }

    fn nth_from_last(&self, back: usize) -> Recorded {
        let responses = self.responses.borrow();
        let index = responses
            .len()
            .checked_sub(back + 1)
            .expect("enough recorded responses");
        responses.get(index).cloned().expect("recorded response")
    }
}

fn enrollment(full_name: &str, email: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/v1/enrollments")
        .set_json(json!({ "fullName": full_name, "email": email, "courseId": 2 }))
}

#[fixture]
fn world() -> JourneyWorld {
    JourneyWorld::new()
}

#[given("a running LearnHub server")]
fn a_running_learnhub_server(world: &JourneyWorld) {
    let _ = world;
}

#[given("a learner signed up as {email}")]
fn a_learner_signed_up_as(world: &JourneyWorld, email: String) {
    let app = world.server.app();
    let cookie = world.runner.block_on(async move {
        let service = actix_test::init_service(app).await;
        sign_up(&service, email.trim_matches('"')).await
    });
    *world.cookie.borrow_mut() = Some(cookie);
}

#[when("the learner selects course {id}")]
fn the_learner_selects_course(world: &JourneyWorld, id: i32) {
    world.send(TestRequest::post().uri(&format!("/api/v1/courses/{id}/select")));
    assert_eq!(world.last().status, StatusCode::OK);
}

#[when("the learner enrolls as {name} with email {email}")]
fn the_learner_enrolls_as(world: &JourneyWorld, name: String, email: String) {
    world.send(enrollment(name.trim_matches('"'), email.trim_matches('"')));
}

#[when("the learner enrolls twice with the same idempotency key")]
fn the_learner_enrolls_twice(world: &JourneyWorld) {
    for _ in 0..2 {
        world.send(
            enrollment("Jane Doe", "jane@example.com")
                .insert_header((IDEMPOTENCY_KEY_HEADER, RETRY_KEY)),
        );
    }
}

#[when("the learner opens the welcome page")]
fn the_learner_opens_the_welcome_page(world: &JourneyWorld) {
    world.send(TestRequest::get().uri("/api/v1/welcome"));
}

#[when("the learner opens the course catalog")]
fn the_learner_opens_the_course_catalog(world: &JourneyWorld) {
    world.send(TestRequest::get().uri("/api/v1/courses"));
}

#[when("an anonymous visitor opens the course catalog")]
fn an_anonymous_visitor_opens_the_course_catalog(world: &JourneyWorld) {
    *world.cookie.borrow_mut() = None;
    world.send(TestRequest::get().uri("/api/v1/courses"));
}

#[when("the learner signs out")]
fn the_learner_signs_out(world: &JourneyWorld) {
    world.send(TestRequest::post().uri("/api/v1/logout"));
    assert_eq!(world.last().status, StatusCode::OK);
}

#[then("the enrollment is created")]
fn the_enrollment_is_created(world: &JourneyWorld) {
    let last = world.last();
    assert_eq!(last.status, StatusCode::CREATED);
    assert_eq!(last.body["redirect"], "/welcome");
}

#[then("the welcome page greets {name} for {title}")]
fn the_welcome_page_greets(world: &JourneyWorld, name: String, title: String) {
    world.send(TestRequest::get().uri("/api/v1/welcome"));
    let last = world.last();
    assert_eq!(last.status, StatusCode::OK);
    assert_eq!(
        last.body["enrolledUser"].as_str(),
        Some(name.trim_matches('"'))
    );
    assert_eq!(
        last.body["course"]["title"].as_str(),
        Some(title.trim_matches('"'))
    );
}

#[then("the second response replays the first enrollment")]
fn the_second_response_replays_the_first(world: &JourneyWorld) {
    let first = world.nth_from_last(1);
    let second = world.last();
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["replayed"], true);
    assert_eq!(second.body["enrollmentId"], first.body["enrollmentId"]);
}

#[then("the learner has {count} enrollment on record")]
fn the_learner_has_enrollments_on_record(world: &JourneyWorld, count: usize) {
    world.send(TestRequest::get().uri("/api/v1/enrollments"));
    let last = world.last();
    assert_eq!(last.status, StatusCode::OK);
    assert_eq!(last.body.as_array().map(Vec::len), Some(count));
}

#[then("the response is not found with redirect {redirect}")]
fn the_response_is_not_found(world: &JourneyWorld, redirect: String) {
    let last = world.last();
    assert_eq!(last.status, StatusCode::NOT_FOUND);
    assert_eq!(
        last.body["details"]["redirect"].as_str(),
        Some(redirect.trim_matches('"'))
    );
}

#[then("the response is unauthorised with redirect {redirect}")]
fn the_response_is_unauthorised(world: &JourneyWorld, redirect: String) {
    let last = world.last();
    assert_eq!(last.status, StatusCode::UNAUTHORIZED);
    assert_eq!(last.body["message"], "Please login first");
    assert_eq!(
        last.body["details"]["redirect"].as_str(),
        Some(redirect.trim_matches('"'))
    );
}

#[then("the response carries a trace id")]
fn the_response_carries_a_trace_id(world: &JourneyWorld) {
    let last = world.last();
    let trace_id = last.trace_id.expect("trace id header");
    assert_eq!(last.body["traceId"].as_str(), Some(trace_id.as_str()));
}

#[scenario(path = "tests/features/enrollment_journey.feature")]
fn enrollment_journey_scenarios(world: JourneyWorld) {
    drop(world);
}
