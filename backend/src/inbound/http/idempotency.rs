//! `Idempotency-Key` header parsing for enrollment submissions.

use actix_web::http::header::HeaderMap;
use serde_json::json;

use crate::domain::{Error, IdempotencyKey, IdempotencyKeyValidationError};

/// HTTP header name for idempotency keys.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Read the optional key; absent headers mean "no deduplication".
pub fn idempotency_key(headers: &HeaderMap) -> Result<Option<IdempotencyKey>, Error> {
    let Some(value) = headers.get(IDEMPOTENCY_KEY_HEADER) else {
        return Ok(None);
    };
    value
        .to_str()
        .map_err(|_| IdempotencyKeyValidationError::InvalidKey)
        .and_then(IdempotencyKey::new)
        .map(Some)
        .map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": IDEMPOTENCY_KEY_HEADER }))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    fn missing_header_is_none() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(idempotency_key(req.headers()).expect("no header"), None);
    }

    #[rstest]
    fn uuid_header_parses() {
        let req = TestRequest::default()
            .insert_header((IDEMPOTENCY_KEY_HEADER, "6f1c2b2e-8a53-4c0e-9f5e-2d1e7a0e4b11"))
            .to_http_request();
        let key = idempotency_key(req.headers())
            .expect("valid header")
            .expect("key present");
        assert_eq!(key.to_string(), "6f1c2b2e-8a53-4c0e-9f5e-2d1e7a0e4b11");
    }

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    fn malformed_header_is_rejected(#[case] raw: &str) {
        let req = TestRequest::default()
            .insert_header((IDEMPOTENCY_KEY_HEADER, raw))
            .to_http_request();
        let err = idempotency_key(req.headers()).expect_err("malformed key");
        assert_eq!(err.detail_str("field"), Some(IDEMPOTENCY_KEY_HEADER));
    }
}
