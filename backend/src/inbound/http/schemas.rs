//! OpenAPI schema definitions for domain error types.
//!
//! The domain error stays framework-agnostic by not deriving `ToSchema`;
//! these wrappers mirror its wire shape for the generated document.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No signed-in session; `details.redirect` points at the login view.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Missing resource or handoff state; `details.redirect` points at the
    /// catalog.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request collides with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store is unreachable; `details.retryable` is set.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "unauthorized")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Please login first")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "6f1c2b2e-8a53-4c0e-9f5e-2d1e7a0e4b11")]
    trace_id: Option<String>,
    /// Supplementary details such as `redirect`, `field`, or `retryable`.
    #[schema(value_type = Option<Object>, example = json!({"redirect": "/login"}))]
    details: Option<serde_json::Value>,
}
