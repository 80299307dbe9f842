//! Domain primitives, services, and ports.
//!
//! Purpose: model accounts, the course catalog, enrollments, and the
//! cross-view handoff state independently of HTTP, WebSocket, or storage.
//! Adapters depend on this module; it depends on none of them.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Identity, Credentials, Course, Enrollment: validated value types.
//! - AuthService, CatalogService, EnrollmentService: use-cases over ports.
//! - Handoff: typed access to the per-session handoff slots.
//! - AuthStateNotifier: push delivery of login and logout transitions.

pub mod auth_service;
pub mod auth_state;
pub mod catalog_service;
pub mod course;
pub mod enrollment;
pub mod enrollment_service;
pub mod error;
pub mod handoff;
pub mod identity;
pub mod navigation;
pub mod ports;
pub mod trace_id;

pub use self::auth_service::AuthService;
pub use self::auth_state::{AuthStateNotifier, SessionId, Subscription};
pub use self::catalog_service::{CatalogService, EnrollmentFormView};
pub use self::course::{Course, CourseId, seed_courses};
pub use self::enrollment::{
    Enrollment, EnrollmentConfirmation, EnrollmentField, EnrollmentForm,
    EnrollmentValidationError, FULL_NAME_MIN_LEN, FieldError, IdempotencyKey,
    IdempotencyKeyValidationError, ValidEnrollmentForm,
};
pub use self::enrollment_service::EnrollmentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::handoff::{Handoff, HandoffSlot, MemoryHandoffStore, WelcomeView};
pub use self::identity::{
    Credentials, EmailAddress, Identity, IdentityValidationError, PASSWORD_MIN_LEN, UserId,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
