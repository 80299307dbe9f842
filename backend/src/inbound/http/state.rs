//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain services, which in turn only depend on ports. Tests build it
//! from mocks or in-memory adapters without any I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{CourseCatalog, EnrollmentRepository, IdentityProvider};
use crate::domain::{AuthService, AuthStateNotifier, CatalogService, EnrollmentService};

/// Port implementations the HTTP services are assembled from.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub identity: Arc<dyn IdentityProvider>,
    pub catalog: Arc<dyn CourseCatalog>,
    pub enrollments: Arc<dyn EnrollmentRepository>,
    pub clock: Arc<dyn Clock>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: AuthService,
    pub catalog: CatalogService,
    pub enrollments: EnrollmentService,
}

impl HttpState {
    /// Assemble services from ports, sharing one auth-state notifier.
    ///
    /// Pass the same notifier to the WebSocket state so pushes reach
    /// connected clients.
    pub fn new(ports: HttpStatePorts, notifier: AuthStateNotifier) -> Self {
        let HttpStatePorts {
            identity,
            catalog,
            enrollments,
            clock,
        } = ports;
        Self {
            auth: AuthService::new(identity, notifier),
            catalog: CatalogService::new(Arc::clone(&catalog)),
            enrollments: EnrollmentService::new(enrollments, catalog, clock),
        }
    }
}
