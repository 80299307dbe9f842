//! HTTP server configuration object.

use std::net::SocketAddr;
use std::time::Duration;

use learnhub::inbound::http::session_config::SessionSettings;
use learnhub::inbound::ws::state::AllowedOrigins;
use learnhub::outbound::persistence::DbPool;

/// Everything `create_server` needs besides the health flags.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) allowed_origins: AllowedOrigins,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) seed_courses: bool,
    pub(crate) catalog_latency: Duration,
}

impl ServerConfig {
    /// In-memory storage, seeding on, no catalog latency.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            allowed_origins: AllowedOrigins::default(),
            db_pool: None,
            seed_courses: true,
            catalog_latency: Duration::ZERO,
        }
    }

    /// Back every port with PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_allowed_origins(mut self, origins: AllowedOrigins) -> Self {
        self.allowed_origins = origins;
        self
    }

    #[must_use]
    pub fn with_seed_courses(mut self, enabled: bool) -> Self {
        self.seed_courses = enabled;
        self
    }

    /// Delay every in-memory catalog read. Ignored with a database.
    #[must_use]
    pub fn with_catalog_latency(mut self, latency: Duration) -> Self {
        self.catalog_latency = latency;
        self
    }
}
