//! Port selection and catalog seeding at startup.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::{info, warn};

use learnhub::domain::ports::{CourseCatalog, SeedOutcome};
use learnhub::domain::seed_courses;
use learnhub::inbound::http::state::HttpStatePorts;
use learnhub::outbound::memory::{
    MemoryEnrollmentRepository, MemoryIdentityProvider, StaticCourseCatalog,
};
use learnhub::outbound::persistence::{
    DieselCourseCatalog, DieselEnrollmentRepository, DieselIdentityProvider,
};

use super::ServerConfig;

/// Diesel adapters when a pool is configured, in-memory ones otherwise.
///
/// The in-memory catalog starts empty when startup seeding will fill it and
/// pre-seeded when seeding is disabled, so it is never left without courses.
pub(crate) fn build_ports(config: &ServerConfig) -> HttpStatePorts {
    match &config.db_pool {
        Some(pool) => HttpStatePorts {
            identity: Arc::new(DieselIdentityProvider::new(pool.clone())),
            catalog: Arc::new(DieselCourseCatalog::new(pool.clone())),
            enrollments: Arc::new(DieselEnrollmentRepository::new(pool.clone())),
            clock: Arc::new(DefaultClock),
        },
        None => {
            warn!("no database configured; accounts and enrollments are kept in memory");
            HttpStatePorts {
                identity: Arc::new(MemoryIdentityProvider::new()),
                catalog: Arc::new(memory_catalog(config)),
                enrollments: Arc::new(MemoryEnrollmentRepository::new()),
                clock: Arc::new(DefaultClock),
            }
        }
    }
}

fn memory_catalog(config: &ServerConfig) -> StaticCourseCatalog {
    let catalog = if config.seed_courses {
        StaticCourseCatalog::empty()
    } else {
        StaticCourseCatalog::seeded()
    };
    catalog.with_latency(config.catalog_latency)
}

/// Write the six seed courses into an empty catalog.
///
/// # Errors
///
/// Returns an I/O error when the catalog store rejects the write; the
/// server must not report ready with an unseeded catalog.
pub(crate) async fn seed_catalog(
    catalog: &dyn CourseCatalog,
    enabled: bool,
) -> std::io::Result<()> {
    if !enabled {
        info!("catalog seeding disabled");
        return Ok(());
    }
    match catalog.seed_if_empty(&seed_courses()).await {
        Ok(SeedOutcome::Applied { inserted }) => {
            info!(inserted, "course catalog seeded");
            Ok(())
        }
        Ok(SeedOutcome::AlreadySeeded) => {
            info!("course catalog already populated");
            Ok(())
        }
        Err(error) => Err(std::io::Error::other(format!(
            "course catalog seeding failed: {error}"
        ))),
    }
}
