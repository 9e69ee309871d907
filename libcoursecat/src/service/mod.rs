//! Service layer for Coursecat
//!
//! Front ends never touch the store, the bridge or the catalog directly; they
//! go through `CoursecatService` and its sub-services:
//!
//! - `CourseService`: load, search and inspect courses
//! - `PreferenceService`: favourites and theme
//! - `SessionService`: login, registration and logout
//!
//! # Example
//!
//! ```no_run
//! use libcoursecat::service::CoursecatService;
//!
//! # async fn example() -> libcoursecat::Result<()> {
//! let service = CoursecatService::new().await?;
//!
//! service.courses().load_courses().await?;
//! let liked = service.preferences().toggle_favourite(1).await;
//! println!("course 1 favourite: {}", liked);
//! # Ok(())
//! # }
//! ```

pub mod courses;
pub mod preferences;
pub mod session;

pub use courses::{CourseService, FetchSequencer, FetchTicket, LoadOutcome};
pub use preferences::PreferenceService;
pub use session::SessionService;

use std::sync::Arc;
use tracing::debug;

use crate::catalog::{Catalog, CourseProvider};
use crate::error::{CoursecatError, Result};
use crate::persistence::{HydrationReport, PersistenceBridge};
use crate::storage::{KeyValueStore, SqliteStore};
use crate::store::{AppState, StateReceiver, Store};
use crate::Config;

/// Main service facade
///
/// Owns the shared `Arc<Store>` and hands clones of it to every sub-service;
/// front ends only get snapshots and change notifications. Construction
/// hydrates the store before returning, so callers never see
/// pre-hydration defaults in place of persisted values.
pub struct CoursecatService {
    store: Arc<Store>,
    courses: CourseService,
    preferences: PreferenceService,
    session: SessionService,
    hydration: HydrationReport,
}

impl CoursecatService {
    /// Create a service from the configuration file, or defaults if there is
    /// none
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is malformed, the storage
    /// database cannot be opened, or the course dataset is invalid.
    pub async fn new() -> Result<Self> {
        let config = Config::load_or_default()?;
        Self::from_config(config).await
    }

    /// Create a service with a pre-built configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the storage database cannot be opened or the
    /// course dataset is invalid.
    pub async fn from_config(config: Config) -> Result<Self> {
        let db_path = config.storage_path();
        let kv = SqliteStore::open(&db_path).await?;

        let delays = config.catalog.delays();
        let catalog = match config.dataset_path() {
            Some(path) => Catalog::from_path(&path, delays)?,
            None => Catalog::bundled(delays)?,
        };
        debug!(courses = catalog.len(), db = %db_path.display(), "service resources ready");

        Ok(Self::from_parts(Arc::new(kv), Arc::new(catalog)).await)
    }

    /// Assemble a service from an arbitrary storage medium and provider
    pub async fn from_parts(
        kv: Arc<dyn KeyValueStore>,
        provider: Arc<dyn CourseProvider>,
    ) -> Self {
        let store = Arc::new(Store::new());
        let bridge = Arc::new(PersistenceBridge::new(kv));

        let hydration = bridge.hydrate(&store).await;

        let courses = CourseService::new(Arc::clone(&store), provider);
        let preferences = PreferenceService::new(Arc::clone(&store), Arc::clone(&bridge));
        let session = SessionService::new(Arc::clone(&store), Arc::clone(&bridge));

        Self {
            store,
            courses,
            preferences,
            session,
            hydration,
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> AppState {
        self.store.state()
    }

    pub fn courses(&self) -> &CourseService {
        &self.courses
    }

    pub fn preferences(&self) -> &PreferenceService {
        &self.preferences
    }

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    /// What startup hydration restored and what it had to skip
    pub fn hydration(&self) -> HydrationReport {
        self.hydration
    }

    /// Change notifications for every dispatch
    pub fn subscribe(&self) -> StateReceiver {
        self.store.subscribe()
    }

    /// Gate for operations that need a signed-in user
    ///
    /// # Errors
    ///
    /// `CoursecatError::NotAuthenticated` when no session is active.
    pub fn require_authenticated(&self) -> Result<()> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(CoursecatError::NotAuthenticated)
        }
    }
}
