//! Course browsing service
//!
//! Loads the catalog into the store and answers search and detail queries.
//! Overlapping loads are resolved in request order: only the most recently
//! started fetch may write its result into the store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::catalog::CourseProvider;
use crate::store::{Action, Store};
use crate::types::Course;
use crate::Result;

/// Identifies one fetch request; later requests carry larger tickets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Hands out monotonically increasing tickets and remembers the newest
#[derive(Debug, Default)]
pub struct FetchSequencer {
    latest: AtomicU64,
}

impl FetchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier one
    pub fn begin(&self) -> FetchTicket {
        FetchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True if no request was started after `ticket`
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Result of a course load that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The store now holds this many courses
    Loaded(usize),
    /// A newer load started while this one was in flight; its response was
    /// dropped
    Superseded,
}

#[derive(Clone)]
pub struct CourseService {
    store: Arc<Store>,
    provider: Arc<dyn CourseProvider>,
    sequencer: Arc<FetchSequencer>,
}

impl CourseService {
    pub fn new(store: Arc<Store>, provider: Arc<dyn CourseProvider>) -> Self {
        Self {
            store,
            provider,
            sequencer: Arc::new(FetchSequencer::new()),
        }
    }

    /// Fetch the full catalog into the store.
    ///
    /// Sets the loading flag, then either replaces the collection or records
    /// the error message. A response that arrives after a newer load was
    /// started is discarded without touching the store.
    ///
    /// # Errors
    ///
    /// Returns the provider error after it has been recorded in the store.
    pub async fn load_courses(&self) -> Result<LoadOutcome> {
        let ticket = self.sequencer.begin();
        self.store.dispatch(Action::SetCoursesLoading(true));

        let result = self.provider.fetch_all().await;

        if !self.sequencer.is_current(ticket) {
            debug!(ticket = ticket.value(), "discarding superseded course fetch");
            return Ok(LoadOutcome::Superseded);
        }

        match result {
            Ok(courses) => {
                let count = courses.len();
                self.store.dispatch(Action::SetCourses(courses));
                Ok(LoadOutcome::Loaded(count))
            }
            Err(e) => {
                warn!(error = %e, "failed to load courses");
                self.store.dispatch(Action::SetCoursesError(e.to_string()));
                Err(e)
            }
        }
    }

    /// Pull-to-refresh; identical to a fresh load
    pub async fn refresh(&self) -> Result<LoadOutcome> {
        self.load_courses().await
    }

    /// Provider-side search over title, description and category
    pub async fn search(&self, query: &str) -> Result<Vec<Course>> {
        self.provider.search(query).await
    }

    /// Filter the already loaded collection by title or description.
    ///
    /// A blank query returns the whole collection.
    pub fn filter_loaded(&self, query: &str) -> Vec<Course> {
        let query = query.trim();
        self.store.select(|state| {
            if query.is_empty() {
                return state.courses.items.clone();
            }
            let needle = query.to_lowercase();
            state
                .courses
                .items
                .iter()
                .filter(|c| {
                    c.title.to_lowercase().contains(&needle)
                        || c.description.to_lowercase().contains(&needle)
                })
                .cloned()
                .collect()
        })
    }

    /// Details for one course
    ///
    /// # Errors
    ///
    /// `CatalogError::NotFound` if no course has this id.
    pub async fn details(&self, id: u32) -> Result<Course> {
        self.provider.fetch_by_id(id).await
    }

    /// Favourite courses that resolve against the loaded collection
    pub fn favourite_courses(&self) -> Vec<Course> {
        self.store.select(|state| state.favourite_courses())
    }

    pub fn is_favourite(&self, id: u32) -> bool {
        self.store.select(|state| state.is_favourite(id))
    }
}
