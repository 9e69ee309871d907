//! Course provider backed by a static local dataset
//!
//! The catalog behaves like a remote API: every call waits for a fixed,
//! configurable delay before answering. It holds no mutable state, so a
//! shared `Arc<Catalog>` can serve any number of concurrent callers.
//!
//! ```no_run
//! use libcoursecat::catalog::{Catalog, CatalogDelays, CourseProvider};
//!
//! # async fn example() -> libcoursecat::Result<()> {
//! let catalog = Catalog::bundled(CatalogDelays::default())?;
//! let rust_courses = catalog.search("rust").await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::error::{CatalogError, ConfigError, Result};
use crate::types::Course;

const BUNDLED_DATASET: &str = include_str!("../data/courses.json");

/// Simulated latency per operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogDelays {
    pub fetch_all: Duration,
    pub fetch_by_id: Duration,
    pub search: Duration,
}

impl Default for CatalogDelays {
    fn default() -> Self {
        Self {
            fetch_all: Duration::from_millis(800),
            fetch_by_id: Duration::from_millis(500),
            search: Duration::from_millis(300),
        }
    }
}

impl CatalogDelays {
    /// No latency at all
    pub fn none() -> Self {
        Self {
            fetch_all: Duration::ZERO,
            fetch_by_id: Duration::ZERO,
            search: Duration::ZERO,
        }
    }
}

/// Source of course data with API-like semantics
#[async_trait]
pub trait CourseProvider: Send + Sync {
    /// Every course in the catalog, in dataset order
    async fn fetch_all(&self) -> Result<Vec<Course>>;

    /// The course with this id, or `CatalogError::NotFound`
    async fn fetch_by_id(&self, id: u32) -> Result<Course>;

    /// Courses whose title, description or category contain `query`,
    /// ignoring case. An empty query matches everything.
    async fn search(&self, query: &str) -> Result<Vec<Course>>;
}

pub struct Catalog {
    courses: Arc<Vec<Course>>,
    delays: CatalogDelays,
}

impl Catalog {
    /// Catalog over an in-memory list. Ids must be unique.
    pub fn from_courses(courses: Vec<Course>, delays: CatalogDelays) -> Result<Self> {
        let mut seen = HashSet::with_capacity(courses.len());
        if let Some(dup) = courses.iter().find(|c| !seen.insert(c.id)) {
            return Err(CatalogError::Dataset(format!("duplicate course id {}", dup.id)).into());
        }

        Ok(Self {
            courses: Arc::new(courses),
            delays,
        })
    }

    /// Catalog over a JSON array of courses
    pub fn from_json(json: &str, delays: CatalogDelays) -> Result<Self> {
        let courses: Vec<Course> =
            serde_json::from_str(json).map_err(|e| CatalogError::Dataset(e.to_string()))?;
        Self::from_courses(courses, delays)
    }

    /// Catalog over the dataset compiled into the library
    pub fn bundled(delays: CatalogDelays) -> Result<Self> {
        Self::from_json(BUNDLED_DATASET, delays)
    }

    /// Catalog over a JSON dataset file
    pub fn from_path(path: &Path, delays: CatalogDelays) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        Self::from_json(&json, delays)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

#[async_trait]
impl CourseProvider for Catalog {
    async fn fetch_all(&self) -> Result<Vec<Course>> {
        sleep(self.delays.fetch_all).await;
        debug!(count = self.courses.len(), "fetched all courses");
        Ok(self.courses.as_ref().clone())
    }

    async fn fetch_by_id(&self, id: u32) -> Result<Course> {
        sleep(self.delays.fetch_by_id).await;
        self.courses
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id).into())
    }

    async fn search(&self, query: &str) -> Result<Vec<Course>> {
        sleep(self.delays.search).await;
        let needle = query.to_lowercase();
        let results: Vec<Course> = self
            .courses
            .iter()
            .filter(|c| c.matches(&needle))
            .cloned()
            .collect();
        debug!(query, count = results.len(), "searched courses");
        Ok(results)
    }
}
