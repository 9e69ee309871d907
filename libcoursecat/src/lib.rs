//! Coursecat - course catalog application core
//!
//! This library holds the process-wide state store, the bridge that keeps
//! parts of it on durable key-value storage, and the local course catalog.
//! Front ends talk to it through the service layer.

pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod persistence;
pub mod service;
pub mod storage;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogDelays};
pub use config::Config;
pub use error::{CoursecatError, Result};
pub use persistence::PersistenceBridge;
pub use service::CoursecatService;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use store::{Action, AppState, Store};
pub use types::{AuthSession, Course, CourseLevel, CourseStatus, ThemeMode, User};
