//! Application state
//!
//! Plain records, one per domain. All transitions happen through the reducer
//! (see `reducer.rs`).

use serde::{Deserialize, Serialize};

use crate::types::{AuthSession, Course, ThemeMode, User};

/// Root application state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub auth: AuthSession,
    pub courses: CourseCollection,
    pub favourites: FavouritesState,
    pub theme: ThemeState,
}

/// Runtime cache of the last fetched course list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseCollection {
    pub items: Vec<Course>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Ordered list of favourite course ids, each present at most once
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavouritesState {
    pub items: Vec<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeState {
    pub mode: ThemeMode,
}

impl AppState {
    /// Create new application state with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated
    }

    pub fn current_user(&self) -> Option<&User> {
        self.auth.user.as_ref()
    }

    pub fn is_favourite(&self, course_id: u32) -> bool {
        self.favourites.items.contains(&course_id)
    }

    /// Look up a loaded course by id
    pub fn course(&self, course_id: u32) -> Option<&Course> {
        self.courses.items.iter().find(|c| c.id == course_id)
    }

    /// Favourites that resolve against the loaded collection, in favourite
    /// order. Ids with no loaded course are skipped.
    pub fn favourite_courses(&self) -> Vec<Course> {
        self.favourites
            .items
            .iter()
            .filter_map(|id| self.course(*id).cloned())
            .collect()
    }
}
