//! Actions for the reducer pattern
//!
//! Every state transition is described by an [`Action`]. The reducer (see
//! `reducer.rs`) is the only code that turns actions into new state.

use crate::types::{AuthSession, Course, ThemeMode, User};

/// Actions that trigger state transitions, grouped by domain
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // === Auth ===
    /// User signed in
    Login { user: User, token: String },

    /// User signed out; clears user and token
    Logout,

    /// Replace the auth domain verbatim (hydration only)
    RestoreAuth(AuthSession),

    // === Courses ===
    /// Fetch started or finished
    SetCoursesLoading(bool),

    /// Fetch succeeded; replaces the collection
    SetCourses(Vec<Course>),

    /// Fetch failed
    SetCoursesError(String),

    // === Favourites ===
    /// Append if not already present
    AddFavourite(u32),

    /// Remove every occurrence
    RemoveFavourite(u32),

    /// Remove if present, append otherwise
    ToggleFavourite(u32),

    /// Replace the whole list (hydration only)
    RestoreFavourites(Vec<u32>),

    // === Theme ===
    /// Flip between light and dark
    ToggleTheme,

    /// Set a specific mode
    SetTheme(ThemeMode),
}

impl Action {
    /// Domain the action belongs to, for logging
    pub fn domain(&self) -> Domain {
        match self {
            Action::Login { .. } | Action::Logout | Action::RestoreAuth(_) => Domain::Auth,
            Action::SetCoursesLoading(_)
            | Action::SetCourses(_)
            | Action::SetCoursesError(_) => Domain::Courses,
            Action::AddFavourite(_)
            | Action::RemoveFavourite(_)
            | Action::ToggleFavourite(_)
            | Action::RestoreFavourites(_) => Domain::Favourites,
            Action::ToggleTheme | Action::SetTheme(_) => Domain::Theme,
        }
    }
}

/// The four independent state partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Auth,
    Courses,
    Favourites,
    Theme,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Auth => "auth",
            Domain::Courses => "courses",
            Domain::Favourites => "favourites",
            Domain::Theme => "theme",
        }
    }

    /// Whether changes to this domain are written to durable storage
    pub fn is_persisted(&self) -> bool {
        !matches!(self, Domain::Courses)
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
