//! Application state container
//!
//! - Actions: what can happen
//! - State: what is true right now
//! - Reducer: pure function (State, Action) -> State
//! - Store: owns the current state and applies actions one at a time
//!
//! There is exactly one [`Store`] per process. It is created at startup and
//! handed to consumers as `Arc<Store>`; nothing looks it up globally.

pub mod actions;
pub mod reducer;
pub mod state;

pub use actions::{Action, Domain};
pub use reducer::reduce;
pub use state::{AppState, CourseCollection, FavouritesState, ThemeState};

use tokio::sync::watch;
use tracing::debug;

/// Change notifications; `borrow()` yields the latest state
pub type StateReceiver = watch::Receiver<AppState>;

/// Single source of truth for the four state domains
pub struct Store {
    state: watch::Sender<AppState>,
}

impl Store {
    /// Store holding the default state of every domain
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    pub fn with_state(initial: AppState) -> Self {
        let (state, _) = watch::channel(initial);
        Self { state }
    }

    /// Apply an action.
    ///
    /// The reducer runs under the channel's lock, so concurrent dispatches
    /// never interleave and readers see either the old or the new state.
    pub fn dispatch(&self, action: Action) {
        debug!(domain = %action.domain(), action = action_name(&action), "dispatch");
        self.state.send_modify(|current| {
            let previous = std::mem::take(current);
            *current = reduce(previous, action);
        });
    }

    /// Snapshot of the current state
    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Read part of the state without cloning all of it
    pub fn select<T>(&self, selector: impl FnOnce(&AppState) -> T) -> T {
        selector(&*self.state.borrow())
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> StateReceiver {
        self.state.subscribe()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Variant name only; payloads such as tokens stay out of the logs
fn action_name(action: &Action) -> &'static str {
    match action {
        Action::Login { .. } => "login",
        Action::Logout => "logout",
        Action::RestoreAuth(_) => "restore_auth",
        Action::SetCoursesLoading(_) => "set_loading",
        Action::SetCourses(_) => "set_courses",
        Action::SetCoursesError(_) => "set_error",
        Action::AddFavourite(_) => "add_favourite",
        Action::RemoveFavourite(_) => "remove_favourite",
        Action::ToggleFavourite(_) => "toggle_favourite",
        Action::RestoreFavourites(_) => "restore_favourites",
        Action::ToggleTheme => "toggle_theme",
        Action::SetTheme(_) => "set_theme",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ThemeMode;
    use std::sync::Arc;

    #[test]
    fn test_store_starts_with_defaults() {
        let store = Store::new();
        let state = store.state();

        assert!(!state.auth.is_authenticated);
        assert_eq!(state.theme.mode, ThemeMode::Light);
        assert!(state.favourites.items.is_empty());
        assert!(state.courses.items.is_empty());
        assert!(!state.courses.loading);
    }

    #[test]
    fn test_dispatch_updates_snapshot() {
        let store = Store::new();
        let before = store.state();

        store.dispatch(Action::AddFavourite(3));

        assert!(before.favourites.items.is_empty());
        assert_eq!(store.select(|s| s.favourites.items.clone()), vec![3]);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let store = Store::new();
        let mut rx = store.subscribe();

        store.dispatch(Action::ToggleTheme);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().theme.mode, ThemeMode::Dark);
    }

    #[test]
    fn test_concurrent_dispatches_are_not_lost() {
        let store = Arc::new(Store::new());
        let handles: Vec<_> = (0..8u32)
            .map(|n| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..50u32 {
                        store.dispatch(Action::AddFavourite(n * 100 + i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.state().favourites.items.len(), 400);
    }
}
