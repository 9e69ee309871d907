//! Favourites and theme
//!
//! Every mutation is dispatched to the store and then flushed through the
//! persistence bridge. Write failures are logged by the bridge and do not
//! reach the caller.

use std::sync::Arc;
use tracing::info;

use crate::persistence::PersistenceBridge;
use crate::store::{Action, Store};
use crate::types::ThemeMode;
use crate::Result;

#[derive(Clone)]
pub struct PreferenceService {
    store: Arc<Store>,
    bridge: Arc<PersistenceBridge>,
}

impl PreferenceService {
    pub fn new(store: Arc<Store>, bridge: Arc<PersistenceBridge>) -> Self {
        Self { store, bridge }
    }

    async fn apply(&self, action: Action) {
        let domain = action.domain();
        self.store.dispatch(action);
        let snapshot = self.store.state();
        self.bridge.persist_after(domain, &snapshot).await;
    }

    /// Flip membership of `course_id`; returns whether it is now a favourite
    pub async fn toggle_favourite(&self, course_id: u32) -> bool {
        self.apply(Action::ToggleFavourite(course_id)).await;
        self.store.select(|s| s.is_favourite(course_id))
    }

    pub async fn add_favourite(&self, course_id: u32) {
        self.apply(Action::AddFavourite(course_id)).await;
    }

    pub async fn remove_favourite(&self, course_id: u32) {
        self.apply(Action::RemoveFavourite(course_id)).await;
    }

    pub fn favourites(&self) -> Vec<u32> {
        self.store.select(|s| s.favourites.items.clone())
    }

    pub fn theme(&self) -> ThemeMode {
        self.store.select(|s| s.theme.mode)
    }

    /// Switch light/dark; returns the new mode
    pub async fn toggle_theme(&self) -> ThemeMode {
        self.apply(Action::ToggleTheme).await;
        let mode = self.theme();
        info!(theme = %mode, "theme changed");
        mode
    }

    pub async fn set_theme(&self, mode: ThemeMode) -> ThemeMode {
        self.apply(Action::SetTheme(mode)).await;
        mode
    }

    /// Set the theme from user-supplied text.
    ///
    /// # Errors
    ///
    /// `CoursecatError::InvalidInput` for anything other than `light` or
    /// `dark`; the store is left untouched.
    pub async fn set_theme_str(&self, mode: &str) -> Result<ThemeMode> {
        let mode: ThemeMode = mode.parse()?;
        Ok(self.set_theme(mode).await)
    }
}
