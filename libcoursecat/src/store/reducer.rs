//! Pure reducer function for state transitions
//!
//! `(State, Action) -> State`. No I/O happens here; persistence and fetching
//! are driven by the service layer around the store.

use super::actions::Action;
use super::state::{AppState, CourseCollection, FavouritesState, ThemeState};
use crate::types::AuthSession;

/// Apply one action to the state.
///
/// Every action is total: there is no input for which the reducer fails.
pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        // === Auth ===
        Action::Login { user, token } => AppState {
            auth: AuthSession::authenticated(user, token),
            ..state
        },

        Action::Logout => AppState {
            auth: AuthSession::default(),
            ..state
        },

        Action::RestoreAuth(session) => AppState {
            auth: session,
            ..state
        },

        // === Courses ===
        Action::SetCoursesLoading(loading) => AppState {
            courses: CourseCollection {
                loading,
                ..state.courses
            },
            ..state
        },

        Action::SetCourses(items) => AppState {
            courses: CourseCollection {
                items,
                loading: false,
                error: None,
            },
            ..state
        },

        Action::SetCoursesError(error) => AppState {
            courses: CourseCollection {
                loading: false,
                error: Some(error),
                ..state.courses
            },
            ..state
        },

        // === Favourites ===
        Action::AddFavourite(id) => {
            let mut items = state.favourites.items;
            if !items.contains(&id) {
                items.push(id);
            }
            AppState {
                favourites: FavouritesState { items },
                ..state
            }
        }

        Action::RemoveFavourite(id) => {
            let mut items = state.favourites.items;
            items.retain(|existing| *existing != id);
            AppState {
                favourites: FavouritesState { items },
                ..state
            }
        }

        Action::ToggleFavourite(id) => {
            let mut items = state.favourites.items;
            if items.contains(&id) {
                items.retain(|existing| *existing != id);
            } else {
                items.push(id);
            }
            AppState {
                favourites: FavouritesState { items },
                ..state
            }
        }

        Action::RestoreFavourites(list) => {
            // First occurrence wins
            let mut items = Vec::with_capacity(list.len());
            for id in list {
                if !items.contains(&id) {
                    items.push(id);
                }
            }
            AppState {
                favourites: FavouritesState { items },
                ..state
            }
        }

        // === Theme ===
        Action::ToggleTheme => AppState {
            theme: ThemeState {
                mode: state.theme.mode.flipped(),
            },
            ..state
        },

        Action::SetTheme(mode) => AppState {
            theme: ThemeState { mode },
            ..state
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Course, CourseLevel, CourseStatus, ThemeMode, User};

    fn user() -> User {
        User {
            id: 1,
            name: "ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    fn course(id: u32, title: &str) -> Course {
        Course {
            id,
            title: title.to_string(),
            description: String::new(),
            category: "Programming".to_string(),
            status: CourseStatus::New,
            level: CourseLevel::Beginner,
            duration: "1h".to_string(),
            lessons: 3,
            rating: 4.0,
            students: 10,
            thumbnail: String::new(),
        }
    }

    fn favourites_after(actions: Vec<Action>) -> Vec<u32> {
        actions
            .into_iter()
            .fold(AppState::new(), reduce)
            .favourites
            .items
    }

    #[test]
    fn test_reducer_is_pure() {
        let state = AppState::new();
        let new_state = reduce(state.clone(), Action::ToggleTheme);

        assert_eq!(state.theme.mode, ThemeMode::Light);
        assert_eq!(new_state.theme.mode, ThemeMode::Dark);
    }

    #[test]
    fn test_login_then_logout_restores_default_auth() {
        let state = reduce(
            AppState::new(),
            Action::Login {
                user: user(),
                token: "dummy-token-1".to_string(),
            },
        );
        assert!(state.auth.is_authenticated);
        assert_eq!(state.auth.user, Some(user()));
        assert_eq!(state.auth.token.as_deref(), Some("dummy-token-1"));

        let state = reduce(state, Action::Logout);
        assert_eq!(state.auth, AuthSession::default());
    }

    #[test]
    fn test_restore_auth_is_verbatim() {
        let session = AuthSession::authenticated(user(), "t".to_string());
        let state = reduce(AppState::new(), Action::RestoreAuth(session.clone()));
        assert_eq!(state.auth, session);
    }

    #[test]
    fn test_course_fetch_flow() {
        let mut state = reduce(AppState::new(), Action::SetCoursesLoading(true));
        assert!(state.courses.loading);

        state = reduce(state, Action::SetCoursesError("offline".to_string()));
        assert!(!state.courses.loading);
        assert_eq!(state.courses.error.as_deref(), Some("offline"));

        state = reduce(state, Action::SetCoursesLoading(true));
        state = reduce(state, Action::SetCourses(vec![course(1, "Intro to Go")]));
        assert!(!state.courses.loading);
        assert!(state.courses.error.is_none());
        assert_eq!(state.courses.items.len(), 1);
    }

    #[test]
    fn test_set_courses_replaces_wholesale() {
        let state = reduce(
            AppState::new(),
            Action::SetCourses(vec![course(1, "A"), course(2, "B")]),
        );
        let state = reduce(state, Action::SetCourses(vec![course(3, "C")]));

        let ids: Vec<u32> = state.courses.items.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_set_error_keeps_items() {
        let state = reduce(AppState::new(), Action::SetCourses(vec![course(1, "A")]));
        let state = reduce(state, Action::SetCoursesError("boom".to_string()));
        assert_eq!(state.courses.items.len(), 1);
    }

    #[test]
    fn test_add_favourite_is_idempotent() {
        let items = favourites_after(vec![
            Action::AddFavourite(1),
            Action::AddFavourite(1),
            Action::AddFavourite(2),
        ]);
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn test_remove_favourite_is_idempotent() {
        let items = favourites_after(vec![
            Action::AddFavourite(1),
            Action::AddFavourite(2),
            Action::RemoveFavourite(1),
            Action::RemoveFavourite(1),
            Action::RemoveFavourite(99),
        ]);
        assert_eq!(items, vec![2]);
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let start = favourites_after(vec![Action::AddFavourite(5), Action::AddFavourite(7)]);

        let after = favourites_after(vec![
            Action::AddFavourite(5),
            Action::AddFavourite(7),
            Action::ToggleFavourite(5),
            Action::ToggleFavourite(5),
        ]);
        assert_eq!(after.contains(&5), start.contains(&5));

        let after = favourites_after(vec![
            Action::AddFavourite(5),
            Action::ToggleFavourite(9),
            Action::ToggleFavourite(9),
        ]);
        assert!(!after.contains(&9));
    }

    #[test]
    fn test_favourites_never_hold_duplicates() {
        // Deterministic pseudo-random sequence of add/remove/toggle over a
        // small id space.
        let mut seed: u32 = 0x2545_f491;
        let mut state = AppState::new();
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let id = seed % 6;
            let action = match (seed >> 8) % 3 {
                0 => Action::AddFavourite(id),
                1 => Action::RemoveFavourite(id),
                _ => Action::ToggleFavourite(id),
            };
            state = reduce(state, action);

            let mut seen = std::collections::HashSet::new();
            assert!(state.favourites.items.iter().all(|id| seen.insert(*id)));
        }
    }

    #[test]
    fn test_restore_favourites_deduplicates() {
        let items = favourites_after(vec![Action::RestoreFavourites(vec![3, 1, 3, 2, 1])]);
        assert_eq!(items, vec![3, 1, 2]);
    }

    #[test]
    fn test_toggle_theme_is_own_inverse() {
        let state = reduce(AppState::new(), Action::ToggleTheme);
        assert_eq!(state.theme.mode, ThemeMode::Dark);
        let state = reduce(state, Action::ToggleTheme);
        assert_eq!(state.theme.mode, ThemeMode::Light);
    }

    #[test]
    fn test_set_theme() {
        let state = reduce(AppState::new(), Action::SetTheme(ThemeMode::Dark));
        assert_eq!(state.theme.mode, ThemeMode::Dark);
        let state = reduce(state, Action::SetTheme(ThemeMode::Dark));
        assert_eq!(state.theme.mode, ThemeMode::Dark);
    }

    #[test]
    fn test_domains_are_independent() {
        let state = reduce(AppState::new(), Action::AddFavourite(4));
        let state = reduce(state, Action::ToggleTheme);
        let state = reduce(state, Action::Logout);

        assert_eq!(state.favourites.items, vec![4]);
        assert_eq!(state.theme.mode, ThemeMode::Dark);
        assert!(state.courses.items.is_empty());
    }
}
