//! Login, registration and logout
//!
//! There is no authentication backend: login accepts any address and builds a
//! demo user from it, and registration only records the account locally.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::error::CoursecatError;
use crate::persistence::PersistenceBridge;
use crate::store::{Action, Store};
use crate::types::{Registration, User};
use crate::Result;

#[derive(Clone)]
pub struct SessionService {
    store: Arc<Store>,
    bridge: Arc<PersistenceBridge>,
}

impl SessionService {
    pub fn new(store: Arc<Store>, bridge: Arc<PersistenceBridge>) -> Self {
        Self { store, bridge }
    }

    /// Sign in as the demo user for `email` and persist the session.
    ///
    /// The user is named after the local part of the address.
    ///
    /// # Errors
    ///
    /// `CoursecatError::InvalidInput` if `email` is blank.
    pub async fn login(&self, email: &str) -> Result<User> {
        let email = email.trim();
        if email.is_empty() {
            return Err(CoursecatError::InvalidInput("Email cannot be empty".to_string()));
        }

        let name = email.split('@').next().unwrap_or(email).to_string();
        let user = User {
            id: 1,
            name,
            email: email.to_string(),
        };
        let token = demo_token();

        self.store.dispatch(Action::Login {
            user: user.clone(),
            token,
        });
        self.bridge.persist(&self.store.state()).await;

        info!(user = %user.name, "logged in");
        Ok(user)
    }

    /// Record a demo account. Does not sign in.
    ///
    /// # Errors
    ///
    /// `CoursecatError::InvalidInput` if name or email is blank, or a storage
    /// error if the registration could not be written.
    pub async fn register(&self, name: &str, email: &str) -> Result<Registration> {
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() {
            return Err(CoursecatError::InvalidInput(
                "Name and email are required".to_string(),
            ));
        }

        let registration = Registration {
            user: User {
                id: Utc::now().timestamp_millis().max(0) as u64,
                name: name.to_string(),
                email: email.to_string(),
            },
            token: demo_token(),
        };

        self.bridge.save_registration(&registration).await?;
        info!(user = %registration.user.name, "account registered");
        Ok(registration)
    }

    /// Clear the session and persist the signed-out state
    pub async fn logout(&self) {
        self.store.dispatch(Action::Logout);
        self.bridge.persist(&self.store.state()).await;
        info!("logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.select(|s| s.is_authenticated())
    }

    pub fn current_user(&self) -> Option<User> {
        self.store.select(|s| s.current_user().cloned())
    }

    /// The locally recorded registration, if there is one
    pub async fn registration(&self) -> Option<Registration> {
        self.bridge.load_registration().await
    }
}

fn demo_token() -> String {
    format!("dummy-token-{}", Utc::now().timestamp_millis())
}
