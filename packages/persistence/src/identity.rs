//! Current-user identity, supplied by the external auth session.

use serde::{Deserialize, Serialize};
use std::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Supplies the signed-in user, if any
pub trait SessionProvider: Send + Sync {
    fn current_user(&self) -> Option<Identity>;
}

/// Session whose user is set explicitly (CLI flag, tests)
#[derive(Debug, Default)]
pub struct StaticSession {
    user: RwLock<Option<Identity>>,
}

impl StaticSession {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user: RwLock::new(Some(Identity::new(user_id))),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, user_id: impl Into<String>) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = Some(Identity::new(user_id));
    }

    pub fn sign_out(&self) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl SessionProvider for StaticSession {
    fn current_user(&self) -> Option<Identity> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
