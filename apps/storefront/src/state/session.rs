//! # Session State
//!
//! Who is logged in, and what happens to the cart when they leave.
//!
//! ```text
//! login(token, role) ──► authenticated ──► logout() ──► anonymous
//!                                              │
//!                                              └──► CLEAR_CART
//! ```

use std::sync::{PoisonError, RwLock};

use bazar_core::CartAction;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::cart::CartDispatcher;

/// Role string the backend assigns to administrators.
pub const ADMIN_ROLE: &str = "ADMIN";

/// Credentials returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token: String,
    pub role: String,
}

/// Current authentication state of the browsing session.
#[derive(Debug, Default)]
pub struct SessionState {
    current: RwLock<Option<AuthSession>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&self, token: impl Into<String>, role: impl Into<String>) {
        let session = AuthSession {
            token: token.into(),
            role: role.into(),
        };
        info!(role = %session.role, "Session started");

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    /// Ends the session and empties the cart.
    pub fn logout(&self, cart: &CartDispatcher) {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if previous.is_some() {
            info!("Session ended");
        }
        cart.dispatch(CartAction::ClearCart);
    }

    pub fn current(&self) -> Option<AuthSession> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current()
            .is_some_and(|session| session.role == ADMIN_ROLE)
    }

    /// `Authorization` header value for API calls.
    pub fn bearer_header(&self) -> Option<String> {
        self.current()
            .map(|session| format!("Bearer {}", session.token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CartStore;
    use bazar_core::ProductDescriptor;

    #[test]
    fn test_anonymous_by_default() {
        let session = SessionState::new();
        assert!(!session.is_authenticated());
        assert!(!session.is_admin());
        assert_eq!(session.bearer_header(), None);
    }

    #[test]
    fn test_login_roles() {
        let session = SessionState::new();

        session.login("tok-1", "USER");
        assert!(session.is_authenticated());
        assert!(!session.is_admin());
        assert_eq!(session.bearer_header().as_deref(), Some("Bearer tok-1"));

        session.login("tok-2", ADMIN_ROLE);
        assert!(session.is_admin());
    }

    #[test]
    fn test_logout_clears_cart() {
        let store = CartStore::new();
        let session = SessionState::new();
        session.login("tok", "USER");

        store.dispatch(CartAction::add(ProductDescriptor::new(1)));
        store.dispatch(CartAction::add(ProductDescriptor::new(2)));

        session.logout(&store.dispatcher());

        assert!(!session.is_authenticated());
        assert!(store.snapshot().is_empty());
    }
}
