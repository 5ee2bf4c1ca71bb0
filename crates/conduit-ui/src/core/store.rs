//! App-wide yewdux store.
//!
//! # Design
//! - Only the signed-in session is global; disclosure state stays with each
//!   component instance.

use conduit_auth::SessionGrant;
use yewdux::store::Store;

/// Global application store.
#[derive(Clone, Debug, PartialEq, Eq, Store, Default)]
pub struct AppStore {
    /// Session issued by the last successful sign-in.
    pub session: Option<SessionGrant>,
}

impl AppStore {
    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Email of the signed-in user.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.email.as_str())
    }

    /// Token to present on sign-out.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.session.as_ref().map(|session| session.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant() -> Option<SessionGrant> {
        serde_json::from_str(
            r#"{"token":"t-1","email":"ada@example.com","name":null,"expires_at":"2030-01-01T00:00:00Z"}"#,
        )
        .ok()
    }

    #[test]
    fn signed_in_state_follows_session() {
        let mut store = AppStore::default();
        assert!(!store.is_signed_in());
        assert_eq!(store.email(), None);
        store.session = grant();
        assert!(store.is_signed_in());
        assert_eq!(store.email(), Some("ada@example.com"));
        assert_eq!(store.token().as_deref(), Some("t-1"));
    }
}
