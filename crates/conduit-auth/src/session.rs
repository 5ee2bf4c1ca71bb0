//! In-memory session registry.
//!
//! # Design
//! - Tokens are random v4 UUIDs; expiry is checked lazily on lookup.
//! - Clock-taking variants exist so expiry is testable without sleeping.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::model::SessionGrant;
use crate::provider::Identity;

/// Issued sessions keyed by token.
#[derive(Debug)]
pub struct SessionRegistry {
    ttl: TimeDelta,
    sessions: RwLock<HashMap<String, SessionGrant>>,
}

impl SessionRegistry {
    /// Create a registry issuing sessions with the given lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Session`] when the lifetime does not fit a
    /// timestamp offset.
    pub fn new(ttl: Duration) -> AuthResult<Self> {
        let ttl = TimeDelta::from_std(ttl).map_err(|_| AuthError::Session {
            operation: "session.ttl",
        })?;
        Ok(Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    /// Issue a session for the identity.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Session`] when the expiry overflows.
    pub async fn issue(&self, identity: &Identity) -> AuthResult<SessionGrant> {
        self.issue_at(identity, Utc::now()).await
    }

    /// Issue a session as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Session`] when the expiry overflows.
    pub async fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> AuthResult<SessionGrant> {
        let expires_at = now.checked_add_signed(self.ttl).ok_or(AuthError::Session {
            operation: "session.issue",
        })?;
        let grant = SessionGrant {
            token: Uuid::new_v4().to_string(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            expires_at,
        };
        self.sessions
            .write()
            .await
            .insert(grant.token.clone(), grant.clone());
        Ok(grant)
    }

    /// Resolve a live session.
    pub async fn lookup(&self, token: &str) -> Option<SessionGrant> {
        self.lookup_at(token, Utc::now()).await
    }

    /// Resolve a session that is still live at `now`, dropping it when expired.
    pub async fn lookup_at(&self, token: &str, now: DateTime<Utc>) -> Option<SessionGrant> {
        let grant = self.sessions.read().await.get(token).cloned()?;
        if grant.expires_at > now {
            return Some(grant);
        }
        self.sessions.write().await.remove(token);
        None
    }

    /// Revoke a session. Returns whether it existed.
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Remove every session expired at `now`, returning how many were dropped.
    pub async fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, grant| grant.expires_at > now);
        before - sessions.len()
    }

    /// Number of sessions currently held, expired or not.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no sessions are held.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(secs: u64) -> AuthResult<SessionRegistry> {
        SessionRegistry::new(Duration::from_secs(secs))
    }

    #[tokio::test]
    async fn issued_sessions_resolve_until_expiry() -> AuthResult<()> {
        let sessions = registry(60)?;
        let now = Utc::now();
        let grant = sessions
            .issue_at(&Identity::from_email("test@test.com"), now)
            .await?;
        assert_eq!(grant.expires_at, now + TimeDelta::seconds(60));
        assert_eq!(
            sessions.lookup_at(&grant.token, now).await.map(|g| g.email),
            Some("test@test.com".to_string())
        );
        assert!(
            sessions
                .lookup_at(&grant.token, now + TimeDelta::seconds(61))
                .await
                .is_none()
        );
        assert!(sessions.is_empty().await);
        Ok(())
    }

    #[tokio::test]
    async fn revoke_removes_only_known_tokens() -> AuthResult<()> {
        let sessions = registry(60)?;
        let grant = sessions.issue(&Identity::from_email("a@b.io")).await?;
        assert!(!sessions.revoke("unknown").await);
        assert!(sessions.revoke(&grant.token).await);
        assert!(sessions.lookup(&grant.token).await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn purge_drops_expired_sessions() -> AuthResult<()> {
        let sessions = registry(10)?;
        let now = Utc::now();
        sessions.issue_at(&Identity::from_email("old@b.io"), now).await?;
        sessions
            .issue_at(&Identity::from_email("new@b.io"), now + TimeDelta::seconds(30))
            .await?;
        assert_eq!(sessions.len().await, 2);
        assert_eq!(sessions.purge_expired_at(now + TimeDelta::seconds(20)).await, 1);
        assert_eq!(sessions.len().await, 1);
        Ok(())
    }
}
