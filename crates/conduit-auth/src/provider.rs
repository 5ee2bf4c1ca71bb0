//! Identity providers behind the sign-in actions.
//!
//! # Design
//! - Providers sit behind async traits so the service can be exercised with
//!   in-memory doubles.
//! - The static directory verifies Argon2 PHC hashes and never stores
//!   plaintext.

use std::collections::HashMap;

use argon2::Argon2;
use argon2::password_hash::{Error as PasswordHashError, PasswordHash, PasswordVerifier};
use async_trait::async_trait;
use url::Url;

use crate::config::{GoogleConfig, UserRecord};
use crate::error::{AuthError, AuthResult, CredentialsReason};

const GOOGLE_AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_SCOPES: &str = "openid email profile";

/// Identity returned by a provider after a successful check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    /// Account email.
    pub email: String,
    /// Display name when known.
    pub name: Option<String>,
    /// Avatar URL when known.
    pub image: Option<String>,
}

impl Identity {
    /// Identity carrying only an email.
    #[must_use]
    pub fn from_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            image: None,
        }
    }
}

/// Checks email/password pairs.
#[async_trait]
pub trait CredentialsAuthority: Send + Sync {
    /// Provider identifier used in logs and metrics.
    fn id(&self) -> &'static str {
        "credentials"
    }

    /// Verify the pair and return the matching identity.
    async fn authorize(&self, email: &str, password: &str) -> AuthResult<Identity>;
}

/// Starts a redirect-based sign-in with an external provider.
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Provider identifier used in logs and metrics.
    fn id(&self) -> &'static str;

    /// Build the provider URL the browser should visit.
    async fn authorization_url(&self, redirect_to: &str) -> AuthResult<String>;
}

/// Credentials authority backed by a fixed user list.
#[derive(Clone, Debug, Default)]
pub struct StaticCredentials {
    users: HashMap<String, String>,
}

impl StaticCredentials {
    /// Build the directory from configured records.
    #[must_use]
    pub fn new(records: &[UserRecord]) -> Self {
        let users = records
            .iter()
            .map(|record| {
                (
                    record.email.to_ascii_lowercase(),
                    record.password_hash.clone(),
                )
            })
            .collect();
        Self { users }
    }

    /// Number of configured accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no account is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl CredentialsAuthority for StaticCredentials {
    async fn authorize(&self, email: &str, password: &str) -> AuthResult<Identity> {
        let key = email.to_ascii_lowercase();
        let hash = self
            .users
            .get(&key)
            .ok_or(AuthError::InvalidCredentials {
                reason: CredentialsReason::UserNotFound,
            })?;
        if verify_password(hash, password)? {
            Ok(Identity::from_email(key))
        } else {
            Err(AuthError::InvalidCredentials {
                reason: CredentialsReason::IncorrectPassword,
            })
        }
    }
}

fn verify_password(expected_hash: &str, candidate: &str) -> AuthResult<bool> {
    let parsed =
        PasswordHash::new(expected_hash).map_err(|detail| AuthError::StoredHashInvalid { detail })?;
    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(detail) => Err(AuthError::PasswordVerifyFailed { detail }),
    }
}

/// Google OAuth authorization-code entry point.
#[derive(Clone, Debug)]
pub struct GoogleOAuth {
    config: GoogleConfig,
}

impl GoogleOAuth {
    /// Build the provider from its settings.
    #[must_use]
    pub const fn new(config: GoogleConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl OAuthProvider for GoogleOAuth {
    fn id(&self) -> &'static str {
        "google"
    }

    async fn authorization_url(&self, redirect_to: &str) -> AuthResult<String> {
        let url = Url::parse_with_params(
            GOOGLE_AUTHORIZE_ENDPOINT,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", GOOGLE_SCOPES),
                ("state", redirect_to),
            ],
        )
        .map_err(|err| AuthError::unavailable("google", err.to_string()))?;
        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};

    fn record(email: &str, password: &str) -> UserRecord {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .unwrap_or_default();
        UserRecord {
            email: email.to_string(),
            password_hash,
        }
    }

    #[tokio::test]
    async fn static_credentials_accept_matching_password() -> AuthResult<()> {
        let directory = StaticCredentials::new(&[record("test@test.com", "password")]);
        let identity = directory.authorize("Test@Test.com", "password").await?;
        assert_eq!(identity, Identity::from_email("test@test.com"));
        assert_eq!(directory.id(), "credentials");
        assert_eq!(directory.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn static_credentials_distinguish_reasons_internally() {
        let directory = StaticCredentials::new(&[record("test@test.com", "password")]);
        let missing = directory.authorize("other@test.com", "password").await;
        assert!(matches!(
            missing,
            Err(AuthError::InvalidCredentials {
                reason: CredentialsReason::UserNotFound
            })
        ));
        let wrong = directory.authorize("test@test.com", "passw0rd!").await;
        assert!(matches!(
            wrong,
            Err(AuthError::InvalidCredentials {
                reason: CredentialsReason::IncorrectPassword
            })
        ));
    }

    #[tokio::test]
    async fn corrupt_stored_hash_is_not_a_credentials_failure() {
        let directory = StaticCredentials::new(&[UserRecord {
            email: "test@test.com".to_string(),
            password_hash: "not-a-phc".to_string(),
        }]);
        let result = directory.authorize("test@test.com", "password").await;
        assert!(matches!(result, Err(AuthError::StoredHashInvalid { .. })));
    }

    #[tokio::test]
    async fn google_url_carries_client_and_state() -> Result<(), Box<dyn std::error::Error>> {
        let provider = GoogleOAuth::new(GoogleConfig {
            client_id: "client-123".to_string(),
            redirect_uri: Url::parse("https://conduit.example/auth/google")?,
        });
        let location = Url::parse(&provider.authorization_url("/insights").await?)?;
        assert_eq!(location.host_str(), Some("accounts.google.com"));
        let pairs: HashMap<_, _> = location.query_pairs().into_owned().collect();
        assert_eq!(pairs.get("client_id").map(String::as_str), Some("client-123"));
        assert_eq!(pairs.get("state").map(String::as_str), Some("/insights"));
        assert_eq!(pairs.get("response_type").map(String::as_str), Some("code"));
        Ok(())
    }
}
