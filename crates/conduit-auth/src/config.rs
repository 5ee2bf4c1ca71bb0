//! Environment-driven authentication settings.
//!
//! # Design
//! - Parsing is separated from the process environment through a lookup
//!   closure so tests never mutate global state.
//! - Google settings are all-or-nothing.

use std::time::Duration;

use argon2::password_hash::PasswordHash;
use url::Url;

use crate::error::{AuthError, AuthResult};
use crate::model::SIGN_IN_PATH;

/// Env var holding `email=phc` pairs separated by `;`.
pub const USERS_ENV: &str = "CONDUIT_AUTH_USERS";
/// Env var holding the Google OAuth client id.
pub const GOOGLE_CLIENT_ID_ENV: &str = "CONDUIT_GOOGLE_CLIENT_ID";
/// Env var holding the Google OAuth redirect URI.
pub const GOOGLE_REDIRECT_URI_ENV: &str = "CONDUIT_GOOGLE_REDIRECT_URI";
/// Env var overriding the sign-out redirect.
pub const SIGN_OUT_REDIRECT_ENV: &str = "CONDUIT_SIGN_OUT_REDIRECT";
/// Env var overriding the session lifetime in seconds.
pub const SESSION_TTL_ENV: &str = "CONDUIT_SESSION_TTL_SECS";

/// Default session lifetime.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(86_400);

/// A credentials account known to the static directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    /// Account email, compared case-insensitively.
    pub email: String,
    /// Argon2 PHC string for the account password.
    pub password_hash: String,
}

/// Google OAuth client settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoogleConfig {
    /// OAuth client identifier.
    pub client_id: String,
    /// Callback URI registered with Google.
    pub redirect_uri: Url,
}

/// Authentication settings for the action surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthConfig {
    /// Accounts accepted by the credentials provider.
    pub users: Vec<UserRecord>,
    /// Google provider settings; `None` disables Google sign-in.
    pub google: Option<GoogleConfig>,
    /// Location returned by sign-out.
    pub sign_out_redirect: String,
    /// Lifetime of issued sessions.
    pub session_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            google: None,
            sign_out_redirect: SIGN_IN_PATH.to_string(),
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

impl AuthConfig {
    /// Load settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] when a variable is present but malformed.
    pub fn from_env() -> AuthResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] when a value is present but malformed.
    pub fn from_lookup<F>(lookup: F) -> AuthResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let users = read(USERS_ENV)
            .map(|raw| parse_users(&raw))
            .transpose()?
            .unwrap_or_default();

        let google = match (read(GOOGLE_CLIENT_ID_ENV), read(GOOGLE_REDIRECT_URI_ENV)) {
            (Some(client_id), Some(uri)) => Some(GoogleConfig {
                client_id,
                redirect_uri: Url::parse(&uri)
                    .map_err(|_| AuthError::config(GOOGLE_REDIRECT_URI_ENV, "invalid_url"))?,
            }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(AuthError::config(GOOGLE_REDIRECT_URI_ENV, "missing"));
            }
            (None, Some(_)) => return Err(AuthError::config(GOOGLE_CLIENT_ID_ENV, "missing")),
        };

        let sign_out_redirect = read(SIGN_OUT_REDIRECT_ENV).unwrap_or_else(|| SIGN_IN_PATH.into());
        if !sign_out_redirect.starts_with('/') && Url::parse(&sign_out_redirect).is_err() {
            return Err(AuthError::config(SIGN_OUT_REDIRECT_ENV, "invalid_location"));
        }

        let session_ttl = match read(SESSION_TTL_ENV) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => return Err(AuthError::config(SESSION_TTL_ENV, "must_be_positive")),
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => return Err(AuthError::config(SESSION_TTL_ENV, "not_a_number")),
            },
            None => DEFAULT_SESSION_TTL,
        };

        Ok(Self {
            users,
            google,
            sign_out_redirect,
            session_ttl,
        })
    }
}

fn parse_users(raw: &str) -> AuthResult<Vec<UserRecord>> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (email, hash) = entry
                .split_once('=')
                .ok_or_else(|| AuthError::config(USERS_ENV, "missing_separator"))?;
            let email = email.trim();
            let hash = hash.trim();
            if email.is_empty() {
                return Err(AuthError::config(USERS_ENV, "empty_email"));
            }
            PasswordHash::new(hash).map_err(|_| AuthError::config(USERS_ENV, "invalid_hash"))?;
            Ok(UserRecord {
                email: email.to_ascii_lowercase(),
                password_hash: hash.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use argon2::Argon2;
    use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn hash(password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() -> AuthResult<()> {
        let config = AuthConfig::from_lookup(lookup(&[]))?;
        assert_eq!(config, AuthConfig::default());
        assert_eq!(config.sign_out_redirect, "/sign-in");
        assert_eq!(config.session_ttl, Duration::from_secs(86_400));
        Ok(())
    }

    #[test]
    fn parses_user_directory_entries() -> AuthResult<()> {
        let phc = hash("password");
        let users = format!("Test@Test.com={phc}; ;");
        let config = AuthConfig::from_lookup(lookup(&[(USERS_ENV, &users)]))?;
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.users[0].email, "test@test.com");
        assert_eq!(config.users[0].password_hash, phc);
        Ok(())
    }

    #[test]
    fn rejects_malformed_user_entries() {
        let err = AuthConfig::from_lookup(lookup(&[(USERS_ENV, "test@test.com")]));
        assert!(matches!(
            err,
            Err(AuthError::Config {
                reason: "missing_separator",
                ..
            })
        ));
        let err = AuthConfig::from_lookup(lookup(&[(USERS_ENV, "test@test.com=plaintext")]));
        assert!(matches!(
            err,
            Err(AuthError::Config {
                reason: "invalid_hash",
                ..
            })
        ));
    }

    #[test]
    fn google_settings_require_both_values() -> AuthResult<()> {
        let partial = AuthConfig::from_lookup(lookup(&[(GOOGLE_CLIENT_ID_ENV, "client")]));
        assert!(matches!(
            partial,
            Err(AuthError::Config {
                field: GOOGLE_REDIRECT_URI_ENV,
                ..
            })
        ));

        let config = AuthConfig::from_lookup(lookup(&[
            (GOOGLE_CLIENT_ID_ENV, "client"),
            (GOOGLE_REDIRECT_URI_ENV, "https://conduit.example/auth/google"),
        ]))?;
        let google = config.google.ok_or(AuthError::config("google", "absent"))?;
        assert_eq!(google.client_id, "client");
        assert_eq!(google.redirect_uri.host_str(), Some("conduit.example"));
        Ok(())
    }

    #[test]
    fn session_ttl_must_be_positive_integer() {
        for (raw, reason) in [("0", "must_be_positive"), ("soon", "not_a_number")] {
            let result = AuthConfig::from_lookup(lookup(&[(SESSION_TTL_ENV, raw)]));
            assert!(matches!(result, Err(AuthError::Config { reason: r, .. }) if r == reason));
        }
    }

    #[test]
    fn sign_out_redirect_accepts_paths_and_urls() -> AuthResult<()> {
        let config = AuthConfig::from_lookup(lookup(&[(SIGN_OUT_REDIRECT_ENV, "/goodbye")]))?;
        assert_eq!(config.sign_out_redirect, "/goodbye");
        assert!(AuthConfig::from_lookup(lookup(&[(SIGN_OUT_REDIRECT_ENV, "goodbye")])).is_err());
        Ok(())
    }
}
