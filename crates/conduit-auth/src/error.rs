//! Error types for sign-in actions.
//!
//! # Design
//! - Keep display strings constant; detail lives in structured fields.
//! - Credential failures collapse to one user-facing message so callers cannot
//!   tell an unknown account from a wrong password.

use thiserror::Error;

/// Result alias for authentication operations.
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Message rendered for any credential mismatch.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

/// Message rendered when a provider cannot be reached.
pub const PROVIDER_UNAVAILABLE_MESSAGE: &str = "Sign-in provider is unavailable";

/// Message rendered for unexpected failures.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

/// Why a credentials check failed. Never shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsReason {
    /// No account exists for the email.
    UserNotFound,
    /// The account exists but the password did not verify.
    IncorrectPassword,
}

impl CredentialsReason {
    /// Machine-readable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserNotFound => "user_not_found",
            Self::IncorrectPassword => "incorrect_password",
        }
    }
}

/// Primary error type for authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credentials did not match a known account.
    #[error("invalid credentials")]
    InvalidCredentials {
        /// Internal reason for the mismatch.
        reason: CredentialsReason,
    },
    /// Identity provider could not be reached or returned garbage.
    #[error("identity provider unavailable")]
    ProviderUnavailable {
        /// Provider identifier.
        provider: &'static str,
        /// Failure detail for logs.
        detail: String,
    },
    /// Identity provider refused the request.
    #[error("identity provider rejected request")]
    ProviderRejected {
        /// Provider identifier.
        provider: &'static str,
        /// Failure detail for logs.
        detail: String,
    },
    /// Session bookkeeping failed.
    #[error("session operation failed")]
    Session {
        /// Operation identifier.
        operation: &'static str,
    },
    /// Configuration value was missing or malformed.
    #[error("invalid authentication configuration")]
    Config {
        /// Configuration key.
        field: &'static str,
        /// Machine-readable reason.
        reason: &'static str,
    },
    /// Stored password hash could not be parsed.
    #[cfg(not(target_arch = "wasm32"))]
    #[error("invalid stored password hash")]
    StoredHashInvalid {
        /// Hash parsing error detail.
        detail: argon2::password_hash::Error,
    },
    /// Password verification failed for a reason other than a mismatch.
    #[cfg(not(target_arch = "wasm32"))]
    #[error("failed to verify password")]
    PasswordVerifyFailed {
        /// Verification error detail.
        detail: argon2::password_hash::Error,
    },
}

impl AuthError {
    /// Build a configuration error.
    #[must_use]
    pub const fn config(field: &'static str, reason: &'static str) -> Self {
        Self::Config { field, reason }
    }

    /// Build a provider outage error.
    #[must_use]
    pub fn unavailable(provider: &'static str, detail: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            provider,
            detail: detail.into(),
        }
    }

    /// Message safe to render on the sign-in form.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials { .. } | Self::ProviderRejected { .. } => {
                INVALID_CREDENTIALS_MESSAGE
            }
            Self::ProviderUnavailable { .. } => PROVIDER_UNAVAILABLE_MESSAGE,
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }

    /// Whether the failure came from the user's input rather than the system.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. } | Self::ProviderRejected { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_reasons_share_one_message() {
        let missing = AuthError::InvalidCredentials {
            reason: CredentialsReason::UserNotFound,
        };
        let wrong = AuthError::InvalidCredentials {
            reason: CredentialsReason::IncorrectPassword,
        };
        assert_eq!(missing.user_message(), wrong.user_message());
        assert_eq!(missing.user_message(), "Invalid credentials");
        assert!(missing.is_rejection());
    }

    #[test]
    fn provider_outage_has_distinct_message() {
        let err = AuthError::unavailable("google", "connect timeout");
        assert_eq!(err.user_message(), "Sign-in provider is unavailable");
        assert_eq!(err.to_string(), "identity provider unavailable");
        assert!(!err.is_rejection());
    }

    #[test]
    fn config_errors_keep_constant_display() {
        let err = AuthError::config("CONDUIT_SESSION_TTL_SECS", "not_a_number");
        assert_eq!(err.to_string(), "invalid authentication configuration");
        assert_eq!(err.user_message(), "Something went wrong");
        assert_eq!(CredentialsReason::UserNotFound.as_str(), "user_not_found");
    }
}
