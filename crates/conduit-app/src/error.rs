//! # Design
//!
//! - Centralize application-level errors for bootstrap and serving.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use std::io;

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication setup failed.
    #[error("authentication operation failed")]
    Auth {
        /// Operation identifier.
        operation: &'static str,
        /// Source authentication error.
        source: conduit_auth::AuthError,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: conduit_telemetry::TelemetryError,
    },
    /// IO operations failed.
    #[error("io operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Source IO error.
        source: io::Error,
    },
    /// Configuration values were invalid.
    #[error("invalid configuration")]
    InvalidConfig {
        /// Field name that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Optional value associated with the failure.
        value: Option<String>,
    },
}

impl AppError {
    pub(crate) const fn auth(operation: &'static str, source: conduit_auth::AuthError) -> Self {
        Self::Auth { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: conduit_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn io(operation: &'static str, source: io::Error) -> Self {
        Self::Io { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn app_error_helpers_build_variants() {
        let auth = AppError::auth(
            "auth_config.load",
            conduit_auth::AuthError::config("CONDUIT_SESSION_TTL_SECS", "invalid_number"),
        );
        assert!(matches!(auth, AppError::Auth { operation: "auth_config.load", .. }));
        assert!(auth.source().is_some());

        let io = AppError::io("listener.bind", io::Error::other("in use"));
        assert!(matches!(io, AppError::Io { .. }));
        assert_eq!(io.to_string(), "io operation failed");
    }
}
