//! Environment loading and the boot sequence.
//!
//! # Design
//! - Every setting is read through one lookup so tests can inject values.
//! - Logging is installed before anything else can fail loudly.
//! - Expired sessions are swept on a fixed interval for the life of the server.

use std::net::SocketAddr;
use std::time::Duration;

use chrono::Utc;
use conduit_auth::{AuthConfig, AuthService};
use conduit_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig, Metrics, init_logging};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::http::{AppState, router};

/// Listener address variable.
pub const BIND_ADDR_ENV: &str = "CONDUIT_BIND_ADDR";
/// Log format override (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "CONDUIT_LOG_FORMAT";
/// Listener address used when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:7070";

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Settings for one server run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address the HTTP listener binds.
    pub bind_addr: SocketAddr,
    /// Output format for logs.
    pub log_format: LogFormat,
    /// Authentication settings.
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is present but malformed.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidConfig`] for an unparsable bind address and
    /// [`AppError::Auth`] for malformed authentication settings.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup(BIND_ADDR_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.parse().map_err(|_| AppError::InvalidConfig {
            field: BIND_ADDR_ENV,
            reason: "invalid_socket_addr",
            value: Some(raw_addr.clone()),
        })?;
        let log_format = LogFormat::from_env_value(lookup(LOG_FORMAT_ENV).as_deref());
        let auth = AuthConfig::from_lookup(&lookup)
            .map_err(|err| AppError::auth("auth_config.load", err))?;
        Ok(Self {
            bind_addr,
            log_format,
            auth,
        })
    }
}

/// Entry point for the Conduit boot sequence.
///
/// # Errors
///
/// Returns an error if configuration, logging, or the listener fails.
pub async fn run_app() -> AppResult<()> {
    let config = AppConfig::from_env()?;
    run_app_with(config).await
}

/// Boot sequence driven entirely by the supplied configuration.
pub(crate) async fn run_app_with(config: AppConfig) -> AppResult<()> {
    let logging = LoggingConfig {
        format: config.log_format,
        ..LoggingConfig::default()
    };
    init_logging(&logging).map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _context = GlobalContextGuard::new("bootstrap");

    info!("Conduit application bootstrap starting");
    if config.auth.users.is_empty() {
        warn!("no credential accounts configured; credentials sign-in will reject everyone");
    }

    let metrics = Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
    let auth = AuthService::from_config(&config.auth)
        .map_err(|err| AppError::auth("auth_service.new", err))?
        .with_metrics(metrics.clone());
    let sweeper = spawn_session_sweeper(auth.clone());

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|err| AppError::io("listener.bind", err))?;
    info!(addr = %config.bind_addr, "Launching HTTP listener");

    let serve_result = axum::serve(listener, router(AppState::new(auth, metrics)).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await;

    sweeper.abort();
    match sweeper.await {
        Err(err) if !err.is_cancelled() => warn!(error = %err, "session sweeper join failed"),
        _ => {}
    }

    serve_result.map_err(|err| AppError::io("server.serve", err))?;
    info!("HTTP server shutdown complete");
    Ok(())
}

fn spawn_session_sweeper(auth: AuthService) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = auth.sessions().purge_expired_at(Utc::now()).await;
            if purged > 0 {
                debug!(purged, "expired sessions purged");
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(values: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = values
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| values.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = AppConfig::from_lookup(lookup(&[])).expect("config");
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.log_format, LogFormat::infer());
        assert_eq!(config.auth, AuthConfig::default());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AppConfig::from_lookup(lookup(&[
            (BIND_ADDR_ENV, "0.0.0.0:8088"),
            (LOG_FORMAT_ENV, "JSON"),
        ]))
        .expect("config");
        assert_eq!(config.bind_addr.port(), 8088);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_bind_addr_is_reported() {
        let err = AppConfig::from_lookup(lookup(&[(BIND_ADDR_ENV, "not-an-addr")]))
            .expect_err("invalid address");
        assert!(matches!(
            err,
            AppError::InvalidConfig {
                field: BIND_ADDR_ENV,
                reason: "invalid_socket_addr",
                ..
            }
        ));
    }

    #[test]
    fn auth_errors_carry_the_operation() {
        let err = AppConfig::from_lookup(lookup(&[("CONDUIT_SESSION_TTL_SECS", "soon")]))
            .expect_err("invalid ttl");
        assert!(matches!(
            err,
            AppError::Auth {
                operation: "auth_config.load",
                ..
            }
        ));
    }
}
