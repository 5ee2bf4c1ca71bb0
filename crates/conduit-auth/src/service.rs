//! Sign-in and sign-out actions.
//!
//! # Design
//! - Validation runs first; a submission with field errors never reaches a
//!   provider.
//! - Credential mismatches and provider outages come back as rejected form
//!   state. Only system faults surface as `Err`.
//! - Every attempt is counted by provider and outcome.

use std::sync::Arc;

use conduit_telemetry::{Metrics, SignInOutcome};
use tracing::{error, info, warn};

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::model::{
    ActionResponse, FormPayload, SignInCredentialsRequest, SignInFormState, SignInGoogleRequest,
    SignOutRequest,
};
use crate::provider::{CredentialsAuthority, GoogleOAuth, OAuthProvider, StaticCredentials};
use crate::session::SessionRegistry;
use crate::validate::{validate_credentials, validate_redirect};

const GOOGLE_PROVIDER: &str = "google";

/// Entry point for the three authentication actions.
#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialsAuthority>,
    google: Option<Arc<dyn OAuthProvider>>,
    sessions: Arc<SessionRegistry>,
    sign_out_redirect: String,
    metrics: Option<Metrics>,
}

impl AuthService {
    /// Build the service from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Session`] when the session lifetime is unusable.
    pub fn from_config(config: &AuthConfig) -> AuthResult<Self> {
        let credentials = Arc::new(StaticCredentials::new(&config.users));
        let google = config
            .google
            .clone()
            .map(|google| Arc::new(GoogleOAuth::new(google)) as Arc<dyn OAuthProvider>);
        let sessions = Arc::new(SessionRegistry::new(config.session_ttl)?);
        Ok(Self::new(
            credentials,
            google,
            sessions,
            config.sign_out_redirect.clone(),
        ))
    }

    /// Assemble the service from explicit collaborators.
    #[must_use]
    pub fn new(
        credentials: Arc<dyn CredentialsAuthority>,
        google: Option<Arc<dyn OAuthProvider>>,
        sessions: Arc<SessionRegistry>,
        sign_out_redirect: String,
    ) -> Self {
        Self {
            credentials,
            google,
            sessions,
            sign_out_redirect,
            metrics: None,
        }
    }

    /// Record attempts and session counts into the given registry.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Session registry backing this service.
    #[must_use]
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error only for system faults such as an unreadable stored
    /// hash. Invalid input and wrong credentials produce
    /// [`ActionResponse::Rejected`].
    pub async fn sign_in_with_credentials(
        &self,
        request: SignInCredentialsRequest,
    ) -> AuthResult<ActionResponse> {
        let provider = self.credentials.id();
        let payload = Some(FormPayload {
            email: Some(request.email.clone()),
        });

        let validated = match validate_credentials(&request) {
            Ok(validated) => validated,
            Err(errors) => {
                info!(provider, "sign-in input failed validation");
                self.record_sign_in(provider, SignInOutcome::Invalid);
                return Ok(ActionResponse::Rejected {
                    state: SignInFormState::invalid(errors, payload),
                });
            }
        };

        match self
            .credentials
            .authorize(&validated.email, &validated.password)
            .await
        {
            Ok(identity) => {
                let session = self.sessions.issue(&identity).await?;
                info!(provider, "sign-in succeeded");
                self.record_sign_in(provider, SignInOutcome::Success);
                self.refresh_session_gauge().await;
                Ok(ActionResponse::Redirect {
                    location: validated.redirect_to,
                    session: Some(session),
                })
            }
            Err(err) => self.reject(provider, err, payload),
        }
    }

    /// Start a Google sign-in.
    ///
    /// # Errors
    ///
    /// Returns an error only for system faults. A missing or failing provider
    /// produces [`ActionResponse::Rejected`].
    pub async fn sign_in_with_google(
        &self,
        request: SignInGoogleRequest,
    ) -> AuthResult<ActionResponse> {
        if let Err(errors) = validate_redirect(&request.redirect_to) {
            info!(provider = GOOGLE_PROVIDER, "sign-in input failed validation");
            self.record_sign_in(GOOGLE_PROVIDER, SignInOutcome::Invalid);
            return Ok(ActionResponse::Rejected {
                state: SignInFormState::invalid(errors, None),
            });
        }

        let Some(google) = self.google.as_ref() else {
            return self.reject(
                GOOGLE_PROVIDER,
                AuthError::unavailable(GOOGLE_PROVIDER, "provider not configured"),
                None,
            );
        };

        match google.authorization_url(&request.redirect_to).await {
            Ok(location) => {
                info!(provider = google.id(), "redirecting to identity provider");
                self.record_sign_in(google.id(), SignInOutcome::Success);
                Ok(ActionResponse::redirect(location))
            }
            Err(err) => self.reject(google.id(), err, None),
        }
    }

    /// Sign out, revoking the presented session when one is supplied.
    pub async fn sign_out(&self, request: SignOutRequest) -> ActionResponse {
        if let Some(token) = request.session.as_deref() {
            let revoked = self.sessions.revoke(token).await;
            info!(revoked, "sign-out processed");
        }
        if let Some(metrics) = &self.metrics {
            metrics.inc_sign_out();
        }
        self.refresh_session_gauge().await;
        ActionResponse::redirect(self.sign_out_redirect.clone())
    }

    fn reject(
        &self,
        provider: &'static str,
        err: AuthError,
        payload: Option<FormPayload>,
    ) -> AuthResult<ActionResponse> {
        match &err {
            AuthError::InvalidCredentials { reason } => {
                warn!(provider, reason = reason.as_str(), "sign-in rejected");
                self.record_sign_in(provider, SignInOutcome::Rejected);
            }
            AuthError::ProviderRejected { detail, .. } => {
                warn!(provider, detail = %detail, "sign-in rejected by provider");
                self.record_sign_in(provider, SignInOutcome::Rejected);
            }
            AuthError::ProviderUnavailable { detail, .. } => {
                warn!(provider, detail = %detail, "identity provider unavailable");
                self.record_sign_in(provider, SignInOutcome::Failed);
            }
            _ => {
                error!(provider, error = %err, "sign-in failed");
                self.record_sign_in(provider, SignInOutcome::Failed);
                return Err(err);
            }
        }
        Ok(ActionResponse::Rejected {
            state: SignInFormState::failed(err.user_message(), payload),
        })
    }

    fn record_sign_in(&self, provider: &str, outcome: SignInOutcome) {
        if let Some(metrics) = &self.metrics {
            metrics.inc_sign_in(provider, outcome);
        }
    }

    async fn refresh_session_gauge(&self) {
        if let Some(metrics) = &self.metrics {
            let count = i64::try_from(self.sessions.len().await).unwrap_or(i64::MAX);
            metrics.set_active_sessions(count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::CredentialsReason;
    use crate::model::Field;
    use crate::provider::Identity;

    #[derive(Default)]
    struct CountingAuthority {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CredentialsAuthority for CountingAuthority {
        async fn authorize(&self, email: &str, password: &str) -> AuthResult<Identity> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match (email, password) {
                ("test@test.com", "password") => Ok(Identity::from_email(email)),
                ("test@test.com", _) => Err(AuthError::InvalidCredentials {
                    reason: CredentialsReason::IncorrectPassword,
                }),
                ("down@test.com", _) => Err(AuthError::unavailable("credentials", "timeout")),
                ("broken@test.com", _) => Err(AuthError::Session {
                    operation: "test.broken",
                }),
                _ => Err(AuthError::InvalidCredentials {
                    reason: CredentialsReason::UserNotFound,
                }),
            }
        }
    }

    struct FixedGoogle;

    #[async_trait]
    impl OAuthProvider for FixedGoogle {
        fn id(&self) -> &'static str {
            "google"
        }

        async fn authorization_url(&self, redirect_to: &str) -> AuthResult<String> {
            Ok(format!("https://accounts.example/auth?state={redirect_to}"))
        }
    }

    fn service(authority: Arc<CountingAuthority>) -> AuthResult<AuthService> {
        let sessions = Arc::new(SessionRegistry::new(Duration::from_secs(60))?);
        Ok(AuthService::new(
            authority,
            Some(Arc::new(FixedGoogle)),
            sessions,
            "/sign-in".to_string(),
        ))
    }

    fn credentials(email: &str, password: &str) -> SignInCredentialsRequest {
        SignInCredentialsRequest {
            email: email.to_string(),
            password: password.to_string(),
            redirect_to: "/".to_string(),
        }
    }

    #[tokio::test]
    async fn invalid_email_yields_field_error_without_provider_call() -> AuthResult<()> {
        let authority = Arc::new(CountingAuthority::default());
        let service = service(authority.clone())?;
        let response = service
            .sign_in_with_credentials(credentials("not-an-email", "password"))
            .await?;
        let state = response.form_state().cloned().unwrap_or_default();
        assert_eq!(state.field_errors(Field::Email), ["Invalid email".to_string()]);
        assert!(state.error.is_none());
        assert_eq!(
            state.payload.and_then(|payload| payload.email),
            Some("not-an-email".to_string())
        );
        assert_eq!(authority.calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn successful_sign_in_redirects_with_session() -> AuthResult<()> {
        let authority = Arc::new(CountingAuthority::default());
        let service = service(authority.clone())?.with_metrics(
            Metrics::new().map_err(|_| AuthError::config("metrics", "init"))?,
        );
        let response = service
            .sign_in_with_credentials(credentials("test@test.com", "password"))
            .await?;
        let ActionResponse::Redirect {
            location,
            session: Some(session),
        } = response
        else {
            panic!("expected redirect with session");
        };
        assert_eq!(location, "/");
        assert_eq!(session.email, "test@test.com");
        assert!(service.sessions().lookup(&session.token).await.is_some());
        assert_eq!(authority.calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn credential_failures_render_one_message() -> AuthResult<()> {
        let service = service(Arc::new(CountingAuthority::default()))?;
        for email in ["test@test.com", "nobody@test.com"] {
            let response = service
                .sign_in_with_credentials(credentials(email, "wrong-password"))
                .await?;
            let state = response.form_state().cloned().unwrap_or_default();
            assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
            assert_eq!(
                state.payload.and_then(|payload| payload.email).as_deref(),
                Some(email)
            );
        }
        Ok(())
    }

    #[tokio::test]
    async fn provider_outage_renders_distinct_message() -> AuthResult<()> {
        let service = service(Arc::new(CountingAuthority::default()))?;
        let response = service
            .sign_in_with_credentials(credentials("down@test.com", "password"))
            .await?;
        let state = response.form_state().cloned().unwrap_or_default();
        assert_eq!(
            state.error.as_deref(),
            Some("Sign-in provider is unavailable")
        );
        Ok(())
    }

    #[tokio::test]
    async fn system_faults_surface_as_errors() -> AuthResult<()> {
        let service = service(Arc::new(CountingAuthority::default()))?;
        let result = service
            .sign_in_with_credentials(credentials("broken@test.com", "password"))
            .await;
        assert!(matches!(result, Err(AuthError::Session { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn google_sign_in_validates_redirect_then_redirects() -> AuthResult<()> {
        let service = service(Arc::new(CountingAuthority::default()))?;
        let rejected = service
            .sign_in_with_google(SignInGoogleRequest {
                redirect_to: "nowhere".to_string(),
            })
            .await?;
        let state = rejected.form_state().cloned().unwrap_or_default();
        assert_eq!(state.field_errors(Field::RedirectTo).len(), 1);

        let response = service
            .sign_in_with_google(SignInGoogleRequest::default())
            .await?;
        assert_eq!(
            response,
            ActionResponse::redirect("https://accounts.example/auth?state=/")
        );
        Ok(())
    }

    #[tokio::test]
    async fn google_sign_in_without_provider_is_unavailable() -> AuthResult<()> {
        let service = AuthService::from_config(&AuthConfig::default())?;
        let response = service
            .sign_in_with_google(SignInGoogleRequest::default())
            .await?;
        let state = response.form_state().cloned().unwrap_or_default();
        assert_eq!(
            state.error.as_deref(),
            Some("Sign-in provider is unavailable")
        );
        Ok(())
    }

    #[tokio::test]
    async fn sign_out_revokes_session_and_redirects() -> AuthResult<()> {
        let service = service(Arc::new(CountingAuthority::default()))?;
        let ActionResponse::Redirect {
            session: Some(session),
            ..
        } = service
            .sign_in_with_credentials(credentials("test@test.com", "password"))
            .await?
        else {
            panic!("expected session");
        };
        let response = service
            .sign_out(SignOutRequest {
                session: Some(session.token.clone()),
            })
            .await;
        assert_eq!(response, ActionResponse::redirect("/sign-in"));
        assert!(service.sessions().lookup(&session.token).await.is_none());
        Ok(())
    }
}
