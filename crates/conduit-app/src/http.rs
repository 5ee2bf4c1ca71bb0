//! Router construction and request handlers.
//!
//! # Design
//! - The three auth actions answer with the same [`ActionResponse`] the UI
//!   deserializes; rejections are `200 OK` with form state.
//! - Only system faults become error statuses, rendered as a constant message.
//! - Every matched route is counted by status.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::{MatchedPath, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use conduit_auth::error::GENERIC_FAILURE_MESSAGE;
use conduit_auth::model::{CREDENTIALS_ACTION_PATH, GOOGLE_ACTION_PATH, SIGN_OUT_ACTION_PATH};
use conduit_auth::{
    ActionResponse, AuthError, AuthService, SignInCredentialsRequest, SignInGoogleRequest,
    SignOutRequest,
};
use conduit_telemetry::{Metrics, build_sha, propagate_request_id_layer, set_request_id_layer};
use serde::Serialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{Span, error};

const HEADER_REQUEST_ID: &str = "x-request-id";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    auth: AuthService,
    metrics: Metrics,
}

impl AppState {
    /// Bundle the auth service with the metrics registry it reports into.
    #[must_use]
    pub const fn new(auth: AuthService, metrics: Metrics) -> Self {
        Self { auth, metrics }
    }
}

/// Handler failure rendered as `{"error": ...}`.
#[derive(Debug)]
pub(crate) struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    fn auth(operation: &'static str, err: &AuthError) -> Self {
        error!(operation, error = %err, "auth action failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.user_message(),
        }
    }

    fn internal(operation: &'static str, detail: &str) -> Self {
        error!(operation, detail, "request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: GENERIC_FAILURE_MESSAGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let state = Arc::new(state);
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request| {
            let request_id = request
                .headers()
                .get(HEADER_REQUEST_ID)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("")
                .to_string();
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                route = %request.uri().path(),
                request_id = %request_id,
                build_sha = %build_sha(),
                status_code = tracing::field::Empty,
                latency_ms = tracing::field::Empty
            )
        })
        .on_response(|response: &Response, latency: Duration, span: &Span| {
            span.record("status_code", response.status().as_u16());
            span.record(
                "latency_ms",
                u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
            );
        });
    let layered = ServiceBuilder::new()
        .layer(set_request_id_layer())
        .layer(propagate_request_id_layer())
        .layer(trace_layer);

    Router::new()
        .route(CREDENTIALS_ACTION_PATH, post(sign_in_credentials))
        .route(GOOGLE_ACTION_PATH, post(sign_in_google))
        .route(SIGN_OUT_ACTION_PATH, post(sign_out))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route_layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .layer(layered)
        .with_state(state)
}

async fn count_requests(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |path| path.as_str().to_string());
    let response = next.run(request).await;
    state
        .metrics
        .inc_http_request(&route, response.status().as_u16());
    response
}

pub(crate) async fn sign_in_credentials(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignInCredentialsRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    state
        .auth
        .sign_in_with_credentials(request)
        .await
        .map(Json)
        .map_err(|err| ApiError::auth("sign_in.credentials", &err))
}

pub(crate) async fn sign_in_google(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignInGoogleRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    state
        .auth
        .sign_in_with_google(request)
        .await
        .map(Json)
        .map_err(|err| ApiError::auth("sign_in.google", &err))
}

pub(crate) async fn sign_out(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignOutRequest>,
) -> Json<ActionResponse> {
    Json(state.auth.sign_out(request).await)
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    build: &'static str,
    active_sessions: usize,
}

pub(crate) async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        build: build_sha(),
        active_sessions: state.auth.sessions().len().await,
    })
}

pub(crate) async fn metrics(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let body = state
        .metrics
        .render()
        .map_err(|err| ApiError::internal("metrics.render", &err.to_string()))?;
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/plain; version=0.0.4")
        .body(Body::from(body))
        .map_err(|err| ApiError::internal("metrics.response", &err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::Argon2;
    use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};
    use axum::body::to_bytes;
    use axum::http::Request as HttpRequest;
    use conduit_auth::{AuthConfig, Field, UserRecord};
    use tower::ServiceExt;

    const EMAIL: &str = "ada@example.com";
    const PASSWORD: &str = "correct-horse";

    fn state() -> AppState {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(PASSWORD.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .expect("hash");
        let config = AuthConfig {
            users: vec![UserRecord {
                email: EMAIL.to_string(),
                password_hash,
            }],
            ..AuthConfig::default()
        };
        let metrics = Metrics::new().expect("metrics");
        let auth = AuthService::from_config(&config)
            .expect("auth service")
            .with_metrics(metrics.clone());
        AppState::new(auth, metrics)
    }

    fn post_json(path: &str, body: &serde_json::Value) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri(path)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn read_action(response: Response) -> ActionResponse {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("action response")
    }

    #[tokio::test]
    async fn credentials_sign_in_redirects_with_session() {
        let response = router(state())
            .oneshot(post_json(
                CREDENTIALS_ACTION_PATH,
                &json!({
                    "email": EMAIL,
                    "password": PASSWORD,
                    "redirect_to": "https://conduit.example/reports"
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(HEADER_REQUEST_ID));
        match read_action(response).await {
            ActionResponse::Redirect { location, session } => {
                assert_eq!(location, "https://conduit.example/reports");
                assert_eq!(session.map(|grant| grant.email).as_deref(), Some(EMAIL));
            }
            other @ ActionResponse::Rejected { .. } => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn relative_redirect_other_than_root_is_rejected() {
        let state = state();
        let response = router(state.clone())
            .oneshot(post_json(
                CREDENTIALS_ACTION_PATH,
                &json!({ "email": EMAIL, "password": PASSWORD, "redirect_to": "/reports" }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let action = read_action(response).await;
        let form = action.form_state().expect("rejected");
        assert!(!form.field_errors(Field::RedirectTo).is_empty());
        assert!(form.field_errors(Field::Email).is_empty());
        assert!(state.auth.sessions().is_empty().await);
    }

    #[tokio::test]
    async fn wrong_password_stays_on_form_with_email_echoed() {
        let response = router(state())
            .oneshot(post_json(
                CREDENTIALS_ACTION_PATH,
                &json!({ "email": EMAIL, "password": "wrong-password", "redirect_to": "/" }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let action = read_action(response).await;
        let state = action.form_state().expect("rejected");
        assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
        assert_eq!(
            state.payload.as_ref().and_then(|payload| payload.email.as_deref()),
            Some(EMAIL)
        );
    }

    #[tokio::test]
    async fn invalid_email_returns_field_errors() {
        let response = router(state())
            .oneshot(post_json(
                CREDENTIALS_ACTION_PATH,
                &json!({ "email": "not-an-email", "password": PASSWORD, "redirect_to": "/" }),
            ))
            .await
            .expect("response");
        let action = read_action(response).await;
        let state = action.form_state().expect("rejected");
        assert!(!state.field_errors(Field::Email).is_empty());
        assert!(state.field_errors(Field::Password).is_empty());
    }

    #[tokio::test]
    async fn google_without_configuration_reports_unavailable() {
        let response = router(state())
            .oneshot(post_json(GOOGLE_ACTION_PATH, &json!({ "redirect_to": "/" })))
            .await
            .expect("response");
        let action = read_action(response).await;
        let state = action.form_state().expect("rejected");
        assert_eq!(state.error.as_deref(), Some("Sign-in provider is unavailable"));
    }

    #[tokio::test]
    async fn sign_out_revokes_the_presented_session() {
        let state = state();
        let app = router(state.clone());
        let signed_in = app
            .clone()
            .oneshot(post_json(
                CREDENTIALS_ACTION_PATH,
                &json!({ "email": EMAIL, "password": PASSWORD, "redirect_to": "/" }),
            ))
            .await
            .expect("response");
        let ActionResponse::Redirect {
            session: Some(session),
            ..
        } = read_action(signed_in).await
        else {
            panic!("expected a session");
        };
        assert_eq!(state.auth.sessions().len().await, 1);

        let response = app
            .oneshot(post_json(
                SIGN_OUT_ACTION_PATH,
                &json!({ "session": session.token }),
            ))
            .await
            .expect("response");
        assert_eq!(
            read_action(response).await,
            ActionResponse::redirect("/sign-in")
        );
        assert!(state.auth.sessions().lookup(&session.token).await.is_none());
    }

    #[tokio::test]
    async fn health_and_metrics_respond() {
        let app = router(state());
        let health = app
            .clone()
            .oneshot(HttpRequest::builder().uri("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(health.status(), StatusCode::OK);

        let metrics = app
            .oneshot(HttpRequest::builder().uri("/metrics").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(metrics.status(), StatusCode::OK);
        let body = to_bytes(metrics.into_body(), usize::MAX).await.expect("body");
        let text = String::from_utf8(body.to_vec()).expect("utf8");
        assert!(text.contains("http_requests_total"));
    }

    #[test]
    fn api_error_renders_the_user_message() {
        let err = ApiError::auth("sign_in.credentials", &AuthError::unavailable("google", "down"));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Sign-in provider is unavailable");
    }
}
