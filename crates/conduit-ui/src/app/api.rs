//! Action client and the context sharing it.
//!
//! # Design
//! - Create exactly one client per app boot.
//! - Every action answers with an [`ActionResponse`]; transport and decode
//!   failures surface as `anyhow` errors for the form to report.

use std::rc::Rc;

use conduit_auth::model::{CREDENTIALS_ACTION_PATH, GOOGLE_ACTION_PATH, SIGN_OUT_ACTION_PATH};
use conduit_auth::{ActionResponse, SignInCredentialsRequest, SignInGoogleRequest, SignOutRequest};
use gloo_net::http::Request;
use serde::Serialize;

/// HTTP client for the auth actions.
#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    async fn post_action<B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<ActionResponse> {
        let response = Request::post(&format!("{}{}", self.base_url, path))
            .json(body)?
            .send()
            .await?;
        Ok(response.json::<ActionResponse>().await?)
    }

    pub(crate) async fn sign_in_with_credentials(
        &self,
        request: &SignInCredentialsRequest,
    ) -> anyhow::Result<ActionResponse> {
        self.post_action(CREDENTIALS_ACTION_PATH, request).await
    }

    pub(crate) async fn sign_in_with_google(
        &self,
        request: &SignInGoogleRequest,
    ) -> anyhow::Result<ActionResponse> {
        self.post_action(GOOGLE_ACTION_PATH, request).await
    }

    pub(crate) async fn sign_out(&self, session: Option<String>) -> anyhow::Result<ActionResponse> {
        self.post_action(SIGN_OUT_ACTION_PATH, &SignOutRequest { session })
            .await
    }
}

/// Shared client context.
#[derive(Clone)]
pub(crate) struct ApiCtx {
    pub(crate) client: Rc<ApiClient>,
}

impl ApiCtx {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Rc::new(ApiClient::new(base_url)),
        }
    }
}

impl PartialEq for ApiCtx {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.client, &other.client)
    }
}
