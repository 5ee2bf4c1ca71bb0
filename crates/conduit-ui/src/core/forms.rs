//! Sign-in form models.
//!
//! # Design
//! - Forms validate with the same rules the action boundary applies, so an
//!   invalid email never leaves the browser.
//! - A pending flag blocks double submission while an action is in flight.
//! - Rejections repopulate the email and clear the password.

use std::borrow::Cow;

use conduit_auth::error::GENERIC_FAILURE_MESSAGE;
use conduit_auth::model::DEFAULT_REDIRECT;
use conduit_auth::{
    ActionResponse, Field, SessionGrant, SignInCredentialsRequest, SignInFormState,
    SignInGoogleRequest, validate_credentials,
};

/// Query parameter carrying the post sign-in destination.
pub const CALLBACK_URL_PARAM: &str = "callbackUrl";

/// Read the post sign-in destination from a location query string.
///
/// Accepts the query with or without the leading `?`; falls back to `/`.
#[must_use]
pub fn callback_url(query: &str) -> String {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == CALLBACK_URL_PARAM)
        .and_then(|(_, value)| {
            urlencoding::decode(&value.replace('+', " "))
                .ok()
                .map(Cow::into_owned)
        })
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_REDIRECT.to_string())
}

/// Where a finished submission leads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Navigate away, storing the session when one was issued.
    Navigate {
        /// Destination.
        location: String,
        /// Fresh session.
        session: Option<SessionGrant>,
    },
    /// Stay and render the form state.
    Stay,
}

fn settle(state: &mut SignInFormState, response: ActionResponse) -> SubmitOutcome {
    match response {
        ActionResponse::Redirect { location, session } => {
            *state = SignInFormState::default();
            SubmitOutcome::Navigate { location, session }
        }
        ActionResponse::Rejected { state: rejected } => {
            *state = rejected;
            SubmitOutcome::Stay
        }
    }
}

/// Email and password form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CredentialsForm {
    /// Email input value.
    pub email: String,
    /// Password input value.
    pub password: String,
    /// Post sign-in destination.
    pub redirect_to: String,
    pending: bool,
    state: SignInFormState,
}

impl CredentialsForm {
    /// Empty form redirecting to `redirect_to`.
    #[must_use]
    pub fn new(redirect_to: impl Into<String>) -> Self {
        Self {
            redirect_to: redirect_to.into(),
            ..Self::default()
        }
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Last rendered state.
    #[must_use]
    pub const fn state(&self) -> &SignInFormState {
        &self.state
    }

    /// Messages for one field.
    #[must_use]
    pub fn errors(&self, field: Field) -> &[String] {
        self.state.field_errors(field)
    }

    /// Start a submission. Returns `None` while pending or when validation
    /// fails locally, in which case field errors are populated.
    pub fn begin_submit(&mut self) -> Option<SignInCredentialsRequest> {
        if self.pending {
            return None;
        }
        let request = SignInCredentialsRequest {
            email: self.email.clone(),
            password: self.password.clone(),
            redirect_to: self.redirect_to.clone(),
        };
        if let Err(errors) = validate_credentials(&request) {
            self.state = SignInFormState::invalid(errors, None);
            return None;
        }
        self.pending = true;
        Some(request)
    }

    /// Apply the action's response.
    pub fn finish(&mut self, response: ActionResponse) -> SubmitOutcome {
        self.pending = false;
        let outcome = settle(&mut self.state, response);
        if outcome == SubmitOutcome::Stay {
            if let Some(email) = self
                .state
                .payload
                .as_ref()
                .and_then(|payload| payload.email.clone())
            {
                self.email = email;
            }
            self.password.clear();
        }
        outcome
    }

    /// Record a transport failure.
    pub fn fail(&mut self) {
        self.pending = false;
        self.state = SignInFormState::failed(GENERIC_FAILURE_MESSAGE, None);
    }
}

/// Single-button Google form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GoogleForm {
    /// Post sign-in destination.
    pub redirect_to: String,
    pending: bool,
    state: SignInFormState,
}

impl GoogleForm {
    /// Form redirecting to `redirect_to`.
    #[must_use]
    pub fn new(redirect_to: impl Into<String>) -> Self {
        Self {
            redirect_to: redirect_to.into(),
            ..Self::default()
        }
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Last rendered state.
    #[must_use]
    pub const fn state(&self) -> &SignInFormState {
        &self.state
    }

    /// Start a submission; `None` while pending.
    pub fn begin_submit(&mut self) -> Option<SignInGoogleRequest> {
        if self.pending {
            return None;
        }
        self.pending = true;
        Some(SignInGoogleRequest {
            redirect_to: self.redirect_to.clone(),
        })
    }

    /// Apply the action's response.
    pub fn finish(&mut self, response: ActionResponse) -> SubmitOutcome {
        self.pending = false;
        settle(&mut self.state, response)
    }

    /// Record a transport failure.
    pub fn fail(&mut self) {
        self.pending = false;
        self.state = SignInFormState::failed(GENERIC_FAILURE_MESSAGE, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_auth::error::INVALID_CREDENTIALS_MESSAGE;
    use conduit_auth::{FieldErrors, FormPayload};

    #[test]
    fn callback_url_reads_query_with_default() {
        assert_eq!(callback_url(""), "/");
        assert_eq!(callback_url("?tab=1"), "/");
        assert_eq!(
            callback_url("?callbackUrl=https%3A%2F%2Fapp.example.com%2Freports"),
            "https://app.example.com/reports"
        );
        assert_eq!(callback_url("a=1&callbackUrl=%2F"), "/");
        assert_eq!(
            callback_url("?callbackUrl=https%3A%2F%2Fapp.example.com%2Fsearch%3Fq%3Da+b"),
            "https://app.example.com/search?q=a b"
        );
    }

    #[test]
    fn invalid_email_never_submits() {
        for email in ["bad", "not-an-email"] {
            let mut form = CredentialsForm::new("/");
            form.email = email.to_string();
            form.password = "long-enough".to_string();
            assert_eq!(form.begin_submit(), None, "{email}");
            assert!(!form.is_pending());
            assert_eq!(form.errors(Field::Email), ["Invalid email".to_string()]);
            assert!(form.errors(Field::Password).is_empty());
        }
    }

    #[test]
    fn pending_blocks_double_submit() {
        let mut form = CredentialsForm::new("/");
        form.email = "ada@example.com".to_string();
        form.password = "correct horse".to_string();
        assert!(form.begin_submit().is_some());
        assert!(form.is_pending());
        assert_eq!(form.begin_submit(), None);
        let outcome = form.finish(ActionResponse::redirect("/"));
        assert_eq!(
            outcome,
            SubmitOutcome::Navigate {
                location: "/".to_string(),
                session: None,
            }
        );
        assert!(!form.is_pending());
    }

    #[test]
    fn rejection_repopulates_email_and_clears_password() {
        let mut form = CredentialsForm::new("/");
        form.email = "ada@example.com".to_string();
        form.password = "wrong password".to_string();
        form.begin_submit();
        let outcome = form.finish(ActionResponse::Rejected {
            state: SignInFormState::failed(
                INVALID_CREDENTIALS_MESSAGE,
                Some(FormPayload {
                    email: Some("ada@example.com".to_string()),
                }),
            ),
        });
        assert_eq!(outcome, SubmitOutcome::Stay);
        assert_eq!(form.email, "ada@example.com");
        assert!(form.password.is_empty());
        assert_eq!(form.state().error.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn google_form_surfaces_server_field_errors() {
        let mut form = GoogleForm::new("bad");
        assert!(form.begin_submit().is_some());
        let mut errors = FieldErrors::default();
        errors.push(Field::RedirectTo, "Invalid url");
        form.finish(ActionResponse::Rejected {
            state: SignInFormState::invalid(errors, None),
        });
        assert_eq!(form.state().field_errors(Field::RedirectTo), ["Invalid url".to_string()]);
        form.fail();
        assert_eq!(form.state().error.as_deref(), Some("Something went wrong"));
    }
}
