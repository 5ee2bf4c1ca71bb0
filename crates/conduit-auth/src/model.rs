//! Request and response payloads for the sign-in actions.
//!
//! # Design
//! - Mirror the form state the sign-in screens render: one optional message,
//!   optional per-field messages, and the echoed email.
//! - Keep payloads wasm-safe so the UI deserializes the same types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default redirect target when the caller does not supply one.
pub const DEFAULT_REDIRECT: &str = "/";

/// Redirect target after signing out.
pub const SIGN_IN_PATH: &str = "/sign-in";

/// Endpoint of the credentials sign-in action.
pub const CREDENTIALS_ACTION_PATH: &str = "/actions/sign-in/credentials";

/// Endpoint of the Google sign-in action.
pub const GOOGLE_ACTION_PATH: &str = "/actions/sign-in/google";

/// Endpoint of the sign-out action.
pub const SIGN_OUT_ACTION_PATH: &str = "/actions/sign-out";

/// Credentials form submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInCredentialsRequest {
    /// Email address entered by the user.
    #[serde(default)]
    pub email: String,
    /// Plaintext password entered by the user.
    #[serde(default)]
    pub password: String,
    /// Location to send the user to after a successful sign-in.
    #[serde(default = "default_redirect")]
    pub redirect_to: String,
}

/// Google sign-in form submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInGoogleRequest {
    /// Location to send the user to after the provider round-trip.
    #[serde(default = "default_redirect")]
    pub redirect_to: String,
}

impl Default for SignInGoogleRequest {
    fn default() -> Self {
        Self {
            redirect_to: default_redirect(),
        }
    }
}

/// Sign-out submission carrying the session to revoke.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignOutRequest {
    /// Session token issued at sign-in, when the client still holds one.
    #[serde(default)]
    pub session: Option<String>,
}

fn default_redirect() -> String {
    DEFAULT_REDIRECT.to_string()
}

/// Form fields that carry validation messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// Email input.
    Email,
    /// Password input.
    Password,
    /// Hidden redirect input.
    RedirectTo,
}

impl Field {
    /// Form field name as submitted by the browser.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::RedirectTo => "redirect_to",
        }
    }
}

/// Flattened field-level validation messages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    /// Messages for the email field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub email: Vec<String>,
    /// Messages for the password field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub password: Vec<String>,
    /// Messages for the redirect field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redirect_to: Vec<String>,
}

impl FieldErrors {
    /// Whether no field carries a message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_empty() && self.password.is_empty() && self.redirect_to.is_empty()
    }

    /// Append a message to the given field.
    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.slot_mut(field).push(message.into());
    }

    /// Messages recorded for a field.
    #[must_use]
    pub fn for_field(&self, field: Field) -> &[String] {
        match field {
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::RedirectTo => &self.redirect_to,
        }
    }

    /// Fold another set of messages into this one.
    pub fn merge(&mut self, other: Self) {
        self.email.extend(other.email);
        self.password.extend(other.password);
        self.redirect_to.extend(other.redirect_to);
    }

    const fn slot_mut(&mut self, field: Field) -> &mut Vec<String> {
        match field {
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::RedirectTo => &mut self.redirect_to,
        }
    }
}

/// Values echoed back so the form can repopulate after a failure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormPayload {
    /// Email as submitted.
    #[serde(default)]
    pub email: Option<String>,
}

/// State rendered by a sign-in form after an unsuccessful submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInFormState {
    /// Human-readable failure shown under the submit button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Field-level validation messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    /// Values echoed back to the form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<FormPayload>,
}

impl SignInFormState {
    /// State for a submission that failed validation.
    #[must_use]
    pub const fn invalid(errors: FieldErrors, payload: Option<FormPayload>) -> Self {
        Self {
            error: None,
            errors: Some(errors),
            payload,
        }
    }

    /// State for a submission the provider refused.
    #[must_use]
    pub fn failed(message: impl Into<String>, payload: Option<FormPayload>) -> Self {
        Self {
            error: Some(message.into()),
            errors: None,
            payload,
        }
    }

    /// Messages for a field, empty when the field passed validation.
    #[must_use]
    pub fn field_errors(&self, field: Field) -> &[String] {
        self.errors
            .as_ref()
            .map_or(&[], |errors| errors.for_field(field))
    }
}

/// Session handed to the client after a successful credentials sign-in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGrant {
    /// Opaque session token presented on sign-out.
    pub token: String,
    /// Email of the signed-in identity.
    pub email: String,
    /// Display name when the provider supplies one.
    #[serde(default)]
    pub name: Option<String>,
    /// Expiry instant of the session.
    pub expires_at: DateTime<Utc>,
}

/// Result of any sign-in or sign-out action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionResponse {
    /// Navigate to `location`, optionally carrying a fresh session.
    Redirect {
        /// Where the browser should go next.
        location: String,
        /// Session issued by the action, when any.
        #[serde(default)]
        session: Option<SessionGrant>,
    },
    /// Stay on the form and render the returned state.
    Rejected {
        /// Form state to render.
        state: SignInFormState,
    },
}

impl ActionResponse {
    /// Redirect without a session.
    #[must_use]
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            location: location.into(),
            session: None,
        }
    }

    /// Form state carried by a rejection.
    #[must_use]
    pub const fn form_state(&self) -> Option<&SignInFormState> {
        match self {
            Self::Rejected { state } => Some(state),
            Self::Redirect { .. } => None,
        }
    }
}
