//! Field validation for sign-in submissions.
//!
//! # Design
//! - Every rule runs; messages are collected per field instead of stopping at
//!   the first failure.
//! - Validation never touches a provider. A non-empty [`FieldErrors`] is the
//!   only failure signal.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::model::{DEFAULT_REDIRECT, Field, FieldErrors, SignInCredentialsRequest};

/// Minimum accepted password length, counted in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

const INVALID_EMAIL: &str = "Invalid email";
const PASSWORD_TOO_SHORT: &str = "String must contain at least 8 character(s)";
const INVALID_REDIRECT: &str = "Invalid url";

static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$").ok()
});

/// Credentials that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedCredentials {
    /// Email as submitted.
    pub email: String,
    /// Password as submitted.
    pub password: String,
    /// Redirect target, either `/` or an absolute URL.
    pub redirect_to: String,
}

/// Validate a credentials submission.
///
/// # Errors
///
/// Returns the collected field messages when any rule fails.
pub fn validate_credentials(
    request: &SignInCredentialsRequest,
) -> Result<ValidatedCredentials, FieldErrors> {
    let mut errors = FieldErrors::default();
    if !is_valid_email(&request.email) {
        errors.push(Field::Email, INVALID_EMAIL);
    }
    if request.password.chars().count() < MIN_PASSWORD_CHARS {
        errors.push(Field::Password, PASSWORD_TOO_SHORT);
    }
    if let Err(redirect_errors) = validate_redirect(&request.redirect_to) {
        errors.merge(redirect_errors);
    }

    if errors.is_empty() {
        Ok(ValidatedCredentials {
            email: request.email.clone(),
            password: request.password.clone(),
            redirect_to: request.redirect_to.clone(),
        })
    } else {
        Err(errors)
    }
}

/// Validate a redirect target.
///
/// # Errors
///
/// Returns a redirect field message unless the value is `/` or an absolute URL.
pub fn validate_redirect(value: &str) -> Result<&str, FieldErrors> {
    if value == DEFAULT_REDIRECT || Url::parse(value).is_ok() {
        return Ok(value);
    }
    let mut errors = FieldErrors::default();
    errors.push(Field::RedirectTo, INVALID_REDIRECT);
    Err(errors)
}

/// Whether a string looks like a deliverable email address.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    if value.starts_with('.') || value.contains("..") {
        return false;
    }
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str, redirect_to: &str) -> SignInCredentialsRequest {
        SignInCredentialsRequest {
            email: email.to_string(),
            password: password.to_string(),
            redirect_to: redirect_to.to_string(),
        }
    }

    #[test]
    fn email_pattern_compiles() {
        assert!(EMAIL_PATTERN.is_some());
    }

    #[test]
    fn accepts_well_formed_submission() {
        let validated = validate_credentials(&request("test@test.com", "password", "/"));
        assert_eq!(
            validated,
            Ok(ValidatedCredentials {
                email: "test@test.com".to_string(),
                password: "password".to_string(),
                redirect_to: "/".to_string(),
            })
        );
    }

    #[test]
    fn email_rules_reject_common_mistakes() {
        for bad in ["", "plain", "a@b", ".lead@x.io", "two..dots@x.io", "a@-x.io"] {
            assert!(!is_valid_email(bad), "{bad} should be rejected");
        }
        for good in ["Test@Example.COM", "first.last+tag@sub.domain.io"] {
            assert!(is_valid_email(good), "{good} should be accepted");
        }
    }

    #[test]
    fn collects_messages_for_every_failing_field() {
        let Err(errors) = validate_credentials(&request("nope", "short", "relative/path")) else {
            panic!("submission should fail validation");
        };
        assert_eq!(errors.for_field(Field::Email), ["Invalid email".to_string()]);
        assert_eq!(errors.password.len(), 1);
        assert_eq!(errors.redirect_to, ["Invalid url".to_string()]);
    }

    #[test]
    fn password_length_counts_characters() {
        assert!(validate_credentials(&request("a@b.io", "ééééééé", "/")).is_err());
        assert!(validate_credentials(&request("a@b.io", "éééééééé", "/")).is_ok());
    }

    #[test]
    fn redirect_accepts_root_or_absolute_url() {
        assert_eq!(validate_redirect("/"), Ok("/"));
        assert!(validate_redirect("https://conduit.example/insights").is_ok());
        assert!(validate_redirect("/insights").is_err());
        assert!(validate_redirect("").is_err());
    }
}
