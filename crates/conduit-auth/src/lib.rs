#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]

//! Authentication action boundary for Conduit.
//!
//! `model`, `validate`, and `error` are shared with the wasm front end so the
//! same field rules run on both sides. Providers, sessions, and the sign-in
//! service are native-only.

pub mod error;
pub mod model;
pub mod validate;

#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod provider;
#[cfg(not(target_arch = "wasm32"))]
pub mod service;
#[cfg(not(target_arch = "wasm32"))]
pub mod session;

pub use error::{AuthError, AuthResult, CredentialsReason};
pub use model::{
    ActionResponse, Field, FieldErrors, FormPayload, SessionGrant, SignInCredentialsRequest,
    SignInFormState, SignInGoogleRequest, SignOutRequest,
};
pub use validate::{ValidatedCredentials, validate_credentials, validate_redirect};

#[cfg(not(target_arch = "wasm32"))]
pub use config::{AuthConfig, GoogleConfig, UserRecord};
#[cfg(not(target_arch = "wasm32"))]
pub use provider::{CredentialsAuthority, GoogleOAuth, Identity, OAuthProvider, StaticCredentials};
#[cfg(not(target_arch = "wasm32"))]
pub use service::AuthService;
#[cfg(not(target_arch = "wasm32"))]
pub use session::SessionRegistry;
