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

//! Conduit action server wiring.
//!
//! Layout: `bootstrap.rs` (environment and boot sequence), `http.rs` (router
//! and handlers), `error.rs` (application errors).

/// Application bootstrap and environment loading.
pub mod bootstrap;
/// Application error types.
pub mod error;
/// HTTP router exposing the auth actions.
pub mod http;

pub use bootstrap::{AppConfig, run_app};
pub use error::{AppError, AppResult};
pub use http::{AppState, router};
