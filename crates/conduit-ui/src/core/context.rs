//! Provider lookup failures and per-instance identifiers.
//!
//! # Design
//! - A missing provider is a configuration error; there is no silent default.
//! - Instance ids come from a process-wide counter so sibling providers never
//!   share ids.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

/// Configuration errors raised while wiring compound components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// A sub-component rendered outside its wrapper.
    #[error("{component} components must be wrapped in the {wrapper} component")]
    MissingProvider {
        /// Compound component family.
        component: &'static str,
        /// Wrapper that must be an ancestor.
        wrapper: &'static str,
    },
}

/// Turn an optional context into a configuration result.
///
/// # Errors
///
/// Returns [`ContextError::MissingProvider`] when `context` is `None`.
pub fn require_context<T>(
    context: Option<T>,
    component: &'static str,
    wrapper: &'static str,
) -> Result<T, ContextError> {
    context.ok_or(ContextError::MissingProvider { component, wrapper })
}

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Allocate a unique DOM id with the given prefix.
#[must_use]
pub fn next_instance_id(prefix: &str) -> String {
    let id = NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_provider_names_the_wrapper() {
        let result = require_context::<u8>(None, "Dropdown", "Wrapper");
        let Err(err) = result else {
            panic!("missing context must fail");
        };
        assert_eq!(
            err.to_string(),
            "Dropdown components must be wrapped in the Wrapper component"
        );
        assert_eq!(require_context(Some(3), "Modal", "Wrapper"), Ok(3));
    }

    #[test]
    fn instance_ids_are_unique() {
        let first = next_instance_id("dropdown");
        let second = next_instance_id("dropdown");
        assert_ne!(first, second);
        assert!(first.starts_with("dropdown-"));
    }
}
