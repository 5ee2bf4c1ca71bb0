//! `LocalStorage` persistence for the theme and the session.

use conduit_auth::SessionGrant;
use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use serde::Serialize;

use crate::core::theme::PreferenceStore;

const KEY_PREFIX: &str = "conduit.";
pub(crate) const SESSION_KEY: &str = "conduit.session";

fn storage_key(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

/// Browser-backed preference store; keys are namespaced under `conduit.`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LocalPreferences;

impl PreferenceStore for LocalPreferences {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::get::<String>(storage_key(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        set_storage(&storage_key(key), value);
    }

    fn remove(&self, key: &str) {
        delete_storage(&storage_key(key));
    }
}

/// Stored session, dropped when it has already expired.
pub(crate) fn load_session() -> Option<SessionGrant> {
    let session = LocalStorage::get::<SessionGrant>(SESSION_KEY).ok()?;
    #[allow(clippy::cast_possible_truncation)]
    let now_ms = js_sys::Date::now() as i64;
    if session.expires_at.timestamp_millis() <= now_ms {
        delete_storage(SESSION_KEY);
        return None;
    }
    Some(session)
}

pub(crate) fn persist_session(session: &SessionGrant) {
    set_storage(SESSION_KEY, session);
}

pub(crate) fn clear_session() {
    delete_storage(SESSION_KEY);
}

fn set_storage<T: Serialize>(key: &str, value: T) {
    if let Err(err) = LocalStorage::set(key, value) {
        log_storage_error("set", key, &err.to_string());
    }
}

fn delete_storage(key: &str) {
    LocalStorage::delete(key);
}

fn log_storage_error(operation: &'static str, key: &str, detail: &str) {
    console::error!("storage operation failed", operation, key, detail);
}
