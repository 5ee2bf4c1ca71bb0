//! Light/dark theme preference.
//!
//! # Design
//! - A stored preference overrides the system scheme; no stored value means
//!   "follow system".
//! - Choosing the theme the system already reports clears the stored value so
//!   later system changes are followed again.
//! - Storage sits behind [`PreferenceStore`]; the browser adapter lives in the
//!   app layer.

use std::cell::RefCell;
use std::collections::HashMap;

/// Storage key for the theme preference.
pub const THEME_PREFERENCE_KEY: &str = "theme";

/// Theme mode applied to the document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
    /// Light theme mode.
    #[default]
    Light,
    /// Dark theme mode.
    Dark,
}

impl ThemeMode {
    /// String identifier used in CSS datasets.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a stored value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// String preference persistence.
pub trait PreferenceStore {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;
    /// Write a value.
    fn set(&self, key: &str, value: &str);
    /// Delete a value.
    fn remove(&self, key: &str);
}

/// In-memory store for native use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.borrow_mut().remove(key);
    }
}

/// Resolved theme plus where it came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThemeState {
    persisted: Option<ThemeMode>,
    system: ThemeMode,
}

impl ThemeState {
    /// Load the stored preference against the current system scheme.
    ///
    /// Unknown stored values are treated as absent.
    #[must_use]
    pub fn resolve(store: &dyn PreferenceStore, system: ThemeMode) -> Self {
        let persisted = store
            .get(THEME_PREFERENCE_KEY)
            .as_deref()
            .and_then(ThemeMode::parse);
        Self { persisted, system }
    }

    /// Theme to apply.
    #[must_use]
    pub fn theme(&self) -> ThemeMode {
        self.persisted.unwrap_or(self.system)
    }

    /// Whether the theme currently follows the system scheme.
    #[must_use]
    pub const fn follows_system(&self) -> bool {
        self.persisted.is_none()
    }

    /// Apply a user choice, persisting it only when it differs from the system.
    pub fn select(&mut self, store: &dyn PreferenceStore, choice: ThemeMode) {
        if choice == self.system {
            store.remove(THEME_PREFERENCE_KEY);
            self.persisted = None;
        } else {
            store.set(THEME_PREFERENCE_KEY, choice.as_str());
            self.persisted = Some(choice);
        }
    }

    /// Record a system scheme change. Only visible when following the system.
    pub const fn system_changed(&mut self, system: ThemeMode) {
        self.system = system;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_preference_follows_system() {
        let store = MemoryStore::default();
        let mut state = ThemeState::resolve(&store, ThemeMode::Dark);
        assert_eq!(state.theme(), ThemeMode::Dark);
        assert!(state.follows_system());
        state.system_changed(ThemeMode::Light);
        assert_eq!(state.theme(), ThemeMode::Light);
    }

    #[test]
    fn choosing_non_system_theme_persists() {
        let store = MemoryStore::default();
        let mut state = ThemeState::resolve(&store, ThemeMode::Light);
        state.select(&store, ThemeMode::Dark);
        assert_eq!(store.get(THEME_PREFERENCE_KEY).as_deref(), Some("dark"));
        state.system_changed(ThemeMode::Dark);
        state.system_changed(ThemeMode::Light);
        assert_eq!(state.theme(), ThemeMode::Dark);

        let reloaded = ThemeState::resolve(&store, ThemeMode::Light);
        assert_eq!(reloaded.theme(), ThemeMode::Dark);
    }

    #[test]
    fn choosing_system_theme_clears_preference() {
        let store = MemoryStore::default();
        store.set(THEME_PREFERENCE_KEY, "dark");
        let mut state = ThemeState::resolve(&store, ThemeMode::Light);
        assert_eq!(state.theme(), ThemeMode::Dark);
        state.select(&store, ThemeMode::Light);
        assert_eq!(store.get(THEME_PREFERENCE_KEY), None);
        assert!(state.follows_system());
        state.system_changed(ThemeMode::Dark);
        assert_eq!(state.theme(), ThemeMode::Dark);
    }

    #[test]
    fn unknown_stored_values_are_ignored() {
        let store = MemoryStore::default();
        store.set(THEME_PREFERENCE_KEY, "sepia");
        let state = ThemeState::resolve(&store, ThemeMode::Light);
        assert!(state.follows_system());
        assert_eq!(ThemeMode::Dark.toggled().as_str(), "light");
    }
}
