//! Segmented toggle group.
//!
//! # Design
//! - `value` resolves through [`Controllable`] like every other variant.
//! - The indicator id is fixed per group so the sliding highlight animates
//!   between options instead of remounting.

use crate::core::context::next_instance_id;
use crate::core::control::Controllable;
use crate::core::keys::Key;
use crate::core::navigation::ListNavigation;
use crate::core::registry::{ItemEntry, ItemRegistry};

/// One option in the group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleOption {
    /// Value reported on selection.
    pub value: String,
    /// Visible label.
    pub label: String,
    /// Disabled options cannot be selected.
    pub disabled: bool,
}

impl ToggleOption {
    /// Enabled option.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    /// Mark the option disabled.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Mutually exclusive options with one selected value.
#[derive(Debug)]
pub struct ToggleGroup {
    indicator_id: String,
    options: Vec<ToggleOption>,
    registry: ItemRegistry,
    value: Controllable<Option<String>>,
    navigation: ListNavigation,
}

impl ToggleGroup {
    /// Create a group; `indicator_id` defaults to a generated id.
    #[must_use]
    pub fn new(
        options: Vec<ToggleOption>,
        value: Controllable<Option<String>>,
        indicator_id: Option<String>,
    ) -> Self {
        let registry = ItemRegistry::from_entries(
            options
                .iter()
                .map(|option| {
                    ItemEntry::new(option.value.clone(), option.label.clone())
                        .disabled(option.disabled)
                })
                .collect(),
        );
        Self {
            indicator_id: indicator_id.unwrap_or_else(|| next_instance_id("toggle-indicator")),
            options,
            registry,
            value,
            navigation: ListNavigation::horizontal(),
        }
    }

    /// Adopt the value resolution of a new render.
    pub fn sync(&mut self, value: Controllable<Option<String>>) {
        self.value = value;
    }

    /// Shared indicator id.
    #[must_use]
    pub fn indicator_id(&self) -> &str {
        &self.indicator_id
    }

    /// Options in order.
    #[must_use]
    pub fn options(&self) -> &[ToggleOption] {
        &self.options
    }

    /// Selected value.
    #[must_use]
    pub fn value(&self) -> Option<String> {
        self.value.value()
    }

    /// Position of the selected option, which the indicator tracks.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.value()
            .and_then(|value| self.registry.index_of(&value))
    }

    /// Whether `value` is the selected one.
    #[must_use]
    pub fn is_selected(&self, value: &str) -> bool {
        self.value().as_deref() == Some(value)
    }

    /// Select an option by value. Returns whether the request was issued.
    pub fn select(&self, value: &str) -> bool {
        let Some(index) = self.registry.index_of(value) else {
            return false;
        };
        if !self.registry.is_enabled(index) {
            return false;
        }
        self.value.set(Some(value.to_string()));
        true
    }

    /// Move selection with arrow keys, clamping at the ends.
    pub fn key(&self, key: Key) -> Option<usize> {
        let step = self.navigation.decode(key)?;
        let current = self.selected_index();
        let target = self.navigation.apply(&self.registry, current, step)?;
        let value = self.registry.get(target)?.id.clone();
        self.value.set(Some(value));
        Some(target)
    }
}
