//! Ordered registry of list items inside a disclosure.
//!
//! # Design
//! - Order follows mount order; re-registering an id updates it in place.
//! - Only item mount and unmount write here.

/// One registered list item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemEntry {
    /// Stable item identifier.
    pub id: String,
    /// Text used for typeahead matching.
    pub label: String,
    /// Disabled items are skipped by navigation and cannot be selected.
    pub disabled: bool,
    /// Whether selecting the item closes the surface.
    pub close_on_select: bool,
}

impl ItemEntry {
    /// Enabled item that closes on select.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            disabled: false,
            close_on_select: true,
        }
    }

    /// Mark the item disabled.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Keep the surface open when this item is selected.
    #[must_use]
    pub const fn keep_open(mut self) -> Self {
        self.close_on_select = false;
        self
    }
}

/// Items in mount order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemRegistry {
    items: Vec<ItemEntry>,
}

impl ItemRegistry {
    /// Build a registry from entries in order.
    #[must_use]
    pub const fn from_entries(items: Vec<ItemEntry>) -> Self {
        Self { items }
    }

    /// Register an item on mount, returning its index.
    pub fn register(&mut self, entry: ItemEntry) -> usize {
        if let Some(index) = self.index_of(&entry.id) {
            self.items[index] = entry;
            return index;
        }
        self.items.push(entry);
        self.items.len() - 1
    }

    /// Remove an item on unmount. Returns whether it was present.
    pub fn deregister(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        before != self.items.len()
    }

    /// Index of the item with `id`.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Item at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ItemEntry> {
        self.items.get(index)
    }

    /// Number of registered items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the item at `index` exists and is enabled.
    #[must_use]
    pub fn is_enabled(&self, index: usize) -> bool {
        self.items.get(index).is_some_and(|item| !item.disabled)
    }

    /// First enabled index.
    #[must_use]
    pub fn first_enabled(&self) -> Option<usize> {
        self.items.iter().position(|item| !item.disabled)
    }

    /// Last enabled index.
    #[must_use]
    pub fn last_enabled(&self) -> Option<usize> {
        self.items.iter().rposition(|item| !item.disabled)
    }

    /// Items in order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemEntry> {
        self.items.iter()
    }

    /// Drop every entry, as when the surface unmounts.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_follows_mount_order() {
        let mut registry = ItemRegistry::default();
        assert_eq!(registry.register(ItemEntry::new("a", "Apple")), 0);
        assert_eq!(registry.register(ItemEntry::new("b", "Banana")), 1);
        assert_eq!(registry.register(ItemEntry::new("a", "Apricot")), 0);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(0).map(|item| item.label.as_str()), Some("Apricot"));
    }

    #[test]
    fn deregistration_shifts_later_items() {
        let mut registry = ItemRegistry::from_entries(vec![
            ItemEntry::new("a", "Apple"),
            ItemEntry::new("b", "Banana"),
            ItemEntry::new("c", "Cherry"),
        ]);
        assert!(registry.deregister("b"));
        assert!(!registry.deregister("b"));
        assert_eq!(registry.index_of("c"), Some(1));
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn enabled_bounds_skip_disabled_items() {
        let registry = ItemRegistry::from_entries(vec![
            ItemEntry::new("a", "Apple").disabled(true),
            ItemEntry::new("b", "Banana"),
            ItemEntry::new("c", "Cherry").disabled(true),
        ]);
        assert_eq!(registry.first_enabled(), Some(1));
        assert_eq!(registry.last_enabled(), Some(1));
        assert!(!registry.is_enabled(0));
        assert!(!registry.is_enabled(9));
    }
}
