//! Navigation links with a shared active indicator.

use crate::core::context::next_instance_id;
use crate::core::keys::Key;
use crate::core::navigation::ListNavigation;
use crate::core::registry::{ItemEntry, ItemRegistry};

/// One navigation link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavItem {
    /// Link target.
    pub href: String,
    /// Visible label.
    pub label: String,
}

impl NavItem {
    /// Link to `href` labelled `label`.
    #[must_use]
    pub fn new(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: label.into(),
        }
    }
}

/// Links in the main layout header.
#[must_use]
pub fn main_nav_items() -> Vec<NavItem> {
    vec![
        NavItem::new("/", "Overview"),
        NavItem::new("/insights", "Insights"),
        NavItem::new("/analytics", "Analytics"),
        NavItem::new("/audience", "Audience"),
        NavItem::new("/reports", "Reports"),
    ]
}

/// Link list tracking the current path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavModel {
    indicator_id: String,
    items: Vec<NavItem>,
    registry: ItemRegistry,
    current_path: String,
    navigation: ListNavigation,
}

impl NavModel {
    /// Create a model; `indicator_id` defaults to a generated id.
    #[must_use]
    pub fn new(items: Vec<NavItem>, current_path: impl Into<String>, indicator_id: Option<String>) -> Self {
        let registry = ItemRegistry::from_entries(
            items
                .iter()
                .map(|item| ItemEntry::new(item.href.clone(), item.label.clone()))
                .collect(),
        );
        Self {
            indicator_id: indicator_id.unwrap_or_else(|| next_instance_id("nav-indicator")),
            items,
            registry,
            current_path: current_path.into(),
            navigation: ListNavigation::horizontal(),
        }
    }

    /// Follow a route change.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.current_path = path.into();
    }

    /// Shared indicator id.
    #[must_use]
    pub fn indicator_id(&self) -> &str {
        &self.indicator_id
    }

    /// Links in order.
    #[must_use]
    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    /// Index of the link whose `href` equals the current path.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.registry.index_of(&self.current_path)
    }

    /// Whether the link at `index` is current.
    #[must_use]
    pub fn is_active(&self, index: usize) -> bool {
        self.active_index() == Some(index)
    }

    /// Link to focus after an arrow key pressed on link `focused`.
    #[must_use]
    pub fn focus_after(&self, focused: usize, key: Key) -> Option<usize> {
        let step = self.navigation.decode(key)?;
        self.navigation.apply(&self.registry, Some(focused), step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_item_matches_path_exactly() {
        let mut nav = NavModel::new(main_nav_items(), "/insights", Some("nav".to_string()));
        assert_eq!(nav.active_index(), Some(1));
        assert!(nav.is_active(1));
        nav.set_path("/insights/weekly");
        assert_eq!(nav.active_index(), None);
        nav.set_path("/");
        assert_eq!(nav.active_index(), Some(0));
        assert_eq!(nav.indicator_id(), "nav");
    }

    #[test]
    fn arrow_focus_clamps_at_ends() {
        let nav = NavModel::new(main_nav_items(), "/", None);
        assert_eq!(nav.focus_after(4, Key::ArrowRight), Some(4));
        assert_eq!(nav.focus_after(0, Key::ArrowLeft), Some(0));
        assert_eq!(nav.focus_after(1, Key::End), Some(4));
        assert!(nav.indicator_id().starts_with("nav-indicator-"));
    }
}
