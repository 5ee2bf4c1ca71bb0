//! Typeahead matching over item labels.
//!
//! # Design
//! - Time is passed in as milliseconds so matching stays pure; the view layer
//!   owns the idle timer.
//! - A buffer that stops matching restarts from the latest key.
//! - A single repeated letter cycles through the items starting with it.

use crate::core::registry::ItemRegistry;

/// Idle time after which the buffer resets.
pub const TYPEAHEAD_RESET_MS: u64 = 500;

/// Accumulated typeahead input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Typeahead {
    buffer: String,
    last_input_ms: Option<u64>,
}

impl Typeahead {
    /// Feed one character typed at `now_ms`, returning the matched index.
    pub fn input(
        &mut self,
        ch: char,
        now_ms: u64,
        registry: &ItemRegistry,
        active: Option<usize>,
    ) -> Option<usize> {
        if !self.is_typing(now_ms) {
            self.buffer.clear();
        }
        self.last_input_ms = Some(now_ms);
        self.buffer.extend(ch.to_lowercase());

        if let Some(found) = self.search(registry, active) {
            return Some(found);
        }
        if self.buffer.chars().count() > 1 {
            self.buffer.clear();
            self.buffer.extend(ch.to_lowercase());
            return self.search(registry, active);
        }
        None
    }

    /// Whether a word is being typed at `now_ms`. Space then extends the word.
    #[must_use]
    pub fn is_typing(&self, now_ms: u64) -> bool {
        !self.buffer.is_empty()
            && self
                .last_input_ms
                .is_some_and(|last| now_ms.saturating_sub(last) < TYPEAHEAD_RESET_MS)
    }

    /// Current buffer.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Forget the buffer, as when the idle timer fires or the surface closes.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.last_input_ms = None;
    }

    fn search(&self, registry: &ItemRegistry, active: Option<usize>) -> Option<usize> {
        let len = registry.len();
        if len == 0 {
            return None;
        }
        let needle = self.needle();
        let cycling = needle.chars().count() == 1;
        let start = match active {
            Some(index) if cycling => index + 1,
            Some(index) => index,
            None => 0,
        };
        (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&index| {
                registry.get(index).is_some_and(|item| {
                    !item.disabled && item.label.to_lowercase().starts_with(needle)
                })
            })
    }

    /// Search text: a run of one repeated letter collapses to that letter.
    fn needle(&self) -> &str {
        let mut chars = self.buffer.char_indices();
        match chars.next() {
            Some((_, first)) if self.buffer.chars().all(|ch| ch == first) => {
                &self.buffer[..first.len_utf8()]
            }
            _ => &self.buffer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::ItemEntry;

    fn fruits() -> ItemRegistry {
        ItemRegistry::from_entries(vec![
            ItemEntry::new("apple", "Apple"),
            ItemEntry::new("banana", "Banana"),
            ItemEntry::new("cherry", "Cherry"),
        ])
    }

    #[test]
    fn idle_reset_restarts_matching() {
        let registry = fruits();
        let mut typeahead = Typeahead::default();
        let active = typeahead.input('b', 0, &registry, None);
        assert_eq!(active, Some(1));
        let active = typeahead.input('c', 100, &registry, active);
        assert_eq!(active, Some(2));
        let active = typeahead.input('a', 700, &registry, active);
        assert_eq!(active, Some(0));
    }

    #[test]
    fn multi_character_prefix_matches_case_insensitively() {
        let registry = ItemRegistry::from_entries(vec![
            ItemEntry::new("ins", "Insights"),
            ItemEntry::new("inv", "Invoices"),
        ]);
        let mut typeahead = Typeahead::default();
        assert_eq!(typeahead.input('I', 0, &registry, None), Some(0));
        assert_eq!(typeahead.input('n', 50, &registry, Some(0)), Some(0));
        assert_eq!(typeahead.input('v', 90, &registry, Some(0)), Some(1));
        assert_eq!(typeahead.buffer(), "inv");
    }

    #[test]
    fn repeated_letter_cycles_matches() {
        let registry = ItemRegistry::from_entries(vec![
            ItemEntry::new("a1", "Audience"),
            ItemEntry::new("a2", "Analytics"),
            ItemEntry::new("o", "Overview"),
        ]);
        let mut typeahead = Typeahead::default();
        let first = typeahead.input('a', 0, &registry, None);
        assert_eq!(first, Some(0));
        let second = typeahead.input('a', 100, &registry, first);
        assert_eq!(second, Some(1));
        let third = typeahead.input('a', 200, &registry, second);
        assert_eq!(third, Some(0));
    }

    #[test]
    fn disabled_items_and_misses_are_skipped() {
        let registry = ItemRegistry::from_entries(vec![
            ItemEntry::new("b1", "Billing").disabled(true),
            ItemEntry::new("b2", "Bookmarks"),
        ]);
        let mut typeahead = Typeahead::default();
        assert_eq!(typeahead.input('b', 0, &registry, None), Some(1));
        assert_eq!(typeahead.input('z', 600, &registry, Some(1)), None);
        assert!(typeahead.is_typing(700));
        assert!(!typeahead.is_typing(1_200));
        typeahead.reset();
        assert_eq!(typeahead.buffer(), "");
    }
}
