//! Arrow-key movement over a registry of items.
//!
//! # Design
//! - Clamp at the ends unless `wrap` is set; every variant shares this policy.
//! - Disabled items are never landed on.

use crate::core::keys::Key;
use crate::core::registry::ItemRegistry;

/// Axis the arrow keys move along.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Up/Down arrows move.
    #[default]
    Vertical,
    /// Left/Right arrows move.
    Horizontal,
}

/// A navigation intent decoded from a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    /// Toward the end of the list.
    Next,
    /// Toward the start of the list.
    Previous,
    /// First enabled item.
    First,
    /// Last enabled item.
    Last,
}

impl Move {
    /// Decode a key for the given orientation.
    #[must_use]
    pub const fn from_key(key: Key, orientation: Orientation) -> Option<Self> {
        match (key, orientation) {
            (Key::ArrowDown, Orientation::Vertical) | (Key::ArrowRight, Orientation::Horizontal) => {
                Some(Self::Next)
            }
            (Key::ArrowUp, Orientation::Vertical) | (Key::ArrowLeft, Orientation::Horizontal) => {
                Some(Self::Previous)
            }
            (Key::Home, _) => Some(Self::First),
            (Key::End, _) => Some(Self::Last),
            _ => None,
        }
    }
}

/// List navigation options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListNavigation {
    /// Wrap from the last item to the first and back.
    pub wrap: bool,
    /// Arrow axis.
    pub orientation: Orientation,
}

impl ListNavigation {
    /// Vertical, clamping navigation.
    #[must_use]
    pub const fn vertical() -> Self {
        Self {
            wrap: false,
            orientation: Orientation::Vertical,
        }
    }

    /// Horizontal, clamping navigation.
    #[must_use]
    pub const fn horizontal() -> Self {
        Self {
            wrap: false,
            orientation: Orientation::Horizontal,
        }
    }

    /// Decode a key using this navigation's orientation.
    #[must_use]
    pub const fn decode(&self, key: Key) -> Option<Move> {
        Move::from_key(key, self.orientation)
    }

    /// Resolve the index reached from `current` by `step`.
    ///
    /// Returns `current` unchanged at a clamped end, and `None` only when no
    /// item is enabled.
    #[must_use]
    pub fn apply(&self, registry: &ItemRegistry, current: Option<usize>, step: Move) -> Option<usize> {
        match step {
            Move::First => registry.first_enabled(),
            Move::Last => registry.last_enabled(),
            Move::Next => match current {
                None => registry.first_enabled(),
                Some(index) => scan_forward(registry, index)
                    .or_else(|| self.wrap.then(|| registry.first_enabled()).flatten())
                    .or_else(|| clamp_to(registry, index)),
            },
            Move::Previous => match current {
                None => registry.last_enabled(),
                Some(index) => scan_backward(registry, index)
                    .or_else(|| self.wrap.then(|| registry.last_enabled()).flatten())
                    .or_else(|| clamp_to(registry, index)),
            },
        }
    }
}

fn scan_forward(registry: &ItemRegistry, from: usize) -> Option<usize> {
    (from + 1..registry.len()).find(|&index| registry.is_enabled(index))
}

fn scan_backward(registry: &ItemRegistry, from: usize) -> Option<usize> {
    (0..from.min(registry.len()))
        .rev()
        .find(|&index| registry.is_enabled(index))
}

fn clamp_to(registry: &ItemRegistry, index: usize) -> Option<usize> {
    if registry.is_enabled(index) {
        Some(index)
    } else {
        registry.first_enabled()
    }
}
