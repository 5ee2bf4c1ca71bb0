//! Keyboard input normalised from DOM `KeyboardEvent.key` values.

/// Keys the disclosure behaviours react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// `ArrowDown`.
    ArrowDown,
    /// `ArrowUp`.
    ArrowUp,
    /// `ArrowLeft`.
    ArrowLeft,
    /// `ArrowRight`.
    ArrowRight,
    /// `Home`.
    Home,
    /// `End`.
    End,
    /// `Enter`.
    Enter,
    /// The space bar.
    Space,
    /// `Escape`.
    Escape,
    /// `Tab`.
    Tab,
    /// Any other single printable character.
    Char(char),
    /// Keys with no behaviour attached.
    Other,
}

impl Key {
    /// Map a DOM `key` string.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) if !ch.is_control() => Self::Char(ch),
                    _ => Self::Other,
                }
            }
        }
    }
}

/// A key press with the modifiers the behaviours care about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    /// Normalised key.
    pub key: Key,
    /// Shift held.
    pub shift: bool,
    /// Ctrl, Meta, or Alt held. Such presses never feed typeahead.
    pub modified: bool,
}

impl KeyPress {
    /// Unmodified press.
    #[must_use]
    pub const fn plain(key: Key) -> Self {
        Self {
            key,
            shift: false,
            modified: false,
        }
    }

    /// Press with Shift held.
    #[must_use]
    pub const fn shifted(key: Key) -> Self {
        Self {
            key,
            shift: true,
            modified: false,
        }
    }
}
