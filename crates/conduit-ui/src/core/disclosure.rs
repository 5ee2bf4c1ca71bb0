//! Open state and transition phases shared by dropdowns and modals.
//!
//! # Design
//! - `open` is what the caller asked for; [`Phase`] is what is on screen.
//! - Phase changes are driven by two signals: the requested open state and the
//!   transition adapter reporting completion.
//! - Interrupting a transition reverses it instead of queueing.

/// Resolved open flag and highlighted item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisclosureState {
    /// Whether the surface is requested open.
    pub open: bool,
    /// Highlighted item index, if any.
    pub active_index: Option<usize>,
}

impl DisclosureState {
    /// Closed state with nothing highlighted.
    #[must_use]
    pub const fn closed() -> Self {
        Self {
            open: false,
            active_index: None,
        }
    }
}

/// Mount phase of a transitioning surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Not mounted.
    #[default]
    Closed,
    /// Mounted and running the entrance transition.
    Opening,
    /// Mounted and settled.
    Open,
    /// Mounted and running the exit transition.
    Closing,
}

impl Phase {
    /// Next phase after the requested open state changes.
    #[must_use]
    pub const fn request(self, open: bool) -> Self {
        match (self, open) {
            (Self::Closed | Self::Closing, true) => Self::Opening,
            (Self::Opening | Self::Open, false) => Self::Closing,
            (phase, _) => phase,
        }
    }

    /// Next phase after the running transition completes.
    #[must_use]
    pub const fn transition_end(self) -> Self {
        match self {
            Self::Opening => Self::Open,
            Self::Closing => Self::Closed,
            phase => phase,
        }
    }

    /// Next phase after the transition adapter reports mount status.
    ///
    /// An unmount report while closing finalises the exit.
    #[must_use]
    pub const fn mounted(self, is_mounted: bool) -> Self {
        match (self, is_mounted) {
            (Self::Closing, false) => Self::Closed,
            (phase, _) => phase,
        }
    }

    /// Whether the surface should be in the DOM.
    #[must_use]
    pub const fn is_mounted(self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Whether a transition is in flight.
    #[must_use]
    pub const fn is_transitioning(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }

    /// Inline style applied to the surface for this phase.
    #[must_use]
    pub const fn styles(self) -> &'static str {
        match self {
            Self::Closed | Self::Closing => {
                "opacity: 0; transform: scale(0.96); transition: opacity 150ms, transform 150ms;"
            }
            Self::Opening | Self::Open => {
                "opacity: 1; transform: scale(1); transition: opacity 150ms, transform 150ms;"
            }
        }
    }

    /// Delay after which an exit that never reported completion is forced to
    /// finish. Only the closing phase has one.
    #[must_use]
    pub const fn exit_fallback_ms(self) -> Option<u32> {
        match self {
            Self::Closing => Some(EXIT_FALLBACK_MS),
            _ => None,
        }
    }

    /// Value for `data-state` attributes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Opening => "opening",
            Self::Open => "open",
            Self::Closing => "closing",
        }
    }
}

/// Duration of the entrance and exit transitions in milliseconds.
pub const TRANSITION_MS: u32 = 150;

/// Exit deadline for surfaces whose `transitionend` never fires, as under
/// reduced motion or a cancelled transition.
pub const EXIT_FALLBACK_MS: u32 = TRANSITION_MS + 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle_follows_transition_signals() {
        let phase = Phase::Closed.request(true);
        assert_eq!(phase, Phase::Opening);
        let phase = phase.transition_end();
        assert_eq!(phase, Phase::Open);
        let phase = phase.request(false);
        assert_eq!(phase, Phase::Closing);
        assert!(phase.is_mounted());
        assert_eq!(phase.mounted(false), Phase::Closed);
        assert_eq!(phase.transition_end(), Phase::Closed);
    }

    #[test]
    fn interruptions_reverse_the_running_transition() {
        assert_eq!(Phase::Opening.request(false), Phase::Closing);
        assert_eq!(Phase::Closing.request(true), Phase::Opening);
        assert_eq!(Phase::Open.request(true), Phase::Open);
        assert_eq!(Phase::Closed.request(false), Phase::Closed);
    }

    #[test]
    fn only_closing_arms_the_exit_fallback() {
        assert_eq!(Phase::Closing.exit_fallback_ms(), Some(EXIT_FALLBACK_MS));
        assert!(EXIT_FALLBACK_MS > TRANSITION_MS);
        for phase in [Phase::Closed, Phase::Opening, Phase::Open] {
            assert_eq!(phase.exit_fallback_ms(), None);
        }
        let closing = Phase::Open.request(false);
        assert_eq!(
            closing.exit_fallback_ms().map(|_| closing.mounted(false)),
            Some(Phase::Closed)
        );
    }

    #[test]
    fn stray_signals_do_not_move_settled_phases() {
        assert_eq!(Phase::Open.transition_end(), Phase::Open);
        assert_eq!(Phase::Opening.mounted(false), Phase::Opening);
        assert!(!Phase::Closed.is_mounted());
        assert!(Phase::Closing.is_transitioning());
        assert_eq!(DisclosureState::closed(), DisclosureState::default());
    }
}
