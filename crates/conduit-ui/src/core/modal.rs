//! Modal dialog model.
//!
//! # Design
//! - Shares the disclosure phases and dismiss behaviour with the dropdown but
//!   has no list navigation or typeahead.
//! - Focus is trapped by index over the surface's focusable elements; the view
//!   layer collects them and performs the move.
//! - Every open-to-closed edge returns focus to the trigger, including an
//!   owner closing a controlled dialog.
//! - Page scroll stays locked for as long as the surface is mounted, exit
//!   transition included.

use crate::core::context::next_instance_id;
use crate::core::control::{ControlMode, Controllable, ModeSwitch, ModeTracker};
use crate::core::disclosure::{DisclosureState, Phase};
use crate::core::interactions::{
    FocusTarget, InteractionConfig, InteractionEvent, Interactions, TriggerAttrs, Role,
    trigger_attrs,
};
use crate::core::keys::{Key, KeyPress};
use crate::core::registry::ItemRegistry;

/// Where focus goes after a Tab press inside the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrapMove {
    /// Let the browser move focus.
    Native,
    /// Move focus to the focusable element at the index and prevent default.
    Wrap(usize),
}

/// Compute the trapped focus move for a Tab press.
///
/// `current` is the index of the focused element among `focusable`, or `None`
/// when focus is on the surface itself.
#[must_use]
pub const fn trap_focus(press: KeyPress, focusable: usize, current: Option<usize>) -> Option<TrapMove> {
    if !matches!(press.key, Key::Tab) {
        return None;
    }
    if focusable == 0 {
        return Some(TrapMove::Wrap(0));
    }
    let last = focusable - 1;
    let next = match (current, press.shift) {
        (None, false) => TrapMove::Wrap(0),
        (None, true) => TrapMove::Wrap(last),
        (Some(index), false) if index >= last => TrapMove::Wrap(0),
        (Some(0), true) => TrapMove::Wrap(last),
        _ => TrapMove::Native,
    };
    Some(next)
}

/// ARIA attributes for the dialog surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogAttrs {
    /// Element id.
    pub id: String,
    /// `role`.
    pub role: &'static str,
    /// `aria-modal`.
    pub modal: bool,
    /// `aria-labelledby`, set once a title registered.
    pub labelled_by: Option<String>,
    /// `aria-describedby`, set once a description registered.
    pub described_by: Option<String>,
}

/// What the view must do after an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModalOutcome {
    /// Focus move to perform.
    pub focus: Option<FocusTarget>,
    /// Whether to call `preventDefault`.
    pub prevent_default: bool,
}

/// State for one modal instance.
#[derive(Debug)]
pub struct ModalModel {
    id: String,
    open: Controllable<bool>,
    phase: Phase,
    interactions: Interactions,
    modes: ModeTracker,
    restore_focus: bool,
    title_id: Option<String>,
    description_id: Option<String>,
}

impl ModalModel {
    /// Create a model with a generated surface id.
    #[must_use]
    pub fn new(open: Controllable<bool>) -> Self {
        Self::with_id(next_instance_id("modal"), open)
    }

    /// Create a model with an explicit surface id.
    #[must_use]
    pub fn with_id(id: impl Into<String>, open: Controllable<bool>) -> Self {
        let uncontrolled = open.mode() == ControlMode::Uncontrolled;
        let mut modes = ModeTracker::default();
        modes.observe(open.mode());
        let phase = Phase::Closed.request(open.value());
        Self {
            id: id.into(),
            open,
            phase,
            interactions: Interactions::new(InteractionConfig::dialog(uncontrolled)),
            modes,
            restore_focus: false,
            title_id: None,
            description_id: None,
        }
    }

    /// Adopt the `open` resolution of a new render.
    ///
    /// A close arriving this way owes the trigger its focus back; collect it
    /// with [`ModalModel::take_restore_focus`].
    pub fn sync(&mut self, open: Controllable<bool>) -> Option<ModeSwitch> {
        let switch = self.modes.observe(open.mode());
        self.interactions
            .set_click(open.mode() == ControlMode::Uncontrolled);
        let was_open = self.open.value();
        self.open = open;
        if was_open && !self.open.value() {
            self.restore_focus = true;
        }
        self.phase = self.phase.request(self.open.value());
        switch
    }

    /// Focus move owed by a close observed in [`ModalModel::sync`]. Returns it
    /// once.
    pub fn take_restore_focus(&mut self) -> Option<FocusTarget> {
        std::mem::take(&mut self.restore_focus).then_some(FocusTarget::Trigger)
    }

    /// Surface element id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the dialog is requested open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.value()
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether page scroll must be locked.
    #[must_use]
    pub const fn locks_scroll(&self) -> bool {
        self.phase.is_mounted()
    }

    /// Register the title element, returning the id it should render with.
    pub fn register_title(&mut self) -> String {
        let id = format!("{}-title", self.id);
        self.title_id = Some(id.clone());
        id
    }

    /// Register the description element, returning its id.
    pub fn register_description(&mut self) -> String {
        let id = format!("{}-description", self.id);
        self.description_id = Some(id.clone());
        id
    }

    /// Forget the title on unmount.
    pub fn deregister_title(&mut self) {
        self.title_id = None;
    }

    /// Forget the description on unmount.
    pub fn deregister_description(&mut self) {
        self.description_id = None;
    }

    /// Open or close through the resolver, as the close affordance does.
    pub fn set_open(&mut self, open: bool) -> ModalOutcome {
        self.open.set(open);
        self.phase = self.phase.request(self.open.value());
        ModalOutcome {
            focus: (!open).then_some(FocusTarget::Trigger),
            prevent_default: false,
        }
    }

    /// Feed one interaction event.
    pub fn handle(&mut self, event: InteractionEvent) -> ModalOutcome {
        let state = DisclosureState {
            open: self.is_open(),
            active_index: None,
        };
        let effects = self
            .interactions
            .handle(state, &ItemRegistry::default(), event, 0);
        if let Some(open) = effects.open {
            self.open.set(open);
            self.phase = self.phase.request(self.open.value());
        }
        ModalOutcome {
            focus: effects.focus,
            prevent_default: effects.prevent_default,
        }
    }

    /// The transition adapter finished the running transition.
    pub fn transition_end(&mut self) {
        self.phase = self.phase.transition_end();
    }

    /// The transition adapter reported mount status.
    pub fn set_mounted(&mut self, is_mounted: bool) {
        self.phase = self.phase.mounted(is_mounted);
    }

    /// Trigger attributes.
    #[must_use]
    pub fn trigger_attrs(&self) -> TriggerAttrs {
        trigger_attrs(Role::Dialog, &self.id, self.is_open())
    }

    /// Surface attributes.
    #[must_use]
    pub fn dialog_attrs(&self) -> DialogAttrs {
        DialogAttrs {
            id: self.id.clone(),
            role: Role::Dialog.as_str(),
            modal: true,
            labelled_by: self.title_id.clone(),
            described_by: self.description_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_closes_and_restores_focus_to_trigger() {
        let mut modal = ModalModel::with_id("dialog", Controllable::uncontrolled(false));
        modal.handle(InteractionEvent::TriggerClick);
        assert!(modal.is_open());
        modal.transition_end();
        assert_eq!(modal.phase(), Phase::Open);

        let outcome = modal.handle(InteractionEvent::SurfaceKey(KeyPress::plain(Key::Escape)));
        assert!(!modal.is_open());
        assert_eq!(outcome.focus, Some(FocusTarget::Trigger));
        assert!(outcome.prevent_default);
        assert_eq!(modal.phase(), Phase::Closing);
        assert!(modal.locks_scroll());
        modal.set_mounted(false);
        assert!(!modal.locks_scroll());
    }

    #[test]
    fn tab_cycles_within_surface() {
        let tab = KeyPress::plain(Key::Tab);
        let back = KeyPress::shifted(Key::Tab);
        assert_eq!(trap_focus(tab, 3, Some(2)), Some(TrapMove::Wrap(0)));
        assert_eq!(trap_focus(back, 3, Some(0)), Some(TrapMove::Wrap(2)));
        assert_eq!(trap_focus(tab, 3, Some(1)), Some(TrapMove::Native));
        assert_eq!(trap_focus(back, 3, None), Some(TrapMove::Wrap(2)));
        assert_eq!(trap_focus(tab, 0, None), Some(TrapMove::Wrap(0)));
        assert_eq!(trap_focus(KeyPress::plain(Key::Enter), 3, Some(1)), None);
    }

    #[test]
    fn close_affordance_returns_focus() {
        let mut modal = ModalModel::with_id("dialog", Controllable::uncontrolled(true));
        assert_eq!(modal.phase(), Phase::Opening);
        let outcome = modal.set_open(false);
        assert_eq!(outcome.focus, Some(FocusTarget::Trigger));
        assert_eq!(modal.phase(), Phase::Closing);
    }

    #[test]
    fn owner_closing_a_controlled_dialog_restores_focus() {
        let mut modal = ModalModel::with_id("dialog", Controllable::controlled(true, None));
        modal.transition_end();
        assert_eq!(modal.take_restore_focus(), None);
        assert_eq!(modal.sync(Controllable::controlled(true, None)), None);
        assert_eq!(modal.take_restore_focus(), None);

        modal.sync(Controllable::controlled(false, None));
        assert_eq!(modal.phase(), Phase::Closing);
        assert_eq!(modal.take_restore_focus(), Some(FocusTarget::Trigger));
        assert_eq!(modal.take_restore_focus(), None);
        modal.sync(Controllable::controlled(false, None));
        assert_eq!(modal.take_restore_focus(), None);
    }

    #[test]
    fn title_and_description_label_the_surface() {
        let mut modal = ModalModel::with_id("dialog-3", Controllable::uncontrolled(true));
        assert_eq!(modal.dialog_attrs().labelled_by, None);
        let title = modal.register_title();
        let description = modal.register_description();
        let attrs = modal.dialog_attrs();
        assert_eq!(attrs.labelled_by, Some(title));
        assert_eq!(attrs.described_by, Some(description));
        assert_eq!(attrs.role, "dialog");
        modal.deregister_title();
        assert_eq!(modal.dialog_attrs().labelled_by, None);
    }

    #[test]
    fn controlled_dialog_ignores_trigger_clicks() {
        let mut modal = ModalModel::with_id("dialog", Controllable::controlled(false, None));
        modal.handle(InteractionEvent::TriggerClick);
        assert!(!modal.is_open());
        assert_eq!(modal.trigger_attrs().haspopup, "dialog");
        let switch = modal.sync(Controllable::uncontrolled(false));
        assert!(switch.is_some());
        modal.handle(InteractionEvent::TriggerClick);
        assert!(modal.is_open());
    }
}
