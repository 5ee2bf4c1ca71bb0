//! Dropdown menu model.
//!
//! # Design
//! - One model per wrapper instance; the view keeps it behind a shared cell.
//! - `open` is resolved through [`Controllable`]; click-to-toggle is only
//!   wired when uncontrolled.
//! - Effects from the binder are applied here so the view only forwards
//!   events and performs focus moves.
//! - Items only register while the surface is mounted, so an arrow key on a
//!   closed trigger records the list end and resolves it as items arrive.

use crate::core::context::next_instance_id;
use crate::core::control::{ControlMode, Controllable, ModeSwitch, ModeTracker};
use crate::core::disclosure::{DisclosureState, Phase};
use crate::core::interactions::{
    Edge, FocusTarget, InteractionConfig, InteractionEvent, Interactions, ItemAttrs, Role, SurfaceAttrs,
    TriggerAttrs, item_attrs, surface_attrs, trigger_attrs,
};
use crate::core::positioning::PositionConfig;
use crate::core::registry::{ItemEntry, ItemRegistry};

/// What the view must do after an event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DropdownOutcome {
    /// Id of the item selected by this event.
    pub selected: Option<String>,
    /// Focus move to perform.
    pub focus: Option<FocusTarget>,
    /// Whether to call `preventDefault` on the DOM event.
    pub prevent_default: bool,
}

/// State for one dropdown instance.
#[derive(Debug)]
pub struct DropdownModel {
    id: String,
    open: Controllable<bool>,
    active: Option<usize>,
    open_at: Option<Edge>,
    edge_focus: bool,
    phase: Phase,
    registry: ItemRegistry,
    interactions: Interactions,
    position: PositionConfig,
    modes: ModeTracker,
}

impl DropdownModel {
    /// Create a model with a generated surface id.
    #[must_use]
    pub fn new(open: Controllable<bool>) -> Self {
        Self::with_id(next_instance_id("dropdown"), open)
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
            active: None,
            open_at: None,
            edge_focus: false,
            phase,
            registry: ItemRegistry::default(),
            interactions: Interactions::new(InteractionConfig::menu(uncontrolled)),
            position: PositionConfig::menu(),
            modes,
        }
    }

    /// Replace placement settings.
    #[must_use]
    pub const fn with_position(mut self, position: PositionConfig) -> Self {
        self.position = position;
        self
    }

    /// Adopt the `open` resolution of a new render.
    ///
    /// Returns the mode switch when the caller flipped between controlled and
    /// uncontrolled; the new mode is used from here on.
    pub fn sync(&mut self, open: Controllable<bool>) -> Option<ModeSwitch> {
        let switch = self.modes.observe(open.mode());
        self.interactions
            .set_click(open.mode() == ControlMode::Uncontrolled);
        self.open = open;
        self.follow_open();
        switch
    }

    /// Surface element id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the menu is requested open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.value()
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Highlighted item.
    #[must_use]
    pub const fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Placement settings.
    #[must_use]
    pub const fn position(&self) -> &PositionConfig {
        &self.position
    }

    /// Registered items.
    #[must_use]
    pub const fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    /// Snapshot for the binder.
    #[must_use]
    pub fn state(&self) -> DisclosureState {
        DisclosureState {
            open: self.is_open(),
            active_index: self.active,
        }
    }

    /// Register an item on mount.
    pub fn register_item(&mut self, entry: ItemEntry) -> usize {
        let index = self.registry.register(entry);
        if let Some(edge) = self.open_at {
            let target = edge.locate(&self.registry);
            if target.is_some() && target != self.active {
                self.active = target;
                self.edge_focus = true;
            }
        }
        index
    }

    /// Focus move owed to an arrow-key open whose items registered after the
    /// event. Returns it once.
    pub fn take_edge_focus(&mut self) -> Option<FocusTarget> {
        if !std::mem::take(&mut self.edge_focus) {
            return None;
        }
        self.active.map(FocusTarget::Item)
    }

    /// Deregister an item on unmount.
    pub fn deregister_item(&mut self, id: &str) {
        if self.registry.deregister(id) {
            self.active = self.active.filter(|&index| index < self.registry.len());
        }
    }

    /// Request an open state through the resolver.
    pub fn set_open(&mut self, open: bool) {
        self.open.set(open);
        if !open {
            self.active = None;
            self.clear_open_at();
            self.interactions.reset_typeahead();
        }
        self.follow_open();
    }

    /// Forget typeahead input, as when the idle timer fires.
    pub fn reset_typeahead(&mut self) {
        self.interactions.reset_typeahead();
    }

    /// Feed one interaction event at `now_ms`.
    pub fn handle(&mut self, event: InteractionEvent, now_ms: u64) -> DropdownOutcome {
        let effects = self
            .interactions
            .handle(self.state(), &self.registry, event, now_ms);
        let selected = effects
            .select
            .and_then(|selection| self.registry.get(selection.index))
            .map(|item| item.id.clone());
        self.clear_open_at();
        if effects.active.flatten().is_none() {
            self.open_at = effects.open_at;
        }
        if let Some(active) = effects.active {
            self.active = active;
        }
        if let Some(open) = effects.open {
            self.open.set(open);
            self.follow_open();
        }
        DropdownOutcome {
            selected,
            focus: effects.focus,
            prevent_default: effects.prevent_default,
        }
    }

    /// The transition adapter finished the running transition.
    pub fn transition_end(&mut self) {
        self.phase = self.phase.transition_end();
        if self.phase == Phase::Closed {
            self.registry.clear();
        }
    }

    /// The transition adapter reported mount status.
    pub fn set_mounted(&mut self, is_mounted: bool) {
        self.phase = self.phase.mounted(is_mounted);
        if self.phase == Phase::Closed {
            self.registry.clear();
        }
    }

    /// Trigger attributes.
    #[must_use]
    pub fn trigger_attrs(&self) -> TriggerAttrs {
        trigger_attrs(Role::Menu, &self.id, self.is_open())
    }

    /// Surface attributes.
    #[must_use]
    pub fn surface_attrs(&self) -> SurfaceAttrs {
        surface_attrs(Role::Menu, &self.id)
    }

    /// Attributes for the item at `index`.
    #[must_use]
    pub fn item_attrs(&self, index: usize) -> ItemAttrs {
        item_attrs(Role::Menu, &self.registry, self.state(), index)
    }

    fn clear_open_at(&mut self) {
        self.open_at = None;
        self.edge_focus = false;
    }

    fn follow_open(&mut self) {
        self.phase = self.phase.request(self.open.value());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::keys::{Key, KeyPress};
    use crate::core::positioning::Placement;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn with_items(model: &mut DropdownModel) {
        model.register_item(ItemEntry::new("profile", "Profile"));
        model.register_item(ItemEntry::new("billing", "Billing").disabled(true));
        model.register_item(ItemEntry::new("sign-out", "Sign out"));
    }

    #[test]
    fn defaults_to_bottom_end_menu_placement() {
        let model = DropdownModel::new(Controllable::uncontrolled(false));
        assert_eq!(model.position().placement, Placement::BOTTOM_END);
        assert_eq!(model.position().offset, 6);
        assert_eq!(model.position().padding, 6);
        assert!(model.position().match_reference_width);
        assert!(model.id().starts_with("dropdown-"));
    }

    #[test]
    fn click_open_navigate_and_select_closes() {
        let mut model = DropdownModel::with_id("menu", Controllable::uncontrolled(false));
        with_items(&mut model);
        model.handle(InteractionEvent::TriggerClick, 0);
        assert!(model.is_open());
        assert_eq!(model.phase(), Phase::Opening);
        model.transition_end();
        assert_eq!(model.phase(), Phase::Open);

        model.handle(InteractionEvent::SurfaceKey(KeyPress::plain(Key::ArrowDown)), 10);
        model.handle(InteractionEvent::SurfaceKey(KeyPress::plain(Key::ArrowDown)), 20);
        assert_eq!(model.active_index(), Some(2));
        model.handle(InteractionEvent::SurfaceKey(KeyPress::plain(Key::ArrowDown)), 30);
        assert_eq!(model.active_index(), Some(2));

        let outcome = model.handle(InteractionEvent::SurfaceKey(KeyPress::plain(Key::Enter)), 40);
        assert_eq!(outcome.selected.as_deref(), Some("sign-out"));
        assert_eq!(outcome.focus, Some(FocusTarget::Trigger));
        assert!(!model.is_open());
        assert_eq!(model.phase(), Phase::Closing);
        model.set_mounted(false);
        assert_eq!(model.phase(), Phase::Closed);
        assert!(model.registry().is_empty());
    }

    #[test]
    fn arrow_keys_after_a_close_activate_the_list_ends() {
        let mut model = DropdownModel::with_id("menu", Controllable::uncontrolled(false));
        model.handle(InteractionEvent::TriggerClick, 0);
        with_items(&mut model);
        model.transition_end();
        model.handle(InteractionEvent::TriggerClick, 10);
        model.transition_end();
        assert_eq!(model.phase(), Phase::Closed);
        assert!(model.registry().is_empty());

        let outcome = model.handle(InteractionEvent::TriggerKey(KeyPress::plain(Key::ArrowDown)), 20);
        assert!(model.is_open());
        assert!(outcome.prevent_default);
        assert_eq!(outcome.focus, None);
        assert_eq!(model.active_index(), None);
        with_items(&mut model);
        assert_eq!(model.active_index(), Some(0));
        assert_eq!(model.take_edge_focus(), Some(FocusTarget::Item(0)));
        assert_eq!(model.take_edge_focus(), None);

        model.handle(InteractionEvent::SurfaceKey(KeyPress::plain(Key::Escape)), 30);
        model.set_mounted(false);
        assert!(model.registry().is_empty());
        model.handle(InteractionEvent::TriggerKey(KeyPress::plain(Key::ArrowUp)), 40);
        with_items(&mut model);
        assert_eq!(model.active_index(), Some(2));
        assert_eq!(model.take_edge_focus(), Some(FocusTarget::Item(2)));
    }

    #[test]
    fn later_events_cancel_a_pending_list_end() {
        let mut model = DropdownModel::with_id("menu", Controllable::uncontrolled(false));
        model.handle(InteractionEvent::TriggerKey(KeyPress::plain(Key::ArrowDown)), 0);
        model.register_item(ItemEntry::new("profile", "Profile"));
        model.handle(InteractionEvent::ItemHover(0), 5);
        model.register_item(ItemEntry::new("sign-out", "Sign out"));
        assert_eq!(model.active_index(), Some(0));
        assert_eq!(model.take_edge_focus(), None);
    }

    #[test]
    fn controlled_menu_routes_changes_to_owner() {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&requests);
        let open = Controllable::controlled(
            true,
            Some(Rc::new(move |value| sink.borrow_mut().push(value)) as Rc<dyn Fn(bool)>),
        );
        let mut model = DropdownModel::with_id("menu", open);
        with_items(&mut model);

        let click = model.handle(InteractionEvent::TriggerClick, 0);
        assert_eq!(click, DropdownOutcome::default());
        model.handle(InteractionEvent::OutsidePress, 5);
        assert!(model.is_open());
        assert_eq!(*requests.borrow(), vec![false]);
    }

    #[test]
    fn mode_switch_is_reported_and_new_mode_wins() {
        let mut model = DropdownModel::with_id("menu", Controllable::uncontrolled(false));
        let switch = model.sync(Controllable::controlled(true, None));
        assert!(switch.is_some());
        assert!(model.is_open());
        assert_eq!(model.sync(Controllable::controlled(true, None)), None);
        let click = model.handle(InteractionEvent::TriggerClick, 0);
        assert_eq!(click.selected, None);
        assert!(model.is_open());
    }

    #[test]
    fn trigger_attrs_expose_expanded_state() {
        let mut model = DropdownModel::with_id("menu-7", Controllable::uncontrolled(false));
        assert!(!model.trigger_attrs().expanded);
        model.set_open(true);
        let attrs = model.trigger_attrs();
        assert!(attrs.expanded);
        assert_eq!(attrs.controls.as_deref(), Some("menu-7"));
        assert_eq!(model.surface_attrs().role, "menu");
    }
}
