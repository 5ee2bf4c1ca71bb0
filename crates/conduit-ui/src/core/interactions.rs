//! Interaction binder merging disclosure behaviours into one reducer.
//!
//! # Design
//! - Behaviours run in a fixed order: dismiss, click, list navigation,
//!   typeahead, role. Each writes into one [`Effects`] value, so when two
//!   behaviours produce the same kind of effect the later one wins.
//! - The reducer is pure: it reads state and returns effects. Applying them is
//!   the caller's job, which keeps controlled values untouched.
//! - Role contributes attributes only.

use crate::core::disclosure::DisclosureState;
use crate::core::keys::{Key, KeyPress};
use crate::core::navigation::ListNavigation;
use crate::core::registry::ItemRegistry;
use crate::core::typeahead::Typeahead;

/// ARIA role of the floating surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Menu with `menuitem` children.
    Menu,
    /// Dialog.
    Dialog,
}

impl Role {
    /// Surface `role` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Dialog => "dialog",
        }
    }

    /// `aria-haspopup` value for the trigger.
    #[must_use]
    pub const fn haspopup(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Dialog => "dialog",
        }
    }

    /// Role attribute for list items, when the role has one.
    #[must_use]
    pub const fn item_role(self) -> Option<&'static str> {
        match self {
            Self::Menu => Some("menuitem"),
            Self::Dialog => None,
        }
    }
}

/// Individually switchable dismissal triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DismissOptions {
    /// Close on pointer-down outside trigger and surface.
    pub outside_press: bool,
    /// Close on Escape.
    pub escape_key: bool,
    /// Close when an ancestor scrolls and the anchor position is invalidated.
    pub ancestor_scroll: bool,
}

impl Default for DismissOptions {
    fn default() -> Self {
        Self {
            outside_press: true,
            escape_key: true,
            ancestor_scroll: true,
        }
    }
}

/// Behaviour switches for one disclosure instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InteractionConfig {
    /// Surface role.
    pub role: Role,
    /// Trigger click toggles `open`. Only enabled when uncontrolled.
    pub click: bool,
    /// Dismissal triggers.
    pub dismiss: DismissOptions,
    /// Arrow-key navigation; `None` disables it.
    pub list_navigation: Option<ListNavigation>,
    /// Printable keys jump to matching items.
    pub typeahead: bool,
}

impl InteractionConfig {
    /// Menu behaviours: click, dismiss, vertical navigation, typeahead.
    #[must_use]
    pub fn menu(click: bool) -> Self {
        Self {
            role: Role::Menu,
            click,
            dismiss: DismissOptions::default(),
            list_navigation: Some(ListNavigation::vertical()),
            typeahead: true,
        }
    }

    /// Dialog behaviours: click and dismiss.
    #[must_use]
    pub fn dialog(click: bool) -> Self {
        Self {
            role: Role::Dialog,
            click,
            dismiss: DismissOptions::default(),
            list_navigation: None,
            typeahead: false,
        }
    }
}

/// Input delivered to the binder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionEvent {
    /// Trigger clicked.
    TriggerClick,
    /// Key pressed while the trigger has focus.
    TriggerKey(KeyPress),
    /// Key pressed inside the surface.
    SurfaceKey(KeyPress),
    /// Pointer-down outside trigger and surface.
    OutsidePress,
    /// The positioning adapter reported the anchor moved under an ancestor
    /// scroll.
    PositionInvalidated,
    /// Item clicked.
    ItemClick(usize),
    /// Pointer entered an item.
    ItemHover(usize),
}

/// Where focus should move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusTarget {
    /// Back to the trigger.
    Trigger,
    /// Onto the item at the index.
    Item(usize),
}

/// End of the list a closed trigger opens onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    /// First enabled item.
    First,
    /// Last enabled item.
    Last,
}

impl Edge {
    /// Index of the enabled item at this end of `registry`.
    #[must_use]
    pub fn locate(self, registry: &ItemRegistry) -> Option<usize> {
        match self {
            Self::First => registry.first_enabled(),
            Self::Last => registry.last_enabled(),
        }
    }
}

/// Effects requested by one event. `None` fields leave state untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Effects {
    /// Requested open state.
    pub open: Option<bool>,
    /// Requested active index.
    pub active: Option<Option<usize>>,
    /// Item selected, with whether the surface should close.
    pub select: Option<Selection>,
    /// Focus move.
    pub focus: Option<FocusTarget>,
    /// List end to activate once the opening surface has registered its
    /// items.
    pub open_at: Option<Edge>,
    /// Whether the DOM default action should be suppressed.
    pub prevent_default: bool,
}

impl Effects {
    /// Whether the event produced nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn close(&mut self) {
        self.open = Some(false);
        self.active = Some(None);
    }
}

/// An item selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Selected item index.
    pub index: usize,
    /// Whether the surface closes afterwards.
    pub close: bool,
}

/// Stateful binder holding the typeahead buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interactions {
    config: InteractionConfig,
    typeahead: Typeahead,
}

impl Interactions {
    /// Create a binder.
    #[must_use]
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            typeahead: Typeahead::default(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Enable or disable click-to-toggle, as when control mode changes.
    pub const fn set_click(&mut self, enabled: bool) {
        self.config.click = enabled;
    }

    /// Forget typeahead input.
    pub fn reset_typeahead(&mut self) {
        self.typeahead.reset();
    }

    /// Reduce one event to effects.
    pub fn handle(
        &mut self,
        state: DisclosureState,
        registry: &ItemRegistry,
        event: InteractionEvent,
        now_ms: u64,
    ) -> Effects {
        let mut effects = Effects::default();
        self.dismiss(state, event, &mut effects);
        self.click(state, event, &mut effects);
        self.list_navigation(state, registry, event, now_ms, &mut effects);
        self.typeahead(state, registry, event, now_ms, &mut effects);
        if effects.open == Some(false) {
            self.typeahead.reset();
        }
        effects
    }

    fn dismiss(&self, state: DisclosureState, event: InteractionEvent, effects: &mut Effects) {
        if !state.open {
            return;
        }
        let options = self.config.dismiss;
        match event {
            InteractionEvent::OutsidePress if options.outside_press => effects.close(),
            InteractionEvent::PositionInvalidated if options.ancestor_scroll => effects.close(),
            InteractionEvent::TriggerKey(press) | InteractionEvent::SurfaceKey(press)
                if options.escape_key && press.key == Key::Escape =>
            {
                effects.close();
                effects.focus = Some(FocusTarget::Trigger);
                effects.prevent_default = true;
            }
            _ => {}
        }
    }

    fn click(&self, state: DisclosureState, event: InteractionEvent, effects: &mut Effects) {
        if self.config.click && event == InteractionEvent::TriggerClick {
            if state.open {
                effects.close();
            } else {
                effects.open = Some(true);
            }
        }
    }

    fn list_navigation(
        &self,
        state: DisclosureState,
        registry: &ItemRegistry,
        event: InteractionEvent,
        now_ms: u64,
        effects: &mut Effects,
    ) {
        let Some(nav) = self.config.list_navigation else {
            return;
        };
        match event {
            InteractionEvent::TriggerKey(press) if !state.open => {
                let edge = match press.key {
                    Key::ArrowDown => Edge::First,
                    Key::ArrowUp => Edge::Last,
                    _ => return,
                };
                let target = edge.locate(registry);
                effects.open = Some(true);
                effects.open_at = Some(edge);
                effects.active = Some(target);
                effects.focus = target.map(FocusTarget::Item);
                effects.prevent_default = true;
            }
            InteractionEvent::TriggerKey(press) | InteractionEvent::SurfaceKey(press)
                if state.open =>
            {
                if let Some(step) = nav.decode(press.key) {
                    let target = nav.apply(registry, state.active_index, step);
                    effects.active = Some(target);
                    effects.focus = target.map(FocusTarget::Item);
                    effects.prevent_default = true;
                    return;
                }
                let selects = match press.key {
                    Key::Enter => true,
                    Key::Space => !self.typeahead.is_typing(now_ms),
                    _ => false,
                };
                if let (true, Some(index)) = (selects, state.active_index) {
                    select(registry, index, effects);
                    effects.prevent_default = true;
                }
            }
            InteractionEvent::ItemClick(index) if state.open => select(registry, index, effects),
            InteractionEvent::ItemHover(index) if state.open && registry.is_enabled(index) => {
                effects.active = Some(Some(index));
                effects.focus = Some(FocusTarget::Item(index));
            }
            _ => {}
        }
    }

    fn typeahead(
        &mut self,
        state: DisclosureState,
        registry: &ItemRegistry,
        event: InteractionEvent,
        now_ms: u64,
        effects: &mut Effects,
    ) {
        if !self.config.typeahead || !state.open {
            return;
        }
        let (InteractionEvent::TriggerKey(press) | InteractionEvent::SurfaceKey(press)) = event
        else {
            return;
        };
        if press.modified {
            return;
        }
        let ch = match press.key {
            Key::Char(ch) => ch,
            Key::Space if self.typeahead.is_typing(now_ms) => ' ',
            _ => return,
        };
        if let Some(index) = self
            .typeahead
            .input(ch, now_ms, registry, state.active_index)
        {
            effects.active = Some(Some(index));
            effects.focus = Some(FocusTarget::Item(index));
        }
    }
}

fn select(registry: &ItemRegistry, index: usize, effects: &mut Effects) {
    let Some(item) = registry.get(index).filter(|item| !item.disabled) else {
        return;
    };
    effects.select = Some(Selection {
        index,
        close: item.close_on_select,
    });
    if item.close_on_select {
        effects.close();
        effects.focus = Some(FocusTarget::Trigger);
    }
}

/// ARIA attributes for a trigger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerAttrs {
    /// `aria-haspopup`.
    pub haspopup: &'static str,
    /// `aria-expanded`.
    pub expanded: bool,
    /// `aria-controls`, present while the surface is mounted.
    pub controls: Option<String>,
    /// `data-state`.
    pub state: &'static str,
}

/// ARIA attributes for the surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurfaceAttrs {
    /// `role`.
    pub role: &'static str,
    /// Element id referenced by the trigger.
    pub id: String,
}

/// ARIA attributes for one item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemAttrs {
    /// Item role, when the surface role defines one.
    pub role: Option<&'static str>,
    /// Roving tab index: 0 for the active item, -1 otherwise.
    pub tabindex: i32,
    /// `aria-disabled`.
    pub disabled: bool,
}

/// Attributes contributed by the role behaviour.
#[must_use]
pub fn trigger_attrs(role: Role, surface_id: &str, open: bool) -> TriggerAttrs {
    TriggerAttrs {
        haspopup: role.haspopup(),
        expanded: open,
        controls: open.then(|| surface_id.to_string()),
        state: if open { "open" } else { "closed" },
    }
}

/// Surface attributes for `role`.
#[must_use]
pub fn surface_attrs(role: Role, surface_id: &str) -> SurfaceAttrs {
    SurfaceAttrs {
        role: role.as_str(),
        id: surface_id.to_string(),
    }
}

/// Item attributes for the item at `index`.
#[must_use]
pub fn item_attrs(role: Role, registry: &ItemRegistry, state: DisclosureState, index: usize) -> ItemAttrs {
    ItemAttrs {
        role: role.item_role(),
        tabindex: if state.active_index == Some(index) { 0 } else { -1 },
        disabled: !registry.is_enabled(index),
    }
}
