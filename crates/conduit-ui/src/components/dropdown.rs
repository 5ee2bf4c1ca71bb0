//! Dropdown menu: wrapper, trigger, surface, and items.
//!
//! # Design
//! - The wrapper owns one [`DropdownModel`] per mount and shares it through
//!   context; sub-components outside a wrapper panic with the provider error.
//! - Triggers accept a render callback so callers can supply their own element
//!   while still receiving the handlers and ARIA attributes.
//! - Focus moves and positioning run after render, once the surface exists.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo::console;
use gloo::events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use yew::events::TransitionEvent;
use yew::prelude::*;

use crate::components::dom::{self, TriggerProps};
use crate::core::context::require_context;
use crate::core::disclosure::Phase;
use crate::core::dropdown::DropdownModel;
use crate::core::interactions::{FocusTarget, InteractionEvent};
use crate::core::keys::Key;
use crate::core::positioning::{AnchoredPositioning, FloatingPosition, Positioning};
use crate::core::registry::ItemEntry;
use crate::core::typeahead::TYPEAHEAD_RESET_MS;

#[derive(Clone)]
pub(crate) struct DropdownContext {
    model: Rc<RefCell<DropdownModel>>,
    trigger_ref: NodeRef,
    surface_ref: NodeRef,
    dispatch: Callback<InteractionEvent, bool>,
    refresh: Callback<()>,
    handlers: Rc<RefCell<HashMap<String, Callback<()>>>>,
    position: Option<FloatingPosition>,
    revision: u64,
}

impl PartialEq for DropdownContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.model, &other.model) && self.revision == other.revision
    }
}

#[hook]
fn use_dropdown() -> DropdownContext {
    match require_context(use_context::<DropdownContext>(), "Dropdown", "Dropdown") {
        Ok(context) => context,
        Err(err) => panic!("{err}"),
    }
}

const fn is_typeahead_input(event: InteractionEvent) -> bool {
    matches!(
        event,
        InteractionEvent::TriggerKey(press) | InteractionEvent::SurfaceKey(press)
            if matches!(press.key, Key::Char(_) | Key::Space)
    )
}

fn typeahead_reset_ms() -> u32 {
    u32::try_from(TYPEAHEAD_RESET_MS).unwrap_or(u32::MAX)
}

#[derive(Properties, PartialEq)]
pub(crate) struct DropdownProps {
    /// Controlled open state; omit to let the menu own it.
    #[prop_or_default]
    pub(crate) open: Option<bool>,
    #[prop_or_default]
    pub(crate) default_open: bool,
    #[prop_or_default]
    pub(crate) on_open_change: Option<Callback<bool>>,
    /// Receives the id of every selected item.
    #[prop_or_default]
    pub(crate) on_select: Callback<String>,
    #[prop_or_default]
    pub(crate) class: Classes,
    #[prop_or_default]
    pub(crate) children: Children,
}

#[function_component(Dropdown)]
pub(crate) fn dropdown(props: &DropdownProps) -> Html {
    let force = use_force_update();
    let cell = use_mut_ref(|| props.default_open);
    let open = dom::resolve(props.open, props.on_open_change.as_ref(), &cell, &force);
    let model = use_mut_ref(|| DropdownModel::new(open.clone()));
    let switch = model.borrow_mut().sync(open);
    if let Some(switch) = switch {
        console::warn!(format!(
            "Dropdown switched from {:?} to {:?}; using the new mode",
            switch.from, switch.to
        ));
    }

    let revision = use_mut_ref(|| 0_u64);
    *revision.borrow_mut() += 1;
    let trigger_ref = use_node_ref();
    let surface_ref = use_node_ref();
    let handlers = use_mut_ref(HashMap::<String, Callback<()>>::new);
    let pending_focus = use_mut_ref(|| None::<FocusTarget>);
    let position = use_mut_ref(|| None::<FloatingPosition>);
    let typeahead_timer = use_mut_ref(|| None::<Timeout>);

    let refresh = {
        let force = force.clone();
        Callback::from(move |()| force.force_update())
    };

    let dispatch = {
        let model = model.clone();
        let force = force.clone();
        let handlers = handlers.clone();
        let pending_focus = pending_focus.clone();
        let on_select = props.on_select.clone();
        Callback::from(move |event: InteractionEvent| {
            let outcome = model.borrow_mut().handle(event, dom::now_ms());
            if is_typeahead_input(event) {
                let model = model.clone();
                *typeahead_timer.borrow_mut() = Some(Timeout::new(typeahead_reset_ms(), move || {
                    model.borrow_mut().reset_typeahead();
                }));
            }
            if let Some(id) = outcome.selected {
                let handler = handlers.borrow().get(&id).cloned();
                if let Some(handler) = handler {
                    handler.emit(());
                }
                on_select.emit(id);
            }
            if outcome.focus.is_some() {
                *pending_focus.borrow_mut() = outcome.focus;
            }
            force.force_update();
            outcome.prevent_default
        })
    };

    {
        let model = model.clone();
        let trigger_ref = trigger_ref.clone();
        let surface_ref = surface_ref.clone();
        let pending_focus = pending_focus.clone();
        let position = position.clone();
        let force = force.clone();
        use_effect(move || {
            let phase = model.borrow().phase();
            let mut changed = false;
            if phase.is_mounted() {
                let config = *model.borrow().position();
                let next = dom::measure(&trigger_ref, &surface_ref).map(
                    |(reference, floating, viewport)| {
                        AnchoredPositioning.compute(&config, reference, floating, viewport)
                    },
                );
                if next.is_some() && *position.borrow() != next {
                    *position.borrow_mut() = next;
                    changed = true;
                }
            }
            if phase == Phase::Opening {
                model.borrow_mut().transition_end();
                changed = true;
            }
            let edge = model.borrow_mut().take_edge_focus();
            if edge.is_some() {
                *pending_focus.borrow_mut() = edge;
            }
            let target = pending_focus.borrow_mut().take();
            if let Some(target) = target {
                let focused = dom::focus_target(target, &trigger_ref, &surface_ref);
                if !focused && phase.is_mounted() {
                    *pending_focus.borrow_mut() = Some(target);
                }
            }
            if changed {
                force.force_update();
            }
            || ()
        });
    }

    let phase = model.borrow().phase();
    {
        let model = model.clone();
        let force = force.clone();
        use_effect_with_deps(
            move |phase: &Phase| {
                let fallback = phase.exit_fallback_ms().map(|delay| {
                    Timeout::new(delay, move || {
                        model.borrow_mut().set_mounted(false);
                        force.force_update();
                    })
                });
                move || drop(fallback)
            },
            phase,
        );
    }

    let is_open = model.borrow().is_open();
    {
        let dispatch = dispatch.clone();
        let refresh = refresh.clone();
        let trigger_ref = trigger_ref.clone();
        let surface_ref = surface_ref.clone();
        use_effect_with_deps(
            move |open: &bool| {
                let listeners = open.then(|| {
                    let document = gloo::utils::document();
                    let press = {
                        let dispatch = dispatch.clone();
                        let surface_ref = surface_ref.clone();
                        EventListener::new(&document, "pointerdown", move |event| {
                            if !dom::event_within(event, &[&trigger_ref, &surface_ref]) {
                                dispatch.emit(InteractionEvent::OutsidePress);
                            }
                        })
                    };
                    let scroll = {
                        EventListener::new_with_options(
                            &document,
                            "scroll",
                            EventListenerOptions::run_in_capture_phase(),
                            move |event| {
                                if !dom::event_within(event, &[&surface_ref]) {
                                    dispatch.emit(InteractionEvent::PositionInvalidated);
                                }
                            },
                        )
                    };
                    let resize = EventListener::new(&gloo::utils::window(), "resize", move |_| {
                        refresh.emit(());
                    });
                    (press, scroll, resize)
                });
                move || drop(listeners)
            },
            is_open,
        );
    }

    let context = DropdownContext {
        model,
        trigger_ref,
        surface_ref,
        dispatch,
        refresh,
        handlers,
        position: *position.borrow(),
        revision: *revision.borrow(),
    };

    html! {
        <ContextProvider<DropdownContext> context={context}>
            <div class={classes!("dropdown", props.class.clone())}>
                { for props.children.iter() }
            </div>
        </ContextProvider<DropdownContext>>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct DropdownTriggerProps {
    /// Custom trigger element; receives handlers and ARIA attributes.
    #[prop_or_default]
    pub(crate) render: Option<Callback<TriggerProps, Html>>,
    #[prop_or_default]
    pub(crate) aria_label: Option<AttrValue>,
    #[prop_or_default]
    pub(crate) class: Classes,
    #[prop_or_default]
    pub(crate) children: Children,
}

#[function_component(DropdownTrigger)]
pub(crate) fn dropdown_trigger(props: &DropdownTriggerProps) -> Html {
    let context = use_dropdown();
    let attrs = context.model.borrow().trigger_attrs();
    let onclick = {
        let dispatch = context.dispatch.clone();
        Callback::from(move |_: MouseEvent| {
            dispatch.emit(InteractionEvent::TriggerClick);
        })
    };
    let trigger = TriggerProps {
        node_ref: context.trigger_ref.clone(),
        onclick,
        onkeydown: dom::key_handler(context.dispatch.clone(), InteractionEvent::TriggerKey),
        haspopup: attrs.haspopup,
        expanded: attrs.expanded,
        controls: attrs.controls.map(AttrValue::from),
        state: attrs.state,
    };
    match &props.render {
        Some(render) => render.emit(trigger),
        None => trigger.button(
            classes!("dropdown-trigger", props.class.clone()),
            props.aria_label.clone(),
            &props.children,
        ),
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct DropdownMenuProps {
    #[prop_or_default]
    pub(crate) class: Classes,
    #[prop_or_default]
    pub(crate) children: Children,
}

#[function_component(DropdownMenu)]
pub(crate) fn dropdown_menu(props: &DropdownMenuProps) -> Html {
    let context = use_dropdown();
    let (phase, attrs) = {
        let model = context.model.borrow();
        (model.phase(), model.surface_attrs())
    };
    if !phase.is_mounted() {
        return html! {};
    }
    let placement = context.position.map_or_else(
        || "position: fixed; visibility: hidden;".to_string(),
        |position| position.styles(),
    );
    let ontransitionend = {
        let model = context.model.clone();
        let refresh = context.refresh.clone();
        Callback::from(move |event: TransitionEvent| {
            if dom::is_own_event(&event) {
                model.borrow_mut().transition_end();
                refresh.emit(());
            }
        })
    };
    html! {
        <div
            ref={context.surface_ref.clone()}
            id={attrs.id}
            role={attrs.role}
            tabindex="-1"
            class={classes!("dropdown-menu", props.class.clone())}
            style={format!("{placement} {}", phase.styles())}
            data-state={phase.as_str()}
            onkeydown={dom::key_handler(context.dispatch.clone(), InteractionEvent::SurfaceKey)}
            ontransitionend={ontransitionend}
        >
            { for props.children.iter() }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct DropdownItemProps {
    /// Stable item id reported on selection.
    pub(crate) id: AttrValue,
    /// Text matched by typeahead.
    pub(crate) label: AttrValue,
    #[prop_or_default]
    pub(crate) disabled: bool,
    /// Keep the menu open after selecting this item.
    #[prop_or_default]
    pub(crate) keep_open: bool,
    #[prop_or_default]
    pub(crate) on_select: Callback<()>,
    #[prop_or_default]
    pub(crate) class: Classes,
    #[prop_or_default]
    pub(crate) children: Children,
}

#[function_component(DropdownItem)]
pub(crate) fn dropdown_item(props: &DropdownItemProps) -> Html {
    let context = use_dropdown();
    context
        .handlers
        .borrow_mut()
        .insert(props.id.to_string(), props.on_select.clone());
    {
        let model = context.model.clone();
        let handlers = context.handlers.clone();
        let refresh = context.refresh.clone();
        use_effect_with_deps(
            move |(id, label, disabled, keep_open): &(AttrValue, AttrValue, bool, bool)| {
                let mut entry = ItemEntry::new(id.to_string(), label.to_string()).disabled(*disabled);
                if *keep_open {
                    entry = entry.keep_open();
                }
                model.borrow_mut().register_item(entry);
                refresh.emit(());
                let id = id.to_string();
                move || {
                    model.borrow_mut().deregister_item(&id);
                    handlers.borrow_mut().remove(&id);
                }
            },
            (
                props.id.clone(),
                props.label.clone(),
                props.disabled,
                props.keep_open,
            ),
        );
    }

    let (index, attrs) = {
        let model = context.model.borrow();
        let index = model.registry().index_of(&props.id);
        (index, index.map(|index| model.item_attrs(index)))
    };
    let onclick = {
        let dispatch = context.dispatch.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(index) = index {
                dispatch.emit(InteractionEvent::ItemClick(index));
            }
        })
    };
    let onpointerenter = {
        let dispatch = context.dispatch.clone();
        Callback::from(move |_: PointerEvent| {
            if let Some(index) = index {
                dispatch.emit(InteractionEvent::ItemHover(index));
            }
        })
    };
    let active = attrs.as_ref().is_some_and(|attrs| attrs.tabindex == 0);
    html! {
        <div
            role={attrs.as_ref().and_then(|attrs| attrs.role)}
            tabindex={attrs.as_ref().map_or(-1, |attrs| attrs.tabindex).to_string()}
            aria-disabled={props.disabled.to_string()}
            data-item-index={index.map(|index| index.to_string())}
            data-active={active.then_some("true")}
            class={classes!("dropdown-item", props.class.clone())}
            onclick={onclick}
            onpointerenter={onpointerenter}
        >
            if props.children.is_empty() {
                { props.label.clone() }
            } else {
                { for props.children.iter() }
            }
        </div>
    }
}
