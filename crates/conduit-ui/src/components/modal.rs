//! Modal dialog: wrapper, trigger, surface, and layout parts.
//!
//! # Design
//! - Mirrors the dropdown wiring without list behaviours.
//! - Tab and Shift+Tab are trapped inside the surface; closing returns focus to
//!   the trigger.
//! - Body scroll is locked while the surface is mounted and restored on
//!   unmount.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::console;
use gloo::events::EventListener;
use gloo_timers::callback::Timeout;
use yew::events::TransitionEvent;
use yew::prelude::*;

use crate::components::dom::{self, TriggerProps};
use crate::core::context::require_context;
use crate::core::disclosure::Phase;
use crate::core::interactions::{FocusTarget, InteractionEvent};
use crate::core::keys::Key;
use crate::core::modal::{ModalModel, TrapMove, trap_focus};

#[derive(Clone)]
pub(crate) struct ModalContext {
    model: Rc<RefCell<ModalModel>>,
    trigger_ref: NodeRef,
    surface_ref: NodeRef,
    dispatch: Callback<InteractionEvent, bool>,
    set_open: Callback<bool>,
    refresh: Callback<()>,
    revision: u64,
}

impl PartialEq for ModalContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.model, &other.model) && self.revision == other.revision
    }
}

#[hook]
fn use_modal() -> ModalContext {
    match require_context(use_context::<ModalContext>(), "Modal", "Modal") {
        Ok(context) => context,
        Err(err) => panic!("{err}"),
    }
}

fn lock_body_scroll(locked: bool) {
    if let Some(body) = gloo::utils::document().body() {
        let style = body.style();
        let result = if locked {
            style.set_property("overflow", "hidden")
        } else {
            style.remove_property("overflow").map(|_| ())
        };
        if result.is_err() {
            console::error!("failed to update body scroll lock");
        }
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ModalProps {
    /// Controlled open state; omit to let the dialog own it.
    #[prop_or_default]
    pub(crate) open: Option<bool>,
    #[prop_or_default]
    pub(crate) default_open: bool,
    #[prop_or_default]
    pub(crate) on_open_change: Option<Callback<bool>>,
    #[prop_or_default]
    pub(crate) children: Children,
}

#[function_component(Modal)]
pub(crate) fn modal(props: &ModalProps) -> Html {
    let force = use_force_update();
    let cell = use_mut_ref(|| props.default_open);
    let open = dom::resolve(props.open, props.on_open_change.as_ref(), &cell, &force);
    let model = use_mut_ref(|| ModalModel::new(open.clone()));
    let switch = model.borrow_mut().sync(open);
    if let Some(switch) = switch {
        console::warn!(format!(
            "Modal switched from {:?} to {:?}; using the new mode",
            switch.from, switch.to
        ));
    }

    let revision = use_mut_ref(|| 0_u64);
    *revision.borrow_mut() += 1;
    let trigger_ref = use_node_ref();
    let surface_ref = use_node_ref();
    let pending_focus = use_mut_ref(|| None::<FocusTarget>);

    let refresh = {
        let force = force.clone();
        Callback::from(move |()| force.force_update())
    };

    let dispatch = {
        let model = model.clone();
        let force = force.clone();
        let pending_focus = pending_focus.clone();
        Callback::from(move |event: InteractionEvent| {
            let outcome = model.borrow_mut().handle(event);
            if outcome.focus.is_some() {
                *pending_focus.borrow_mut() = outcome.focus;
            }
            force.force_update();
            outcome.prevent_default
        })
    };

    let set_open = {
        let model = model.clone();
        let force = force.clone();
        let pending_focus = pending_focus.clone();
        Callback::from(move |open: bool| {
            let outcome = model.borrow_mut().set_open(open);
            if outcome.focus.is_some() {
                *pending_focus.borrow_mut() = outcome.focus;
            }
            force.force_update();
        })
    };

    {
        let model = model.clone();
        let trigger_ref = trigger_ref.clone();
        let surface_ref = surface_ref.clone();
        let pending_focus = pending_focus.clone();
        let force = force.clone();
        use_effect(move || {
            let phase = model.borrow().phase();
            if phase == Phase::Opening {
                model.borrow_mut().transition_end();
                let focusable = dom::focusable_within(&surface_ref);
                if !dom::focus_nth(&focusable, 0) && !dom::focus_node(&surface_ref) {
                    console::warn!("modal opened without a focusable surface");
                }
                force.force_update();
            }
            let restore = model.borrow_mut().take_restore_focus();
            if restore.is_some() {
                *pending_focus.borrow_mut() = restore;
            }
            let target = pending_focus.borrow_mut().take();
            if let Some(target) = target {
                dom::focus_target(target, &trigger_ref, &surface_ref);
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

    let locks_scroll = model.borrow().locks_scroll();
    use_effect_with_deps(
        |locked: &bool| {
            let locked = *locked;
            if locked {
                lock_body_scroll(true);
            }
            move || {
                if locked {
                    lock_body_scroll(false);
                }
            }
        },
        locks_scroll,
    );

    let is_open = model.borrow().is_open();
    {
        let dispatch = dispatch.clone();
        let surface_ref = surface_ref.clone();
        let trigger_ref = trigger_ref.clone();
        use_effect_with_deps(
            move |open: &bool| {
                let listener = open.then(|| {
                    EventListener::new(&gloo::utils::document(), "pointerdown", move |event| {
                        if !dom::event_within(event, &[&trigger_ref, &surface_ref]) {
                            dispatch.emit(InteractionEvent::OutsidePress);
                        }
                    })
                });
                move || drop(listener)
            },
            is_open,
        );
    }

    let context = ModalContext {
        model,
        trigger_ref,
        surface_ref,
        dispatch,
        set_open,
        refresh,
        revision: *revision.borrow(),
    };

    html! {
        <ContextProvider<ModalContext> context={context}>
            { for props.children.iter() }
        </ContextProvider<ModalContext>>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ModalTriggerProps {
    /// Custom trigger element; receives handlers and ARIA attributes.
    #[prop_or_default]
    pub(crate) render: Option<Callback<TriggerProps, Html>>,
    #[prop_or_default]
    pub(crate) class: Classes,
    #[prop_or_default]
    pub(crate) children: Children,
}

#[function_component(ModalTrigger)]
pub(crate) fn modal_trigger(props: &ModalTriggerProps) -> Html {
    let context = use_modal();
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
            classes!("modal-trigger", props.class.clone()),
            None,
            &props.children,
        ),
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ModalContentProps {
    #[prop_or_default]
    pub(crate) class: Classes,
    #[prop_or_default]
    pub(crate) children: Children,
}

#[function_component(ModalContent)]
pub(crate) fn modal_content(props: &ModalContentProps) -> Html {
    let context = use_modal();
    let (phase, attrs) = {
        let model = context.model.borrow();
        (model.phase(), model.dialog_attrs())
    };
    if !phase.is_mounted() {
        return html! {};
    }

    let onkeydown = {
        let dispatch = context.dispatch.clone();
        let surface_ref = context.surface_ref.clone();
        Callback::from(move |event: KeyboardEvent| {
            let press = dom::key_press(&event);
            if press.key == Key::Tab {
                let focusable = dom::focusable_within(&surface_ref);
                let current = dom::focused_index(&focusable);
                if let Some(TrapMove::Wrap(index)) = trap_focus(press, focusable.len(), current) {
                    event.prevent_default();
                    if !dom::focus_nth(&focusable, index) {
                        dom::focus_node(&surface_ref);
                    }
                }
                return;
            }
            if dispatch.emit(InteractionEvent::SurfaceKey(press)) {
                event.prevent_default();
            }
        })
    };
    let ontransitionend = {
        let model = context.model.clone();
        let refresh = context.refresh.clone();
        Callback::from(move |event: TransitionEvent| {
            if !dom::is_own_event(&event) {
                return;
            }
            let closing = model.borrow().phase() == Phase::Closing;
            if closing {
                model.borrow_mut().set_mounted(false);
            } else {
                model.borrow_mut().transition_end();
            }
            refresh.emit(());
        })
    };

    html! {
        <div class="modal-overlay" data-state={phase.as_str()}>
            <div
                ref={context.surface_ref.clone()}
                id={attrs.id}
                role={attrs.role}
                aria-modal={attrs.modal.to_string()}
                aria-labelledby={attrs.labelled_by}
                aria-describedby={attrs.described_by}
                tabindex="-1"
                class={classes!("modal-surface", props.class.clone())}
                style={phase.styles()}
                onkeydown={onkeydown}
                ontransitionend={ontransitionend}
            >
                { for props.children.iter() }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ModalTitleProps {
    #[prop_or_default]
    pub(crate) children: Children,
}

#[function_component(ModalTitle)]
pub(crate) fn modal_title(props: &ModalTitleProps) -> Html {
    let context = use_modal();
    let id = use_state(|| None::<String>);
    {
        let model = context.model.clone();
        let refresh = context.refresh.clone();
        let id = id.clone();
        use_effect_with_deps(
            move |_| {
                id.set(Some(model.borrow_mut().register_title()));
                refresh.emit(());
                move || model.borrow_mut().deregister_title()
            },
            (),
        );
    }
    html! { <h2 id={(*id).clone()} class="modal-title">{ for props.children.iter() }</h2> }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ModalDescriptionProps {
    #[prop_or_default]
    pub(crate) children: Children,
}

#[function_component(ModalDescription)]
pub(crate) fn modal_description(props: &ModalDescriptionProps) -> Html {
    let context = use_modal();
    let id = use_state(|| None::<String>);
    {
        let model = context.model.clone();
        let refresh = context.refresh.clone();
        let id = id.clone();
        use_effect_with_deps(
            move |_| {
                id.set(Some(model.borrow_mut().register_description()));
                refresh.emit(());
                move || model.borrow_mut().deregister_description()
            },
            (),
        );
    }
    html! { <p id={(*id).clone()} class="modal-description">{ for props.children.iter() }</p> }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ModalCloseProps {
    #[prop_or_default]
    pub(crate) class: Classes,
    #[prop_or_default]
    pub(crate) children: Children,
}

#[function_component(ModalClose)]
pub(crate) fn modal_close(props: &ModalCloseProps) -> Html {
    let context = use_modal();
    let onclick = {
        let set_open = context.set_open.clone();
        Callback::from(move |_: MouseEvent| set_open.emit(false))
    };
    html! {
        <button type="button" class={classes!("modal-close", props.class.clone())} aria-label={props.children.is_empty().then_some("Close")} onclick={onclick}>
            if props.children.is_empty() {
                { "×" }
            } else {
                { for props.children.iter() }
            }
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ModalHeaderProps {
    pub(crate) title: AttrValue,
    #[prop_or_default]
    pub(crate) description: Option<AttrValue>,
    /// Render the close affordance in the header.
    #[prop_or(true)]
    pub(crate) closable: bool,
}

#[function_component(ModalHeader)]
pub(crate) fn modal_header(props: &ModalHeaderProps) -> Html {
    html! {
        <header class="modal-header">
            <div>
                <ModalTitle>{ props.title.clone() }</ModalTitle>
                if let Some(description) = props.description.clone() {
                    <ModalDescription>{ description }</ModalDescription>
                }
            </div>
            if props.closable {
                <ModalClose />
            }
        </header>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ModalFooterProps {
    #[prop_or_default]
    pub(crate) children: Children,
}

#[function_component(ModalFooter)]
pub(crate) fn modal_footer(props: &ModalFooterProps) -> Html {
    html! { <footer class="modal-footer">{ for props.children.iter() }</footer> }
}
