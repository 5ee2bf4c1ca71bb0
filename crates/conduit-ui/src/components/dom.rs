//! DOM glue shared by the disclosure components.
//!
//! # Design
//! - Translate browser events into core types and nothing more; decisions stay
//!   in `core`.
//! - Focus and measurement helpers swallow DOM failures: a missing node means
//!   the surface is not mounted yet.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement, Node};
use yew::prelude::*;

use crate::core::control::{ChangeHandler, Controllable};
use crate::core::indicator::IndicatorFrame;
use crate::core::interactions::{FocusTarget, InteractionEvent};
use crate::core::keys::{Key, KeyPress};
use crate::core::positioning::{Rect, Size};

/// Props handed to a custom trigger renderer.
#[derive(Clone, PartialEq)]
pub(crate) struct TriggerProps {
    pub(crate) node_ref: NodeRef,
    pub(crate) onclick: Callback<MouseEvent>,
    pub(crate) onkeydown: Callback<KeyboardEvent>,
    pub(crate) haspopup: &'static str,
    pub(crate) expanded: bool,
    pub(crate) controls: Option<AttrValue>,
    pub(crate) state: &'static str,
}

impl TriggerProps {
    /// Default `<button>` rendering of a trigger.
    pub(crate) fn button(self, class: Classes, aria_label: Option<AttrValue>, children: &Children) -> Html {
        html! {
            <button
                type="button"
                ref={self.node_ref}
                class={class}
                aria-label={aria_label}
                aria-haspopup={self.haspopup}
                aria-expanded={self.expanded.to_string()}
                aria-controls={self.controls}
                data-state={self.state}
                onclick={self.onclick}
                onkeydown={self.onkeydown}
            >
                { for children.iter() }
            </button>
        }
    }
}

/// Resolve a value for this render from an optional controlled prop.
pub(crate) fn resolve<T: Clone + 'static>(
    external: Option<T>,
    on_change: Option<&Callback<T>>,
    cell: &Rc<RefCell<T>>,
    force: &UseForceUpdateHandle,
) -> Controllable<T> {
    let on_change = on_change.map(|callback| {
        let callback = callback.clone();
        Rc::new(move |value: T| callback.emit(value)) as ChangeHandler<T>
    });
    let force = force.clone();
    Controllable::resolve(
        external,
        on_change,
        cell,
        Some(Rc::new(move || force.force_update())),
    )
}

/// Milliseconds since the epoch.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn now_ms() -> u64 {
    js_sys::Date::now().max(0.0) as u64
}

/// Normalise a keyboard event.
pub(crate) fn key_press(event: &KeyboardEvent) -> KeyPress {
    KeyPress {
        key: Key::from_dom(&event.key()),
        shift: event.shift_key(),
        modified: event.ctrl_key() || event.meta_key() || event.alt_key(),
    }
}

/// Forward key presses to a dispatcher, preventing default when asked.
pub(crate) fn key_handler(
    dispatch: Callback<InteractionEvent, bool>,
    wrap: fn(KeyPress) -> InteractionEvent,
) -> Callback<KeyboardEvent> {
    Callback::from(move |event: KeyboardEvent| {
        let press = key_press(&event);
        if press.key == Key::Other {
            return;
        }
        if dispatch.emit(wrap(press)) {
            event.prevent_default();
        }
    })
}

/// Whether `event` targets a node inside any of `refs`.
pub(crate) fn event_within(event: &Event, refs: &[&NodeRef]) -> bool {
    let Some(target) = event.target().and_then(|target| target.dyn_into::<Node>().ok()) else {
        return false;
    };
    refs.iter()
        .filter_map(|node_ref| node_ref.get())
        .any(|node| node.contains(Some(&target)))
}

/// Whether `event` fired on the element the listener is attached to.
pub(crate) fn is_own_event(event: &Event) -> bool {
    match (event.target(), event.current_target()) {
        (Some(target), Some(current)) => JsValue::from(target) == JsValue::from(current),
        _ => false,
    }
}

fn focus_element(element: Option<Element>) -> bool {
    element
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        .is_some_and(|element| element.focus().is_ok())
}

/// Focus the element behind `node`. Returns whether focus moved.
pub(crate) fn focus_node(node: &NodeRef) -> bool {
    focus_element(node.cast::<Element>())
}

/// Focus the element at `index` among `elements`. Returns whether focus moved.
pub(crate) fn focus_nth(elements: &[HtmlElement], index: usize) -> bool {
    elements
        .get(index)
        .is_some_and(|element| element.focus().is_ok())
}

/// Move focus for a binder effect. Returns whether the target existed.
pub(crate) fn focus_target(target: FocusTarget, trigger: &NodeRef, surface: &NodeRef) -> bool {
    match target {
        FocusTarget::Trigger => focus_element(trigger.cast::<Element>()),
        FocusTarget::Item(index) => focus_element(
            surface
                .cast::<Element>()
                .and_then(|surface| {
                    surface
                        .query_selector(&format!("[data-item-index=\"{index}\"]"))
                        .ok()
                        .flatten()
                }),
        ),
    }
}

/// Focusable descendants of `container`, in document order.
pub(crate) fn focusable_within(container: &NodeRef) -> Vec<HtmlElement> {
    const FOCUSABLE: &str = "a[href], button:not([disabled]), input:not([disabled]), \
        select:not([disabled]), textarea:not([disabled]), [tabindex]:not([tabindex=\"-1\"])";
    let Some(container) = container.cast::<Element>() else {
        return Vec::new();
    };
    let Ok(nodes) = container.query_selector_all(FOCUSABLE) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

/// Index of the focused element among `elements`.
pub(crate) fn focused_index(elements: &[HtmlElement]) -> Option<usize> {
    let active = gloo::utils::document().active_element()?;
    elements
        .iter()
        .position(|element| element.is_same_node(Some(&*active)))
}

#[allow(clippy::cast_possible_truncation)]
fn px(value: f64) -> i32 {
    value.round() as i32
}

fn rect_of(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect {
        x: px(rect.x()),
        y: px(rect.y()),
        width: px(rect.width()),
        height: px(rect.height()),
    }
}

/// Measure a reference element, a floating element, and the viewport.
pub(crate) fn measure(reference: &NodeRef, floating: &NodeRef) -> Option<(Rect, Size, Size)> {
    let reference = rect_of(&reference.cast::<Element>()?);
    let floating = rect_of(&floating.cast::<Element>()?);
    let window = gloo::utils::window();
    let viewport = Size {
        width: px(window.inner_width().ok()?.as_f64()?),
        height: px(window.inner_height().ok()?.as_f64()?),
    };
    Some((
        reference,
        Size {
            width: floating.width,
            height: floating.height,
        },
        viewport,
    ))
}

/// Frame of the item at `index` relative to `container`.
fn measure_item(container: &NodeRef, index: usize) -> Option<IndicatorFrame> {
    let container = container.cast::<Element>()?;
    let item = container
        .query_selector(&format!("[data-item-index=\"{index}\"]"))
        .ok()
        .flatten()?;
    Some(IndicatorFrame::within(rect_of(&container), rect_of(&item)))
}

/// Keep a group's single indicator over the selected item, re-measuring after
/// every render and on window resize.
#[hook]
pub(crate) fn use_indicator_frame(container: NodeRef, selected: Option<usize>) -> Option<IndicatorFrame> {
    let force = use_force_update();
    let frame = use_mut_ref(|| None::<IndicatorFrame>);
    {
        let frame = frame.clone();
        let force = force.clone();
        use_effect(move || {
            let next = selected.and_then(|index| measure_item(&container, index));
            if *frame.borrow() != next {
                *frame.borrow_mut() = next;
                force.force_update();
            }
            || ()
        });
    }
    use_effect_with_deps(
        move |_| {
            let listener = EventListener::new(&gloo::utils::window(), "resize", move |_| {
                force.force_update();
            });
            move || drop(listener)
        },
        (),
    );
    *frame.borrow()
}
