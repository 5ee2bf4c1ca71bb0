//! Segmented toggle group.
//!
//! # Design
//! - One [`ToggleGroup`] per mount; options are fixed for the lifetime of the
//!   instance.
//! - A single indicator element sits beside the options and is moved over the
//!   selected one, so its id and DOM node survive every selection.

use gloo::console;
use yew::prelude::*;

use crate::components::dom;
use crate::core::control::ModeTracker;
use crate::core::indicator::indicator_styles;
use crate::core::interactions::FocusTarget;
use crate::core::toggle::{ToggleGroup, ToggleOption};

#[derive(Properties, PartialEq)]
pub(crate) struct ToggleProps {
    pub(crate) options: Vec<ToggleOption>,
    /// Controlled selection; `Some(None)` means controlled with nothing selected.
    #[prop_or_default]
    pub(crate) value: Option<Option<String>>,
    #[prop_or_default]
    pub(crate) default_value: Option<String>,
    #[prop_or_default]
    pub(crate) on_change: Option<Callback<Option<String>>>,
    #[prop_or_default]
    pub(crate) indicator_id: Option<AttrValue>,
    #[prop_or_default]
    pub(crate) aria_label: Option<AttrValue>,
    #[prop_or_default]
    pub(crate) class: Classes,
}

#[function_component(Toggle)]
pub(crate) fn toggle(props: &ToggleProps) -> Html {
    let force = use_force_update();
    let cell = use_mut_ref(|| props.default_value.clone());
    let value = dom::resolve(props.value.clone(), props.on_change.as_ref(), &cell, &force);
    let modes = use_mut_ref(ModeTracker::default);
    let switch = modes.borrow_mut().observe(value.mode());
    if let Some(switch) = switch {
        console::warn!(format!(
            "Toggle switched from {:?} to {:?}; using the new mode",
            switch.from, switch.to
        ));
    }
    let group = {
        let options = props.options.clone();
        let indicator_id = props.indicator_id.as_ref().map(ToString::to_string);
        let value = value.clone();
        use_mut_ref(move || ToggleGroup::new(options, value, indicator_id))
    };
    group.borrow_mut().sync(value);
    let group_ref = use_node_ref();

    let onkeydown = {
        let group = group.clone();
        let group_ref = group_ref.clone();
        Callback::from(move |event: KeyboardEvent| {
            let key = dom::key_press(&event).key;
            let moved = group.borrow().key(key);
            if let Some(index) = moved {
                event.prevent_default();
                dom::focus_target(FocusTarget::Item(index), &NodeRef::default(), &group_ref);
            }
        })
    };

    let (options, indicator_id, selected, selected_index) = {
        let group = group.borrow();
        (
            group.options().to_vec(),
            group.indicator_id().to_string(),
            group.value(),
            group.selected_index(),
        )
    };
    let frame = dom::use_indicator_frame(group_ref.clone(), selected_index);
    let tab_stop = selected_index.or_else(|| options.iter().position(|option| !option.disabled));

    html! {
        <div
            ref={group_ref}
            role="radiogroup"
            aria-label={props.aria_label.clone()}
            class={classes!("toggle-group", props.class.clone())}
            style="position: relative;"
            onkeydown={onkeydown}
        >
            <span
                id={indicator_id}
                class="toggle-indicator"
                aria-hidden="true"
                data-state={if selected_index.is_some() { "on" } else { "off" }}
                style={indicator_styles(frame)}
            ></span>
            { for options.into_iter().enumerate().map(|(index, option)| {
                let checked = selected.as_deref() == Some(option.value.as_str());
                let onclick = {
                    let group = group.clone();
                    let value = option.value.clone();
                    Callback::from(move |_: MouseEvent| {
                        group.borrow().select(&value);
                    })
                };
                html! {
                    <button
                        type="button"
                        role="radio"
                        aria-checked={checked.to_string()}
                        tabindex={if tab_stop == Some(index) { "0" } else { "-1" }}
                        disabled={option.disabled}
                        data-item-index={index.to_string()}
                        data-state={if checked { "on" } else { "off" }}
                        class="toggle-option"
                        onclick={onclick}
                    >
                        <span class="toggle-label">{ option.label }</span>
                    </button>
                }
            }) }
        </div>
    }
}
