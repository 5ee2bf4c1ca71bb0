//! Header navigation bar with one sliding indicator under the current link.

use wasm_bindgen::JsCast;
use web_sys::Element;
use yew::prelude::*;
use yew_router::prelude::{use_location, use_navigator};

use crate::app::navigate;
use crate::components::dom;
use crate::core::indicator::indicator_styles;
use crate::core::interactions::FocusTarget;
use crate::core::nav::{NavModel, main_nav_items};

fn focused_link(event: &KeyboardEvent) -> Option<usize> {
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .and_then(|element| element.get_attribute("data-item-index"))
        .and_then(|index| index.parse().ok())
}

#[derive(Properties, PartialEq)]
pub(crate) struct NavBarProps {
    #[prop_or_default]
    pub(crate) indicator_id: Option<AttrValue>,
}

#[function_component(NavBar)]
pub(crate) fn nav_bar(props: &NavBarProps) -> Html {
    let path = use_location().map_or_else(|| "/".to_string(), |location| location.path().to_string());
    let navigator = use_navigator();
    let model = {
        let indicator_id = props.indicator_id.as_ref().map(ToString::to_string);
        let path = path.clone();
        use_mut_ref(move || NavModel::new(main_nav_items(), path, indicator_id))
    };
    model.borrow_mut().set_path(path);
    let nav_ref = use_node_ref();

    let onkeydown = {
        let model = model.clone();
        let nav_ref = nav_ref.clone();
        Callback::from(move |event: KeyboardEvent| {
            let Some(focused) = focused_link(&event) else {
                return;
            };
            let key = dom::key_press(&event).key;
            let next = model.borrow().focus_after(focused, key);
            if let Some(index) = next {
                event.prevent_default();
                dom::focus_target(FocusTarget::Item(index), &NodeRef::default(), &nav_ref);
            }
        })
    };

    let (links, indicator_id, active_index) = {
        let model = model.borrow();
        let links: Vec<_> = model
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| (item.clone(), model.is_active(index)))
            .collect();
        (links, model.indicator_id().to_string(), model.active_index())
    };
    let frame = dom::use_indicator_frame(nav_ref.clone(), active_index);
    html! {
        <nav
            ref={nav_ref}
            class="nav-bar"
            aria-label="Main"
            style="position: relative;"
            onkeydown={onkeydown}
        >
            <span id={indicator_id} class="nav-indicator" aria-hidden="true" style={indicator_styles(frame)}></span>
            { for links.into_iter().enumerate().map(|(index, (item, active))| {
                let onclick = {
                    let navigator = navigator.clone();
                    let href = item.href.clone();
                    Callback::from(move |event: MouseEvent| {
                        event.prevent_default();
                        navigate(navigator.as_ref(), &href);
                    })
                };
                html! {
                    <a
                        href={item.href}
                        class="nav-link"
                        aria-current={active.then_some("page")}
                        data-item-index={index.to_string()}
                        data-state={if active { "active" } else { "inactive" }}
                        onclick={onclick}
                    >
                        <span class="nav-label">{ item.label }</span>
                    </a>
                }
            }) }
        </nav>
    }
}
