//! Main layout: header with navigation, theme switch, and profile menu.

use conduit_auth::ActionResponse;
use conduit_auth::model::SIGN_IN_PATH;
use gloo::console;
use yew::prelude::*;
use yew_router::prelude::use_navigator;
use yewdux::prelude::{Dispatch, use_selector};

use crate::app::api::ApiCtx;
use crate::app::navigate;
use crate::app::preferences::clear_session;
use crate::components::dom::TriggerProps;
use crate::components::dropdown::{Dropdown, DropdownItem, DropdownMenu, DropdownTrigger};
use crate::components::nav::NavBar;
use crate::components::theme::ThemeSwitch;
use crate::core::context::require_context;
use crate::core::store::AppStore;

const SIGN_OUT_ITEM: &str = "sign-out";
const PROFILE_ITEM: &str = "profile";

fn initials(email: &str) -> String {
    email
        .chars()
        .find(char::is_ascii_alphanumeric)
        .map_or_else(|| "?".to_string(), |c| c.to_ascii_uppercase().to_string())
}

fn render_avatar(email: String) -> Callback<TriggerProps, Html> {
    Callback::from(move |trigger: TriggerProps| {
        html! {
            <button
                type="button"
                ref={trigger.node_ref}
                class="avatar-trigger"
                aria-label={format!("Account menu for {email}")}
                aria-haspopup={trigger.haspopup}
                aria-expanded={trigger.expanded.to_string()}
                aria-controls={trigger.controls}
                data-state={trigger.state}
                onclick={trigger.onclick}
                onkeydown={trigger.onkeydown}
            >
                <span class="avatar">{ initials(&email) }</span>
            </button>
        }
    })
}

#[function_component(ProfileMenu)]
fn profile_menu() -> Html {
    let api = match require_context(use_context::<ApiCtx>(), "ProfileMenu", "ConduitApp") {
        Ok(api) => api,
        Err(err) => panic!("{err}"),
    };
    let navigator = use_navigator();
    let email = use_selector(|store: &AppStore| store.email().map(ToString::to_string));
    let email = (*email).clone().unwrap_or_default();

    let sign_out = Callback::from(move |()| {
        let api = api.clone();
        let navigator = navigator.clone();
        let dispatch = Dispatch::<AppStore>::new();
        let token = dispatch.get().token();
        wasm_bindgen_futures::spawn_local(async move {
            let location = match api.client.sign_out(token).await {
                Ok(ActionResponse::Redirect { location, .. }) => location,
                Ok(ActionResponse::Rejected { .. }) => SIGN_IN_PATH.to_string(),
                Err(err) => {
                    console::error!("sign-out failed", err.to_string());
                    SIGN_IN_PATH.to_string()
                }
            };
            clear_session();
            dispatch.reduce_mut(|store| store.session = None);
            navigate(navigator.as_ref(), &location);
        });
    });

    html! {
        <Dropdown class="profile-menu">
            <DropdownTrigger render={render_avatar(email.clone())} />
            <DropdownMenu>
                <DropdownItem id={PROFILE_ITEM} label={email.clone()} disabled=true>
                    <span class="profile-email">{ email }</span>
                </DropdownItem>
                <DropdownItem id={SIGN_OUT_ITEM} label="Sign out" on_select={sign_out} />
            </DropdownMenu>
        </Dropdown>
    }
}

#[function_component(Header)]
fn header() -> Html {
    html! {
        <header class="app-header">
            <span class="logo">{ "Conduit" }</span>
            <NavBar indicator_id="main-nav-indicator" />
            <div class="header-actions">
                <ThemeSwitch />
                <ProfileMenu />
            </div>
        </header>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct MainLayoutProps {
    #[prop_or_default]
    pub(crate) children: Children,
}

#[function_component(MainLayout)]
pub(crate) fn main_layout(props: &MainLayoutProps) -> Html {
    html! {
        <div class="app-layout">
            <Header />
            <main class="app-main">
                { for props.children.iter() }
            </main>
        </div>
    }
}
