//! App shell: router, providers, and boot.
//!
//! # Design
//! - One action client and one theme provider per boot, shared via context.
//! - The persisted session seeds the store before the first render so guarded
//!   routes do not flash the sign-in screen.

pub(crate) mod api;
pub(crate) mod preferences;
pub(crate) mod routes;

use gloo::console;
use gloo::utils::window;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

use crate::components::pages::{NotFoundPage, Page};
use crate::components::shell::MainLayout;
use crate::components::sign_in::SignInPage;
use crate::components::theme::ThemeWrapper;
use crate::core::store::AppStore;
use crate::core::theme::ThemeMode;
use api::ApiCtx;
use preferences::load_session;
use routes::Route;

/// Set `data-theme` on `<body>`.
pub(crate) fn apply_theme(theme: ThemeMode) {
    let Some(body) = window().document().and_then(|document| document.body()) else {
        return;
    };
    if let Err(err) = body.set_attribute("data-theme", theme.as_str()) {
        console::error!("failed to apply theme", format!("{err:?}"));
    }
}

/// Go to `location`: in-app routes through the router, anything else through
/// the browser.
pub(crate) fn navigate(navigator: Option<&Navigator>, location: &str) {
    let route = if location.starts_with('/') {
        Route::recognize(location)
    } else {
        None
    };
    match (navigator, route) {
        (Some(navigator), Some(route)) => navigator.push(&route),
        _ => {
            if let Err(err) = window().location().set_href(location) {
                console::error!("navigation failed", location, format!("{err:?}"));
            }
        }
    }
}

#[derive(Properties, PartialEq)]
struct RequireSessionProps {
    #[prop_or_default]
    children: Children,
}

#[function_component(RequireSession)]
fn require_session(props: &RequireSessionProps) -> Html {
    let signed_in = use_selector(AppStore::is_signed_in);
    if *signed_in {
        html! { <>{ for props.children.iter() }</> }
    } else {
        html! { <Redirect<Route> to={Route::SignIn} /> }
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::SignIn => html! { <SignInPage /> },
        Route::NotFound => html! { <NotFoundPage /> },
        page => html! {
            <RequireSession>
                <MainLayout>
                    <Page route={page} />
                </MainLayout>
            </RequireSession>
        },
    }
}

#[function_component(ConduitApp)]
fn conduit_app() -> Html {
    let api = use_memo(|_| ApiCtx::new(""), ());
    html! {
        <ContextProvider<ApiCtx> context={(*api).clone()}>
            <ThemeWrapper>
                <BrowserRouter>
                    <Switch<Route> render={switch} />
                </BrowserRouter>
            </ThemeWrapper>
        </ContextProvider<ApiCtx>>
    }
}

/// Entry point for wasm32 builds.
pub fn run_app() {
    console_error_panic_hook::set_once();
    Dispatch::<AppStore>::new().set(AppStore {
        session: load_session(),
    });
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<ConduitApp>::with_root(root).render();
    } else {
        yew::Renderer::<ConduitApp>::new().render();
    }
}
