//! Sign-in screen: credentials form, divider, and Google form.
//!
//! # Design
//! - Form state lives in the core form models; this layer copies input values
//!   in, runs the action, and renders whatever state comes back.
//! - Submit buttons are disabled while an action is in flight.

use conduit_auth::{Field, SessionGrant};
use gloo::console;
use yew::prelude::*;
use yew_router::prelude::{Navigator, use_navigator};
use yewdux::prelude::Dispatch;

use crate::app::api::ApiCtx;
use crate::app::navigate;
use crate::app::preferences::persist_session;
use crate::components::atoms::button::Button;
use crate::components::atoms::card::{Card, CardBody, CardDescription, CardHeader, CardTitle};
use crate::components::atoms::input::Input;
use crate::components::theme::ThemeSwitch;
use crate::core::context::require_context;
use crate::core::forms::{CredentialsForm, GoogleForm, SubmitOutcome, callback_url};
use crate::core::store::AppStore;
use crate::core::ui::ButtonVariant;

#[hook]
fn use_api() -> ApiCtx {
    match require_context(use_context::<ApiCtx>(), "SignInPage", "ConduitApp") {
        Ok(api) => api,
        Err(err) => panic!("{err}"),
    }
}

/// Store the issued session, then leave the form.
fn complete(outcome: SubmitOutcome, navigator: Option<&Navigator>) {
    let SubmitOutcome::Navigate { location, session } = outcome else {
        return;
    };
    if let Some(session) = session {
        store_session(session);
    }
    navigate(navigator, &location);
}

fn store_session(session: SessionGrant) {
    persist_session(&session);
    Dispatch::<AppStore>::new().reduce_mut(|store| store.session = Some(session));
}

fn error_message(message: Option<&str>) -> Html {
    message.map_or_else(
        || html! {},
        |message| html! { <p class="form-error" role="alert">{ message.to_string() }</p> },
    )
}

#[derive(Properties, PartialEq)]
struct FormProps {
    redirect_to: AttrValue,
}

#[function_component(CredentialsSignIn)]
fn credentials_sign_in(props: &FormProps) -> Html {
    let api = use_api();
    let navigator = use_navigator();
    let force = use_force_update();
    let form = {
        let redirect_to = props.redirect_to.to_string();
        use_mut_ref(move || CredentialsForm::new(redirect_to))
    };

    let set_field = |apply: fn(&mut CredentialsForm, String)| {
        let form = form.clone();
        let force = force.clone();
        Callback::from(move |value: String| {
            apply(&mut form.borrow_mut(), value);
            force.force_update();
        })
    };
    let on_email = set_field(|form, value| form.email = value);
    let on_password = set_field(|form, value| form.password = value);

    let onsubmit = {
        let form = form.clone();
        let force = force.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let request = form.borrow_mut().begin_submit();
            force.force_update();
            let Some(request) = request else {
                return;
            };
            let api = api.clone();
            let form = form.clone();
            let force = force.clone();
            let navigator = navigator.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = match api.client.sign_in_with_credentials(&request).await {
                    Ok(response) => form.borrow_mut().finish(response),
                    Err(err) => {
                        console::error!("credentials sign-in failed", err.to_string());
                        form.borrow_mut().fail();
                        SubmitOutcome::Stay
                    }
                };
                force.force_update();
                complete(outcome, navigator.as_ref());
            });
        })
    };

    let form = form.borrow().clone();
    let pending = form.is_pending();
    html! {
        <form class="sign-in-form" onsubmit={onsubmit} novalidate=true>
            <Input
                name="email"
                label="Email"
                kind="email"
                autocomplete="email"
                value={form.email.clone()}
                errors={form.errors(Field::Email).to_vec()}
                disabled={pending}
                oninput={on_email}
            />
            <Input
                name="password"
                label="Password"
                kind="password"
                autocomplete="current-password"
                value={form.password.clone()}
                errors={form.errors(Field::Password).to_vec()}
                disabled={pending}
                oninput={on_password}
            />
            { for form.errors(Field::RedirectTo).iter().map(|message| html! {
                <p class="form-error" role="alert">{ message.clone() }</p>
            }) }
            <Button variant={ButtonVariant::Indigo} submit=true disabled={pending}>
                { if pending { "Signing in..." } else { "Sign in" } }
            </Button>
            { error_message(form.state().error.as_deref()) }
        </form>
    }
}

#[function_component(GoogleSignIn)]
fn google_sign_in(props: &FormProps) -> Html {
    let api = use_api();
    let navigator = use_navigator();
    let force = use_force_update();
    let form = {
        let redirect_to = props.redirect_to.to_string();
        use_mut_ref(move || GoogleForm::new(redirect_to))
    };

    let onsubmit = {
        let form = form.clone();
        let force = force.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let request = form.borrow_mut().begin_submit();
            let Some(request) = request else {
                return;
            };
            force.force_update();
            let api = api.clone();
            let form = form.clone();
            let force = force.clone();
            let navigator = navigator.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = match api.client.sign_in_with_google(&request).await {
                    Ok(response) => form.borrow_mut().finish(response),
                    Err(err) => {
                        console::error!("google sign-in failed", err.to_string());
                        form.borrow_mut().fail();
                        SubmitOutcome::Stay
                    }
                };
                force.force_update();
                complete(outcome, navigator.as_ref());
            });
        })
    };

    let (pending, error) = {
        let form = form.borrow();
        (form.is_pending(), form.state().error.clone())
    };
    html! {
        <form class="sign-in-form" onsubmit={onsubmit}>
            <Button variant={ButtonVariant::ZincOutline} submit=true disabled={pending}>
                { "Continue with Google" }
            </Button>
            { error_message(error.as_deref()) }
        </form>
    }
}

#[function_component(SignInPage)]
pub(crate) fn sign_in_page() -> Html {
    let redirect_to = use_memo(
        |_| {
            let query = gloo::utils::window().location().search().unwrap_or_default();
            AttrValue::from(callback_url(&query))
        },
        (),
    );
    html! {
        <main class="sign-in-page">
            <div class="sign-in-toolbar">
                <ThemeSwitch />
            </div>
            <Card class="sign-in-card">
                <CardHeader>
                    <CardTitle>{ "Sign in" }</CardTitle>
                    <CardDescription>{ "Use your work email or Google account." }</CardDescription>
                </CardHeader>
                <CardBody>
                    <CredentialsSignIn redirect_to={(*redirect_to).clone()} />
                    <div class="divider" role="separator"><span>{ "OR" }</span></div>
                    <GoogleSignIn redirect_to={(*redirect_to).clone()} />
                </CardBody>
            </Card>
        </main>
    }
}
