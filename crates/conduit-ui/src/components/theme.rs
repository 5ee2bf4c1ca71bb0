//! Theme provider and switch.
//!
//! # Design
//! - The provider resolves the stored preference against
//!   `prefers-color-scheme` and keeps following the system until the user
//!   picks a theme that differs from it.
//! - The applied theme lands on `<body data-theme>`.

use gloo::events::EventListener;
use web_sys::MediaQueryList;
use yew::prelude::*;

use crate::app::apply_theme;
use crate::app::preferences::LocalPreferences;
use crate::components::toggle::Toggle;
use crate::core::context::require_context;
use crate::core::theme::{ThemeMode, ThemeState};
use crate::core::toggle::ToggleOption;

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

fn system_query() -> Option<MediaQueryList> {
    gloo::utils::window().match_media(DARK_QUERY).ok().flatten()
}

fn system_theme() -> ThemeMode {
    if system_query().is_some_and(|query| query.matches()) {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    }
}

/// Current theme plus a way to choose another.
#[derive(Clone, PartialEq)]
pub(crate) struct ThemeContext {
    pub(crate) theme: ThemeMode,
    pub(crate) select: Callback<ThemeMode>,
}

#[derive(Properties, PartialEq)]
pub(crate) struct ThemeWrapperProps {
    #[prop_or_default]
    pub(crate) children: Children,
}

#[function_component(ThemeWrapper)]
pub(crate) fn theme_wrapper(props: &ThemeWrapperProps) -> Html {
    let force = use_force_update();
    let state = use_mut_ref(|| ThemeState::resolve(&LocalPreferences, system_theme()));
    let theme = state.borrow().theme();

    use_effect_with_deps(
        |theme: &ThemeMode| {
            apply_theme(*theme);
            || ()
        },
        theme,
    );

    {
        let state = state.clone();
        let force = force.clone();
        use_effect_with_deps(
            move |_| {
                let listener = system_query().map(|query| {
                    EventListener::new(&query, "change", move |_| {
                        state.borrow_mut().system_changed(system_theme());
                        force.force_update();
                    })
                });
                move || drop(listener)
            },
            (),
        );
    }

    let select = Callback::from(move |choice: ThemeMode| {
        state.borrow_mut().select(&LocalPreferences, choice);
        force.force_update();
    });

    html! {
        <ContextProvider<ThemeContext> context={ThemeContext { theme, select }}>
            { for props.children.iter() }
        </ContextProvider<ThemeContext>>
    }
}

#[function_component(ThemeSwitch)]
pub(crate) fn theme_switch() -> Html {
    let context = match require_context(use_context::<ThemeContext>(), "ThemeSwitch", "ThemeWrapper") {
        Ok(context) => context,
        Err(err) => panic!("{err}"),
    };
    let options = vec![
        ToggleOption::new(ThemeMode::Light.as_str(), "Light"),
        ToggleOption::new(ThemeMode::Dark.as_str(), "Dark"),
    ];
    let on_change = {
        let select = context.select;
        Callback::from(move |value: Option<String>| {
            if let Some(theme) = value.as_deref().and_then(ThemeMode::parse) {
                select.emit(theme);
            }
        })
    };
    html! {
        <Toggle
            options={options}
            value={Some(Some(context.theme.as_str().to_string()))}
            on_change={on_change}
            indicator_id="theme-indicator"
            aria_label="Theme"
            class="theme-switch"
        />
    }
}
