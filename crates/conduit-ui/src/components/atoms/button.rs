use yew::prelude::*;

use crate::core::ui::{ButtonShape, ButtonVariant};

/// Props for variant buttons.
#[derive(Properties, PartialEq)]
pub(crate) struct ButtonProps {
    #[prop_or_default]
    pub(crate) variant: ButtonVariant,
    #[prop_or_default]
    pub(crate) shape: ButtonShape,
    /// Render as a form submit button.
    #[prop_or_default]
    pub(crate) submit: bool,
    #[prop_or_default]
    pub(crate) disabled: bool,
    /// Required for icon-only buttons.
    #[prop_or_default]
    pub(crate) aria_label: Option<AttrValue>,
    #[prop_or_default]
    pub(crate) class: Classes,
    #[prop_or_default]
    pub(crate) onclick: Callback<MouseEvent>,
    #[prop_or_default]
    pub(crate) children: Children,
}

#[function_component(Button)]
pub(crate) fn button(props: &ButtonProps) -> Html {
    let classes = classes!(
        "btn",
        props.variant.class(),
        props.shape.class(),
        props.class.clone()
    );
    html! {
        <button
            class={classes}
            type={if props.submit { "submit" } else { "button" }}
            data-variant={props.variant.as_str()}
            aria-label={props.aria_label.clone()}
            disabled={props.disabled}
            onclick={props.onclick.clone()}
        >
            { for props.children.iter() }
        </button>
    }
}
