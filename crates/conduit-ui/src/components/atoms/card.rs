//! Card layout parts. Each part is a styled container.

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct CardPartProps {
    #[prop_or_default]
    pub(crate) class: Classes,
    #[prop_or_default]
    pub(crate) children: Children,
}

#[function_component(Card)]
pub(crate) fn card(props: &CardPartProps) -> Html {
    html! { <section class={classes!("card", props.class.clone())}>{ for props.children.iter() }</section> }
}

#[function_component(CardHeader)]
pub(crate) fn card_header(props: &CardPartProps) -> Html {
    html! { <header class={classes!("card-header", props.class.clone())}>{ for props.children.iter() }</header> }
}

#[function_component(CardTitle)]
pub(crate) fn card_title(props: &CardPartProps) -> Html {
    html! { <h3 class={classes!("card-title", props.class.clone())}>{ for props.children.iter() }</h3> }
}

#[function_component(CardDescription)]
pub(crate) fn card_description(props: &CardPartProps) -> Html {
    html! { <p class={classes!("card-description", props.class.clone())}>{ for props.children.iter() }</p> }
}

#[function_component(CardBody)]
pub(crate) fn card_body(props: &CardPartProps) -> Html {
    html! { <div class={classes!("card-body", props.class.clone())}>{ for props.children.iter() }</div> }
}

#[function_component(CardContent)]
pub(crate) fn card_content(props: &CardPartProps) -> Html {
    html! { <div class={classes!("card-content", props.class.clone())}>{ for props.children.iter() }</div> }
}

#[function_component(CardFooter)]
pub(crate) fn card_footer(props: &CardPartProps) -> Html {
    html! { <footer class={classes!("card-footer", props.class.clone())}>{ for props.children.iter() }</footer> }
}
