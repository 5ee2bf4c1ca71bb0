use yew::prelude::*;

/// Props for labelled inputs with field errors.
#[derive(Properties, PartialEq)]
pub(crate) struct InputProps {
    pub(crate) name: AttrValue,
    pub(crate) label: AttrValue,
    /// Input `type`, `text` by default.
    #[prop_or(AttrValue::Static("text"))]
    pub(crate) kind: AttrValue,
    #[prop_or_default]
    pub(crate) value: AttrValue,
    #[prop_or_default]
    pub(crate) placeholder: Option<AttrValue>,
    #[prop_or_default]
    pub(crate) autocomplete: Option<AttrValue>,
    /// Messages shown under the field; any message marks it invalid.
    #[prop_or_default]
    pub(crate) errors: Vec<String>,
    #[prop_or_default]
    pub(crate) disabled: bool,
    #[prop_or_default]
    pub(crate) oninput: Callback<String>,
}

#[function_component(Input)]
pub(crate) fn input(props: &InputProps) -> Html {
    let invalid = !props.errors.is_empty();
    let id = format!("field-{}", props.name);
    let error_id = format!("{id}-errors");
    let oninput = {
        let oninput = props.oninput.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<web_sys::HtmlInputElement>() {
                oninput.emit(input.value());
            }
        })
    };
    html! {
        <div class="field" data-invalid={invalid.then_some("true")}>
            <label class="field-label" for={id.clone()}>{ props.label.clone() }</label>
            <input
                id={id}
                class="field-input"
                name={props.name.clone()}
                type={props.kind.clone()}
                value={props.value.clone()}
                placeholder={props.placeholder.clone()}
                autocomplete={props.autocomplete.clone()}
                disabled={props.disabled}
                aria-invalid={invalid.to_string()}
                aria-describedby={invalid.then(|| error_id.clone())}
                oninput={oninput}
            />
            if invalid {
                <ul id={error_id} class="field-errors" role="alert">
                    { for props.errors.iter().map(|message| html! { <li>{ message.clone() }</li> }) }
                </ul>
            }
        </div>
    }
}
