//! Dashboard pages rendered inside the main layout.

use yew::prelude::*;
use yew_router::prelude::Link;

use crate::app::routes::Route;
use crate::components::atoms::button::Button;
use crate::components::atoms::card::{
    Card, CardContent, CardDescription, CardFooter, CardHeader, CardTitle,
};
use crate::components::modal::{Modal, ModalClose, ModalContent, ModalFooter, ModalHeader, ModalTrigger};
use crate::components::toggle::Toggle;
use crate::core::toggle::ToggleOption;
use crate::core::ui::ButtonVariant;

fn range_options() -> Vec<ToggleOption> {
    vec![
        ToggleOption::new("24h", "24 hours"),
        ToggleOption::new("7d", "7 days"),
        ToggleOption::new("30d", "30 days"),
        ToggleOption::new("12m", "12 months").disabled(true),
    ]
}

#[function_component(ShareReport)]
fn share_report() -> Html {
    html! {
        <Modal>
            <ModalTrigger class="btn btn-zinc-outline">{ "Share report" }</ModalTrigger>
            <ModalContent>
                <ModalHeader
                    title="Share report"
                    description="Anyone with the link can view this report."
                />
                <p class="share-link">{ "https://conduit.example/reports/overview" }</p>
                <ModalFooter>
                    <ModalClose class="btn btn-zinc-outline">{ "Cancel" }</ModalClose>
                    <ModalClose class="btn btn-indigo">{ "Copy link" }</ModalClose>
                </ModalFooter>
            </ModalContent>
        </Modal>
    }
}

#[function_component(OverviewPage)]
fn overview_page() -> Html {
    let range = use_state(|| Some("7d".to_string()));
    let on_range = {
        let range = range.clone();
        Callback::from(move |value: Option<String>| range.set(value))
    };
    let label = range
        .as_deref()
        .and_then(|value| {
            range_options()
                .into_iter()
                .find(|option| option.value == value)
        })
        .map_or_else(String::new, |option| option.label);
    html! {
        <section class="page overview">
            <div class="page-toolbar">
                <h1>{ "Overview" }</h1>
                <Toggle
                    options={range_options()}
                    default_value={(*range).clone()}
                    on_change={on_range}
                    aria_label="Range"
                />
                <ShareReport />
            </div>
            <Card>
                <CardHeader>
                    <CardTitle>{ "Traffic" }</CardTitle>
                    <CardDescription>{ format!("Sessions over the last {label}") }</CardDescription>
                </CardHeader>
                <CardContent>
                    <p class="metric">{ "12,480" }</p>
                </CardContent>
                <CardFooter>
                    <Link<Route> to={Route::Reports}>{ "Open reports" }</Link<Route>>
                </CardFooter>
            </Card>
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct SectionProps {
    title: AttrValue,
    description: AttrValue,
}

#[function_component(SectionPage)]
fn section_page(props: &SectionProps) -> Html {
    html! {
        <section class="page">
            <h1>{ props.title.clone() }</h1>
            <Card>
                <CardHeader>
                    <CardTitle>{ props.title.clone() }</CardTitle>
                    <CardDescription>{ props.description.clone() }</CardDescription>
                </CardHeader>
                <CardContent>
                    <p class="empty-state">{ "No data for this period yet." }</p>
                </CardContent>
            </Card>
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct PageProps {
    pub(crate) route: Route,
}

#[function_component(Page)]
pub(crate) fn page(props: &PageProps) -> Html {
    match props.route {
        Route::Overview => html! { <OverviewPage /> },
        Route::Insights => html! {
            <SectionPage title="Insights" description="Trends surfaced from recent activity." />
        },
        Route::Analytics => html! {
            <SectionPage title="Analytics" description="Sessions, conversions, and retention." />
        },
        Route::Audience => html! {
            <SectionPage title="Audience" description="Who visits and where they come from." />
        },
        Route::Reports => html! {
            <SectionPage title="Reports" description="Scheduled and shared reports." />
        },
        Route::SignIn | Route::NotFound => html! { <NotFoundPage /> },
    }
}

#[function_component(NotFoundPage)]
pub(crate) fn not_found_page() -> Html {
    html! {
        <section class="page not-found">
            <h1>{ "Not found" }</h1>
            <p>{ "Use the navigation to return to a supported view." }</p>
            <Button variant={ButtonVariant::Zinc}>
                <Link<Route> to={Route::Overview}>{ "Back to overview" }</Link<Route>>
            </Button>
        </section>
    }
}
