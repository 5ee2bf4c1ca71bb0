//! Routing definitions for the Conduit UI.
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq, Eq, Debug)]
pub(crate) enum Route {
    #[at("/")]
    Overview,
    #[at("/insights")]
    Insights,
    #[at("/analytics")]
    Analytics,
    #[at("/audience")]
    Audience,
    #[at("/reports")]
    Reports,
    #[at("/sign-in")]
    SignIn,
    #[not_found]
    #[at("/404")]
    NotFound,
}
