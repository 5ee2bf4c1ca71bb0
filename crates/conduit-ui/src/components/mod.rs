//! Yew components rendering the core models.

pub(crate) mod atoms;
pub(crate) mod dom;
pub(crate) mod dropdown;
pub(crate) mod modal;
pub(crate) mod nav;
pub(crate) mod pages;
pub(crate) mod shell;
pub(crate) mod sign_in;
pub(crate) mod theme;
pub(crate) mod toggle;
