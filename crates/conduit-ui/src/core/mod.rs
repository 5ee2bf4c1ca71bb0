//! Core, DOM-free primitives for the web front end.
//!
//! Everything here is plain state and pure reducers so it runs under native
//! `cargo test`; the wasm components only translate DOM events into these
//! types and render the results.
pub mod context;
pub mod control;
pub mod disclosure;
pub mod dropdown;
pub mod forms;
pub mod indicator;
pub mod interactions;
pub mod keys;
pub mod modal;
pub mod nav;
pub mod navigation;
pub mod positioning;
pub mod registry;
pub mod store;
pub mod theme;
pub mod toggle;
pub mod typeahead;
pub mod ui;
