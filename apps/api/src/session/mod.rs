//! Per-session view-state controller: the state aggregate, the actions that
//! drive it, the pure transition function and the read model served to the
//! client.

pub mod action;
pub mod controller;
pub mod handlers;
pub mod panel;
pub mod quiz;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod view;
