//! Interactive freezer dashboard.
//!
//! Elm-style split: `model` holds view state, `input` maps keys to actions,
//! `update` is the pure reducer, `render` builds a styled frame, and
//! `runtime` owns the terminal and executes commands against the inventory.

#![allow(missing_docs)]

pub mod haptics;
pub mod input;
pub mod model;
pub mod render;
pub mod runtime;
pub mod terminal_guard;
pub mod update;

#[cfg(test)]
mod test_properties;

pub use runtime::{DashboardRuntimeConfig, run_dashboard};
