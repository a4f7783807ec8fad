//! Freezer inventory: configuration table, slot state, aggregation, reporting.

pub mod controller;
pub mod grid;
pub mod layout;
pub mod persistence;
pub mod report;
pub mod share;
pub mod stats;
pub mod store;
