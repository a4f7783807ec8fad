#![forbid(unsafe_code)]

//! Freezer Tracker (frz): slot-level inventory for a set of freezers.
//!
//! Each freezer is a fixed grid of 24 slots holding pots ("Potes"), boxes
//! ("Caixas"), or both split by zone. The library keeps the occupancy state,
//! persists it between sessions, aggregates statistics, and formats the
//! Portuguese stock report used for sharing.
//!
//! # Library usage
//!
//! ```rust,no_run
//! use freezer_tracker::prelude::*;
//!
//! let layout = Layout::preset(LayoutPreset::Named);
//! let mut inventory = InventoryController::open(layout, MemoryRepository::new());
//! inventory.toggle(12, 0).unwrap();
//! println!("{}", inventory.report());
//! ```

pub mod prelude;

pub mod core;
pub mod inventory;
pub mod logger;
#[cfg(feature = "tui")]
pub mod tui;
