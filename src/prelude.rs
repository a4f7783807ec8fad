//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use freezer_tracker::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{FrzError, Result};

// Inventory
pub use crate::inventory::controller::InventoryController;
pub use crate::inventory::grid::SlotGrid;
pub use crate::inventory::layout::{
    ContainerKind, FreezerConfig, Layout, LayoutPreset, SLOTS_PER_FREEZER,
};
pub use crate::inventory::persistence::{
    JsonFileRepository, LoadSource, MemoryRepository, StateRepository,
};
pub use crate::inventory::report::{format_report, percent_encode};
pub use crate::inventory::share::{ShareSink, share_link};
pub use crate::inventory::stats::{FreezerStats, Stats, aggregate};
pub use crate::inventory::store::SlotStore;

// Logging
pub use crate::logger::jsonl::{JsonlConfig, JsonlWriter};
