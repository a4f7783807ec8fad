//! In-memory slot state for every freezer in the layout.
//!
//! [`SlotStore`] is pure data: no I/O happens here. Persistence lives in
//! [`crate::inventory::persistence`] and is driven by the controller.

#![allow(missing_docs)]

use crate::core::errors::{FrzError, Result};
use crate::inventory::grid::SlotGrid;
use crate::inventory::layout::Layout;

/// One [`SlotGrid`] per layout entry, same order and length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotStore {
    grids: Vec<SlotGrid>,
}

impl SlotStore {
    /// All-empty store shaped for `layout`.
    #[must_use]
    pub fn empty_for(layout: &Layout) -> Self {
        Self::with_len(layout.len())
    }

    #[must_use]
    pub fn with_len(freezers: usize) -> Self {
        Self {
            grids: vec![SlotGrid::empty(); freezers],
        }
    }

    /// Wrap pre-built grids. Callers must ensure the count matches the layout.
    #[must_use]
    pub fn from_grids(grids: Vec<SlotGrid>) -> Self {
        Self { grids }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.grids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// Whether this store has one grid per entry of `layout`.
    #[must_use]
    pub fn matches(&self, layout: &Layout) -> bool {
        self.grids.len() == layout.len()
    }

    pub fn grid(&self, freezer: usize) -> Result<&SlotGrid> {
        self.grids.get(freezer).ok_or(FrzError::FreezerOutOfRange {
            index: freezer,
            count: self.grids.len(),
        })
    }

    pub fn grids(&self) -> impl Iterator<Item = &SlotGrid> {
        self.grids.iter()
    }

    /// Flip one slot; returns the new state. Rejects out-of-range coordinates.
    pub fn toggle(&mut self, freezer: usize, slot: usize) -> Result<bool> {
        self.grid_mut(freezer)?.toggle(slot)
    }

    /// Empty every slot of one freezer.
    pub fn clear(&mut self, freezer: usize) -> Result<()> {
        self.grid_mut(freezer)?.clear();
        Ok(())
    }

    /// Empty every slot of every freezer.
    pub fn reset_all(&mut self) {
        for grid in &mut self.grids {
            grid.clear();
        }
    }

    fn grid_mut(&mut self, freezer: usize) -> Result<&mut SlotGrid> {
        let count = self.grids.len();
        self.grids
            .get_mut(freezer)
            .ok_or(FrzError::FreezerOutOfRange {
                index: freezer,
                count,
            })
    }
}
