//! Fixed-size boolean slot grid for a single freezer.

use crate::core::errors::{FrzError, Result};
use crate::inventory::layout::{SLOTS_PER_FREEZER, Zone};

/// Full/empty state of every slot in one freezer, indexed `0..24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotGrid {
    slots: [bool; SLOTS_PER_FREEZER],
}

impl SlotGrid {
    /// All slots empty.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            slots: [false; SLOTS_PER_FREEZER],
        }
    }

    /// Build from a deserialized sequence; `None` when the length is wrong.
    #[must_use]
    pub fn from_slice(values: &[bool]) -> Option<Self> {
        let slots: [bool; SLOTS_PER_FREEZER] = values.try_into().ok()?;
        Some(Self { slots })
    }

    /// Whether the slot is full. Out-of-range indices read as empty.
    #[must_use]
    pub fn is_full(&self, slot: usize) -> bool {
        self.slots.get(slot).copied().unwrap_or(false)
    }

    /// Flip one slot and return its new state.
    pub fn toggle(&mut self, slot: usize) -> Result<bool> {
        let cell = self
            .slots
            .get_mut(slot)
            .ok_or(FrzError::SlotOutOfRange {
                index: slot,
                count: SLOTS_PER_FREEZER,
            })?;
        *cell = !*cell;
        Ok(*cell)
    }

    /// Empty every slot.
    pub fn clear(&mut self) {
        self.slots = [false; SLOTS_PER_FREEZER];
    }

    /// Number of full slots in the whole grid.
    #[must_use]
    pub fn full_count(&self) -> usize {
        self.slots.iter().filter(|full| **full).count()
    }

    /// Number of full slots inside `zone`.
    #[must_use]
    pub fn full_in(&self, zone: Zone) -> usize {
        let end = zone.end.min(SLOTS_PER_FREEZER);
        let start = zone.start.min(end);
        self.slots[start..end].iter().filter(|full| **full).count()
    }

    /// Whether no slot is full.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        !self.slots.iter().any(|full| *full)
    }

    /// Slot states in index order.
    #[must_use]
    pub const fn as_slice(&self) -> &[bool] {
        &self.slots
    }
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self::empty()
    }
}
