//! Full/empty aggregates by container type.
//!
//! Recomputed from the store on every call; at 13 x 24 slots there is nothing
//! worth caching.

#![allow(missing_docs)]

use std::ops::AddAssign;

use serde::Serialize;

use crate::inventory::grid::SlotGrid;
use crate::inventory::layout::{ContainerKind, FreezerConfig, Layout, SLOTS_PER_FREEZER};
use crate::inventory::store::SlotStore;

/// Full/empty counts attributed to one freezer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FreezerStats {
    pub pote_full: usize,
    pub pote_empty: usize,
    pub caixa_full: usize,
    pub caixa_empty: usize,
}

impl FreezerStats {
    /// Account one grid according to its container kind.
    #[must_use]
    pub fn of(kind: ContainerKind, grid: &SlotGrid) -> Self {
        match kind {
            ContainerKind::Pote => {
                let full = grid.full_count();
                Self {
                    pote_full: full,
                    pote_empty: SLOTS_PER_FREEZER - full,
                    ..Self::default()
                }
            }
            ContainerKind::Caixa => {
                let full = grid.full_count();
                Self {
                    caixa_full: full,
                    caixa_empty: SLOTS_PER_FREEZER - full,
                    ..Self::default()
                }
            }
            ContainerKind::Split { pote, caixa } => {
                let pote_full = grid.full_in(pote);
                let caixa_full = grid.full_in(caixa);
                Self {
                    pote_full,
                    pote_empty: pote.len() - pote_full,
                    caixa_full,
                    caixa_empty: caixa.len() - caixa_full,
                }
            }
        }
    }

    #[must_use]
    pub const fn full(&self) -> usize {
        self.pote_full + self.caixa_full
    }
}

/// Inventory-wide aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub potes_cheios: usize,
    pub potes_vazios: usize,
    pub caixas_cheias: usize,
    pub caixas_vazias: usize,
}

impl AddAssign<FreezerStats> for Stats {
    fn add_assign(&mut self, rhs: FreezerStats) {
        self.potes_cheios += rhs.pote_full;
        self.potes_vazios += rhs.pote_empty;
        self.caixas_cheias += rhs.caixa_full;
        self.caixas_vazias += rhs.caixa_empty;
    }
}

/// Per-freezer breakdown, in layout order.
pub fn per_freezer<'a>(
    layout: &'a Layout,
    store: &'a SlotStore,
) -> impl Iterator<Item = (&'a FreezerConfig, FreezerStats)> + 'a {
    layout
        .iter()
        .zip(store.grids())
        .map(|(config, grid)| (config, FreezerStats::of(config.kind, grid)))
}

/// Fold every freezer into one [`Stats`].
#[must_use]
pub fn aggregate(layout: &Layout, store: &SlotStore) -> Stats {
    per_freezer(layout, store).fold(Stats::default(), |mut acc, (_, stats)| {
        acc += stats;
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::layout::{LayoutPreset, Zone};
    use proptest::prelude::*;

    #[test]
    fn fresh_store_is_all_empty() {
        let layout = Layout::preset(LayoutPreset::Named);
        let stats = aggregate(&layout, &SlotStore::empty_for(&layout));
        // 1 box freezer + half of HK/Festa; 11 pot freezers + the other half.
        assert_eq!(
            stats,
            Stats {
                potes_cheios: 0,
                potes_vazios: 11 * 24 + 12,
                caixas_cheias: 0,
                caixas_vazias: 24 + 12,
            }
        );
    }

    #[test]
    fn toggling_box_freezer_counts_as_box() {
        let layout = Layout::preset(LayoutPreset::Named);
        let mut store = SlotStore::empty_for(&layout);
        store.toggle(0, 0).unwrap();
        let stats = aggregate(&layout, &store);
        assert_eq!(stats.caixas_cheias, 1);
        assert_eq!(stats.caixas_vazias, 23 + 12);
        assert_eq!(stats.potes_cheios, 0);
    }

    #[test]
    fn split_freezer_accounts_each_zone() {
        let layout = Layout::preset(LayoutPreset::Named);
        let mut store = SlotStore::empty_for(&layout);
        store.toggle(12, 0).unwrap();
        store.toggle(12, 12).unwrap();
        let stats = aggregate(&layout, &store);
        assert_eq!(stats.potes_cheios, 1);
        assert_eq!(stats.caixas_cheias, 1);

        let grid = store.grid(12).unwrap();
        let hk = FreezerStats::of(ContainerKind::METADE, grid);
        assert_eq!(
            hk,
            FreezerStats {
                pote_full: 1,
                pote_empty: 11,
                caixa_full: 1,
                caixa_empty: 11,
            }
        );
    }

    #[test]
    fn numbered_layout_has_no_split_accounting() {
        let layout = Layout::preset(LayoutPreset::Numbered);
        let store = SlotStore::empty_for(&layout);
        let stats = aggregate(&layout, &store);
        assert_eq!(stats.caixas_vazias, 24);
        assert_eq!(stats.potes_vazios, 12 * 24);
    }

    proptest! {
        #[test]
        fn split_zones_are_independent(
            pote_slots in prop::collection::vec(any::<bool>(), 12),
            caixa_a in prop::collection::vec(any::<bool>(), 12),
            caixa_b in prop::collection::vec(any::<bool>(), 12),
        ) {
            let mut a = pote_slots.clone();
            a.extend(&caixa_a);
            let mut b = pote_slots.clone();
            b.extend(&caixa_b);
            let grid_a = SlotGrid::from_slice(&a).unwrap();
            let grid_b = SlotGrid::from_slice(&b).unwrap();

            let stats_a = FreezerStats::of(ContainerKind::METADE, &grid_a);
            let stats_b = FreezerStats::of(ContainerKind::METADE, &grid_b);
            let expected_pote = pote_slots.iter().filter(|s| **s).count();
            prop_assert_eq!(stats_a.pote_full, expected_pote);
            prop_assert_eq!(stats_b.pote_full, expected_pote);
            prop_assert_eq!(stats_a.caixa_full, grid_a.full_in(Zone::new(12, 24)));
            prop_assert_eq!(stats_a.caixa_full, caixa_a.iter().filter(|s| **s).count());
        }

        #[test]
        fn totals_always_cover_every_slot(
            grids in prop::collection::vec(prop::collection::vec(any::<bool>(), 24), 13)
        ) {
            let layout = Layout::preset(LayoutPreset::Named);
            let store = SlotStore::from_grids(
                grids.iter().map(|g| SlotGrid::from_slice(g).unwrap()).collect(),
            );
            let s = aggregate(&layout, &store);
            prop_assert_eq!(
                s.potes_cheios + s.potes_vazios + s.caixas_cheias + s.caixas_vazias,
                13 * 24
            );
        }
    }
}
