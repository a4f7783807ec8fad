//! Versioned on-disk persistence for the slot store.
//!
//! `load` never fails: anything that cannot be applied to the current layout
//! (missing file, corrupt JSON, unknown version, wrong shape) degrades to the
//! all-empty store, and the [`LoadOutcome`] says why so the caller can log it.
//! Writes go through a temp file and an atomic rename.

#![allow(missing_docs)]

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{FrzError, Result};
use crate::inventory::grid::SlotGrid;
use crate::inventory::layout::{Layout, SLOTS_PER_FREEZER};
use crate::inventory::store::SlotStore;

/// Current persisted record version.
pub const STATE_FORMAT_VERSION: u32 = 2;

/// Serialized form of a [`SlotStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    pub version: u32,
    pub slots_per_freezer: usize,
    pub freezers: Vec<Vec<bool>>,
}

impl StateRecord {
    #[must_use]
    pub fn from_store(store: &SlotStore) -> Self {
        Self {
            version: STATE_FORMAT_VERSION,
            slots_per_freezer: SLOTS_PER_FREEZER,
            freezers: store.grids().map(|g| g.as_slice().to_vec()).collect(),
        }
    }
}

/// Either the versioned record or the bare nested array written before
/// records carried a version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PersistedState {
    Versioned(StateRecord),
    Legacy(Vec<Vec<bool>>),
}

/// Where the loaded store came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    /// Persisted state matched the layout and was applied.
    Persisted,
    /// Nothing was persisted yet.
    Missing,
    /// Persisted state existed but was discarded.
    Discarded { reason: String },
}

/// Result of [`StateRepository::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub store: SlotStore,
    pub source: LoadSource,
}

impl LoadOutcome {
    fn defaults(layout: &Layout, source: LoadSource) -> Self {
        Self {
            store: SlotStore::empty_for(layout),
            source,
        }
    }
}

/// Storage backend for the slot store.
pub trait StateRepository {
    /// Read persisted state shaped for `layout`, falling back to defaults.
    fn load(&self, layout: &Layout) -> LoadOutcome;

    /// Persist the full store.
    fn save(&self, store: &SlotStore) -> Result<()>;
}

/// Decode raw persisted bytes against `layout`.
pub fn decode_state(raw: &str, layout: &Layout) -> std::result::Result<SlotStore, String> {
    let parsed: PersistedState =
        serde_json::from_str(raw).map_err(|e| format!("unreadable state: {e}"))?;
    let freezers = match parsed {
        PersistedState::Versioned(record) => {
            if record.version != STATE_FORMAT_VERSION {
                return Err(format!(
                    "unsupported state version {} (expected {STATE_FORMAT_VERSION})",
                    record.version
                ));
            }
            if record.slots_per_freezer != SLOTS_PER_FREEZER {
                return Err(format!(
                    "state has {} slots per freezer (expected {SLOTS_PER_FREEZER})",
                    record.slots_per_freezer
                ));
            }
            record.freezers
        }
        PersistedState::Legacy(freezers) => freezers,
    };

    if freezers.len() != layout.len() {
        return Err(format!(
            "state has {} freezers (layout has {})",
            freezers.len(),
            layout.len()
        ));
    }

    let grids = freezers
        .iter()
        .enumerate()
        .map(|(i, slots)| {
            SlotGrid::from_slice(slots).ok_or_else(|| {
                format!(
                    "freezer #{} has {} slots (expected {SLOTS_PER_FREEZER})",
                    i + 1,
                    slots.len()
                )
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(SlotStore::from_grids(grids))
}

/// JSON file backend.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateRepository for JsonFileRepository {
    fn load(&self, layout: &Layout) -> LoadOutcome {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return LoadOutcome::defaults(layout, LoadSource::Missing);
            }
            Err(error) => {
                return LoadOutcome::defaults(
                    layout,
                    LoadSource::Discarded {
                        reason: format!("failed to read {}: {error}", self.path.display()),
                    },
                );
            }
        };

        match decode_state(&raw, layout) {
            Ok(store) => LoadOutcome {
                store,
                source: LoadSource::Persisted,
            },
            Err(reason) => LoadOutcome::defaults(layout, LoadSource::Discarded { reason }),
        }
    }

    fn save(&self, store: &SlotStore) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| FrzError::io(parent, source))?;
        }

        let data = serde_json::to_vec(&StateRecord::from_store(store))?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, data).map_err(|source| FrzError::io(&tmp_path, source))?;
        fs::rename(&tmp_path, &self.path).map_err(|source| FrzError::io(&self.path, source))?;
        Ok(())
    }
}

/// In-memory backend holding the last saved record as JSON.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    saved: RefCell<Option<String>>,
    saves: RefCell<usize>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw persisted content, as if read from disk.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            saved: RefCell::new(Some(raw.into())),
            saves: RefCell::new(0),
        }
    }

    /// Raw JSON of the last save, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.saved.borrow().clone()
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl StateRepository for MemoryRepository {
    fn load(&self, layout: &Layout) -> LoadOutcome {
        match self.saved.borrow().as_deref() {
            None => LoadOutcome::defaults(layout, LoadSource::Missing),
            Some(raw) => match decode_state(raw, layout) {
                Ok(store) => LoadOutcome {
                    store,
                    source: LoadSource::Persisted,
                },
                Err(reason) => LoadOutcome::defaults(layout, LoadSource::Discarded { reason }),
            },
        }
    }

    fn save(&self, store: &SlotStore) -> Result<()> {
        let raw = serde_json::to_string(&StateRecord::from_store(store))?;
        *self.saved.borrow_mut() = Some(raw);
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

impl<R: StateRepository + ?Sized> StateRepository for &R {
    fn load(&self, layout: &Layout) -> LoadOutcome {
        (**self).load(layout)
    }

    fn save(&self, store: &SlotStore) -> Result<()> {
        (**self).save(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::layout::LayoutPreset;
    use proptest::prelude::*;

    fn layout() -> Layout {
        Layout::preset(LayoutPreset::Named)
    }

    fn sample_store() -> SlotStore {
        let mut store = SlotStore::empty_for(&layout());
        store.toggle(0, 0).unwrap();
        store.toggle(12, 12).unwrap();
        store.toggle(5, 23).unwrap();
        store
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonFileRepository::new(dir.path().join("freezers.json"));
        let outcome = repo.load(&layout());
        assert_eq!(outcome.source, LoadSource::Missing);
        assert_eq!(outcome.store, SlotStore::empty_for(&layout()));
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonFileRepository::new(dir.path().join("nested").join("freezers.json"));
        let store = sample_store();
        repo.save(&store).expect("save should succeed");
        let outcome = repo.load(&layout());
        assert_eq!(outcome.source, LoadSource::Persisted);
        assert_eq!(outcome.store, store);
        assert!(!dir.path().join("nested").join("freezers.tmp").exists());
    }

    #[test]
    fn corrupt_json_discarded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("freezers.json");
        fs::write(&path, "{not-json").expect("write corrupt state");
        let outcome = JsonFileRepository::new(path).load(&layout());
        assert!(matches!(outcome.source, LoadSource::Discarded { .. }));
        assert_eq!(outcome.store, SlotStore::empty_for(&layout()));
    }

    #[test]
    fn wrong_slot_count_discarded() {
        let record = StateRecord {
            version: STATE_FORMAT_VERSION,
            slots_per_freezer: SLOTS_PER_FREEZER,
            freezers: vec![vec![true; 20]; 13],
        };
        let raw = serde_json::to_string(&record).unwrap();
        let err = decode_state(&raw, &layout()).unwrap_err();
        assert!(err.contains("20 slots"), "{err}");
    }

    #[test]
    fn wrong_freezer_count_discarded() {
        let raw = serde_json::to_string(&vec![vec![false; 24]; 12]).unwrap();
        let err = decode_state(&raw, &layout()).unwrap_err();
        assert!(err.contains("12 freezers"), "{err}");
    }

    #[test]
    fn unknown_version_discarded() {
        let record = StateRecord {
            version: 1,
            slots_per_freezer: 20,
            freezers: vec![vec![true; 20]; 13],
        };
        let repo = MemoryRepository::with_raw(serde_json::to_string(&record).unwrap());
        let outcome = repo.load(&layout());
        match outcome.source {
            LoadSource::Discarded { reason } => assert!(reason.contains("version 1")),
            other => panic!("unexpected source: {other:?}"),
        }
    }

    #[test]
    fn legacy_bare_array_is_accepted() {
        let mut freezers = vec![vec![false; 24]; 13];
        freezers[1][3] = true;
        let repo = MemoryRepository::with_raw(serde_json::to_string(&freezers).unwrap());
        let outcome = repo.load(&layout());
        assert_eq!(outcome.source, LoadSource::Persisted);
        assert!(outcome.store.grid(1).unwrap().is_full(3));
    }

    #[test]
    fn record_is_versioned_on_disk() {
        let repo = MemoryRepository::new();
        repo.save(&sample_store()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&repo.raw().unwrap()).unwrap();
        assert_eq!(value["version"], 2);
        assert_eq!(value["slots_per_freezer"], 24);
        assert_eq!(value["freezers"].as_array().unwrap().len(), 13);
        assert_eq!(repo.save_count(), 1);
    }

    proptest! {
        #[test]
        fn any_store_roundtrips_through_record(
            grids in prop::collection::vec(prop::collection::vec(any::<bool>(), 24), 13)
        ) {
            let store = SlotStore::from_grids(
                grids.iter().map(|g| SlotGrid::from_slice(g).unwrap()).collect(),
            );
            let raw = serde_json::to_string(&StateRecord::from_store(&store)).unwrap();
            prop_assert_eq!(decode_state(&raw, &layout()).unwrap(), store);
        }
    }
}
