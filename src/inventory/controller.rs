//! Owner of the live inventory: layout, slot store, persistence, activity log.
//!
//! Every successful mutation is followed by a save. A failed save is returned
//! to the caller, but the in-memory change stays applied: the store remains
//! authoritative for the rest of the session.

#![allow(missing_docs)]

use crate::core::errors::Result;
use crate::inventory::grid::SlotGrid;
use crate::inventory::layout::{FreezerConfig, Layout};
use crate::inventory::persistence::{LoadSource, StateRepository};
use crate::inventory::report::format_report;
use crate::inventory::share::share_link;
use crate::inventory::stats::{FreezerStats, Stats, aggregate};
use crate::inventory::store::SlotStore;
use crate::logger::jsonl::{EventType, JsonlWriter, LogEntry, Severity};

/// Live inventory bound to a storage backend.
pub struct InventoryController<R: StateRepository> {
    layout: Layout,
    store: SlotStore,
    repo: R,
    load_source: LoadSource,
    journal: Option<JsonlWriter>,
}

impl<R: StateRepository> InventoryController<R> {
    /// Load persisted state for `layout` (or defaults) from `repo`.
    pub fn open(layout: Layout, repo: R) -> Self {
        let outcome = repo.load(&layout);
        Self {
            layout,
            store: outcome.store,
            repo,
            load_source: outcome.source,
            journal: None,
        }
    }

    /// Attach an activity log; the load outcome is recorded immediately.
    #[must_use]
    pub fn with_journal(mut self, journal: JsonlWriter) -> Self {
        self.journal = Some(journal);
        let entry = match &self.load_source {
            LoadSource::Persisted => {
                LogEntry::new(EventType::StateLoad, Severity::Info).details("persisted")
            }
            LoadSource::Missing => {
                LogEntry::new(EventType::StateLoad, Severity::Info).details("defaults: no saved state")
            }
            LoadSource::Discarded { reason } => {
                LogEntry::new(EventType::StateLoad, Severity::Warning)
                    .details(format!("defaults: {reason}"))
            }
        };
        self.log(&entry);
        self
    }

    /// Allow or suppress the activity log's stderr fallback, e.g. while a
    /// full-screen view owns the terminal.
    pub fn set_journal_stderr(&mut self, enabled: bool) {
        if let Some(journal) = self.journal.as_mut() {
            journal.set_stderr_fallback(enabled);
        }
    }

    /// Degradation state of the activity log, if one is attached.
    #[must_use]
    pub fn journal_state(&self) -> Option<&str> {
        self.journal.as_ref().map(JsonlWriter::state)
    }

    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub const fn store(&self) -> &SlotStore {
        &self.store
    }

    #[must_use]
    pub const fn load_source(&self) -> &LoadSource {
        &self.load_source
    }

    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repo
    }

    pub fn freezer(&self, index: usize) -> Result<(&FreezerConfig, &SlotGrid)> {
        Ok((self.layout.freezer(index)?, self.store.grid(index)?))
    }

    /// Flip one slot, persist, and return the slot's new state.
    pub fn toggle(&mut self, freezer: usize, slot: usize) -> Result<bool> {
        let name = self.layout.freezer(freezer)?.name.clone();
        let full = self.store.toggle(freezer, slot)?;
        self.log(
            &LogEntry::new(EventType::SlotToggle, Severity::Info)
                .freezer(name)
                .slot(slot, full),
        );
        self.persist()?;
        Ok(full)
    }

    /// Empty one freezer and persist.
    pub fn clear(&mut self, freezer: usize) -> Result<()> {
        let name = self.layout.freezer(freezer)?.name.clone();
        self.store.clear(freezer)?;
        self.log(&LogEntry::new(EventType::FreezerClear, Severity::Info).freezer(name));
        self.persist()
    }

    /// Empty every freezer and persist.
    pub fn reset_all(&mut self) -> Result<()> {
        self.store.reset_all();
        self.log(&LogEntry::new(EventType::InventoryReset, Severity::Warning));
        self.persist()
    }

    #[must_use]
    pub fn stats(&self) -> Stats {
        aggregate(&self.layout, &self.store)
    }

    pub fn freezer_stats(&self, index: usize) -> Result<FreezerStats> {
        let (config, grid) = self.freezer(index)?;
        Ok(FreezerStats::of(config.kind, grid))
    }

    #[must_use]
    pub fn report(&self) -> String {
        format_report(&self.layout, &self.store)
    }

    /// Report link for `base_url`; recorded in the activity log.
    pub fn share_link(&mut self, base_url: &str) -> String {
        let link = share_link(base_url, &self.report());
        self.log(
            &LogEntry::new(EventType::ReportShare, Severity::Info)
                .details(format!("{} bytes", link.len())),
        );
        link
    }

    fn persist(&mut self) -> Result<()> {
        let result = self.repo.save(&self.store);
        if let Err(err) = &result {
            self.log(&LogEntry::new(EventType::SaveFailure, Severity::Error).error(err));
        }
        result
    }

    fn log(&mut self, entry: &LogEntry) {
        if let Some(journal) = self.journal.as_mut() {
            journal.write_entry(entry);
        }
    }
}
