//! Elm-style state model for the freezer dashboard.
//!
//! All view state lives in [`DashboardModel`]. Input arrives as
//! [`DashboardMsg`] values; inventory mutations and other side-effects are
//! described by [`DashboardCmd`] values returned from the update function.
//! The slot store itself is not part of the model: the runtime owns the
//! inventory controller and executes commands against it.

use crossterm::event::KeyEvent;

use crate::inventory::layout::{Layout, SLOTS_PER_FREEZER};

/// Destructive actions that wait for a yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    ClearFreezer(usize),
    ResetAll,
}

impl ConfirmAction {
    /// Question shown in the confirmation overlay.
    #[must_use]
    pub fn prompt(self, layout: &Layout) -> String {
        match self {
            Self::ClearFreezer(index) => {
                let name = layout.get(index).map_or("este freezer", |f| f.name.as_str());
                format!("Tem certeza que deseja limpar {name}?")
            }
            Self::ResetAll => "Tem certeza que deseja zerar TODOS os freezers?".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// One-line feedback shown under the key hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub level: StatusLevel,
    pub text: String,
}

/// Result of a command the runtime executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdOutcome {
    Done(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub enum DashboardMsg {
    Key(KeyEvent),
    Resize { cols: u16, rows: u16 },
    Outcome(CmdOutcome),
}

/// Side-effects for the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardCmd {
    None,
    Toggle { freezer: usize, slot: usize },
    Clear(usize),
    ResetAll,
    Share,
    Quit,
}

/// Complete view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardModel {
    /// Index of the freezer being displayed.
    pub active: usize,
    /// Slot under the cursor in the active grid.
    pub cursor: usize,
    /// Column count of every freezer, in layout order.
    pub columns: Vec<usize>,
    pub confirm_destructive: bool,
    pub pending: Option<ConfirmAction>,
    pub status: Option<StatusLine>,
    pub terminal_size: (u16, u16),
    pub quit: bool,
}

impl DashboardModel {
    #[must_use]
    pub fn new(layout: &Layout, confirm_destructive: bool) -> Self {
        Self {
            active: 0,
            cursor: 0,
            columns: layout.iter().map(|f| f.cols).collect(),
            confirm_destructive,
            pending: None,
            status: None,
            terminal_size: (80, 24),
            quit: false,
        }
    }

    #[must_use]
    pub fn freezer_count(&self) -> usize {
        self.columns.len()
    }

    /// Column count of the active freezer.
    #[must_use]
    pub fn active_cols(&self) -> usize {
        self.columns
            .get(self.active)
            .copied()
            .unwrap_or(SLOTS_PER_FREEZER)
            .max(1)
    }

    pub(crate) fn set_status(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.status = Some(StatusLine {
            level,
            text: text.into(),
        });
    }
}
