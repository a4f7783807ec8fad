//! Tactile feedback for slot toggles.
//!
//! A terminal has no vibration motor; the closest thing is the bell.

use std::io::{self, Write};

pub trait Haptics {
    /// Short pulse after a successful toggle. Failures are ignored.
    fn pulse(&mut self);
}

/// Rings the terminal bell on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Haptics for TerminalBell {
    fn pulse(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
    }
}

/// Haptics disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn pulse(&mut self) {}
}

/// Pick the implementation for the `ui.haptics` setting.
#[must_use]
pub fn for_setting(enabled: bool) -> Box<dyn Haptics> {
    if enabled {
        Box::new(TerminalBell)
    } else {
        Box::new(NoHaptics)
    }
}
