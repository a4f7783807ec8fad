//! Hand-off of the encoded report to an external sharing mechanism.

#![allow(missing_docs)]

use std::io::{self, Write};
use std::process::{Command, Stdio};

use crate::inventory::report::percent_encode;

/// Default share target: a messaging deep link taking the text as a query value.
pub const DEFAULT_SHARE_BASE_URL: &str = "https://wa.me/?text=";

/// Build the full share link for `report`.
#[must_use]
pub fn share_link(base_url: &str, report: &str) -> String {
    format!("{base_url}{}", percent_encode(report))
}

/// Receives a ready-to-open share link.
pub trait ShareSink {
    fn share(&mut self, link: &str) -> io::Result<()>;
}

/// Writes the link as one line to a writer (stdout by default).
#[derive(Debug)]
pub struct PrintShare<W: Write> {
    writer: W,
}

impl<W: Write> PrintShare<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ShareSink for PrintShare<W> {
    fn share(&mut self, link: &str) -> io::Result<()> {
        writeln!(self.writer, "{link}")?;
        self.writer.flush()
    }
}

/// Spawns an opener program (`xdg-open`, `open`, ...) with the link as its
/// only argument. The child is not waited on.
#[derive(Debug, Clone)]
pub struct CommandShare {
    program: String,
}

impl CommandShare {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Platform default opener.
    #[must_use]
    pub fn platform_default() -> Self {
        let program = if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(windows) {
            "explorer"
        } else {
            "xdg-open"
        };
        Self::new(program)
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl ShareSink for CommandShare {
    fn share(&mut self, link: &str) -> io::Result<()> {
        Command::new(&self.program)
            .arg(link)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
    }
}
