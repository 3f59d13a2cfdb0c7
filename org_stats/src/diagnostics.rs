//! Leveled narration of an aggregation run.
//!
//! The engine reports what it skips, records and waits for through a [`Diagnostics`]
//! implementation handed to it, never through the global logger directly.

use log::Level;
use std::sync::Mutex;

pub trait Diagnostics: Send + Sync {
    fn emit(&self, level: Level, message: &str);
}

/// Forwards to the `log` facade. Debug and trace narration is dropped unless `verbose`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics {
    verbose: bool,
}

impl LogDiagnostics {
    pub fn new(verbose: bool) -> Self {
        LogDiagnostics { verbose }
    }
}

impl Diagnostics for LogDiagnostics {
    fn emit(&self, level: Level, message: &str) {
        if level > Level::Info && !self.verbose {
            return;
        }
        log::log!(target: "org_stats", level, "{}", message);
    }
}

/// Keeps every emitted message, for assertions.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    messages: Mutex<Vec<(Level, String)>>,
}

impl RecordingDiagnostics {
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|(_, message)| message.contains(needle))
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn emit(&self, level: Level, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((level, message.to_string()));
        }
    }
}

#[test]
fn recording_diagnostics_test() {
    let diagnostics = RecordingDiagnostics::default();
    diagnostics.emit(Level::Info, "got 3 repositories");
    diagnostics.emit(Level::Debug, "ignoring forked repo: a");
    assert!(diagnostics.contains("forked repo"));
    assert!(!diagnostics.contains("blacklisted"));
    assert_eq!(diagnostics.messages()[0], (Level::Info, "got 3 repositories".to_string()));
}
