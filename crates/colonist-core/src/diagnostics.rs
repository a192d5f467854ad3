//! Rolling in-simulation diagnostic log.
//!
//! Every entry is also forwarded to the `log` facade so a host logger sees
//! the same stream.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    fn level(self) -> log::Level {
        match self {
            Severity::Debug => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Warn => log::Level::Warn,
            Severity::Error => log::Level::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub tick: u64,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>6}] {:?}: {}", self.tick, self.severity, self.message)
    }
}

/// Bounded ring buffer; the oldest entry is dropped when full.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl Diagnostics {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, tick: u64, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        log::log!(target: "colonist", severity.level(), "[{}] {}", tick, message);
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            tick,
            severity,
            message,
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries at `severity` or above.
    pub fn at_least(&self, severity: Severity) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.severity >= severity)
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(needle))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
