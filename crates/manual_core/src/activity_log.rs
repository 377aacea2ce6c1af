use std::collections::VecDeque;

/// Maximum number of entries kept in the activity log.
pub const LOG_CAPACITY: usize = 200;

/// Capped, ordered activity log. The oldest entry is evicted first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivityLog {
    entries: VecDeque<String>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a log from stored lines, keeping only the most recent
    /// [`LOG_CAPACITY`] of them.
    pub fn from_entries(entries: Vec<String>) -> Self {
        let mut log = Self::new();
        for entry in entries {
            log.push(entry);
        }
        log
    }

    pub fn push(&mut self, entry: String) {
        self.entries.push_back(entry);
        while self.entries.len() > LOG_CAPACITY {
            self.entries.pop_front();
        }
    }

    pub fn record(&mut self, timestamp: &str, message: &str) {
        self.push(format_entry(timestamp, message));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Oldest first, the stored order.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Most recent first, the order a viewer shows.
    pub fn latest_first(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().rev().map(String::as_str)
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries.into()
    }
}

pub fn format_entry(timestamp: &str, message: &str) -> String {
    format!("[{timestamp}] {message}")
}
