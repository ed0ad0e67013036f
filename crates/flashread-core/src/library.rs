//! In-memory bookmarks and reading history.
//!
//! Both lists only grow by explicit appends and shrink by explicit removals;
//! entries are never edited in place.

use serde::Serialize;
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};
use ts_rs::TS;

pub const HISTORY_CAPACITY: usize = 10;

/// Seconds since the unix epoch, 0 if the system clock is before it.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Bookmark {
    pub label: String,
    pub token_index: usize,
    #[ts(type = "number")]
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub name: String,
    pub content: String,
    pub timestamp: u64,
}

/// What the presentation layer sees of a history entry; the content stays in the
/// session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct HistorySummary {
    pub name: String,
    #[ts(type = "number")]
    pub timestamp: u64,
    pub word_count: usize,
}

impl From<&HistoryEntry> for HistorySummary {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            name: entry.name.clone(),
            timestamp: entry.timestamp,
            word_count: entry.content.split_whitespace().count(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Bookmarks {
    entries: Vec<Bookmark>,
}

impl Bookmarks {
    pub fn add(&mut self, bookmark: Bookmark) {
        self.entries.push(bookmark);
    }

    pub fn get(&self, index: usize) -> Option<&Bookmark> {
        self.entries.get(index)
    }

    pub fn remove(&mut self, index: usize) -> Option<Bookmark> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[Bookmark] {
        &self.entries
    }
}

/// Newest-first list bounded to `capacity`; pushing past it evicts the oldest.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the front, returning the evicted entry if the list was full.
    pub fn push(&mut self, entry: HistoryEntry) -> Option<HistoryEntry> {
        self.entries.push_front(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_back()
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn remove(&mut self, index: usize) -> Option<HistoryEntry> {
        self.entries.remove(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summaries(&self) -> Vec<HistorySummary> {
        self.entries.iter().map(HistorySummary::from).collect()
    }
}
