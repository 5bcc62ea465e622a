//! Linear undo/redo history over page snapshots.

use crate::config::MAX_UNDO_HISTORY;
use crate::element::Element;
use serde::{Deserialize, Serialize};

/// A snapshot of page state for undo/redo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// All elements in paint-independent document order.
    pub elements: Vec<Element>,
    pub page_background_color: String,
}

impl Snapshot {
    pub fn new(elements: Vec<Element>, page_background_color: impl Into<String>) -> Self {
        Self {
            elements,
            page_background_color: page_background_color.into(),
        }
    }
}

/// Bounded history with a cursor. `entries[index]` is the current state;
/// entries after it are redo states.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    index: usize,
    capacity: usize,
}

impl History {
    /// Create a history seeded with the initial state.
    pub fn new(initial: Snapshot) -> Self {
        Self::with_capacity(initial, MAX_UNDO_HISTORY)
    }

    /// Create a history keeping at most `capacity` snapshots.
    pub fn with_capacity(initial: Snapshot, capacity: usize) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            capacity: capacity.max(1),
        }
    }

    /// Record a new state.
    ///
    /// A snapshot equal to the current one is ignored. Otherwise redo states
    /// are discarded, the snapshot becomes the head, and the oldest entries are
    /// dropped beyond capacity. Returns `true` if an entry was added.
    pub fn commit(&mut self, snapshot: Snapshot) -> bool {
        if self.entries.get(self.index) == Some(&snapshot) {
            return false;
        }

        self.entries.truncate(self.index + 1);
        self.entries.push(snapshot);

        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
        }
        self.index = self.entries.len() - 1;
        true
    }

    /// Step back. Returns the state to restore, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward. Returns the state to restore, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Replace the whole history with a single state (document load, clear).
    pub fn reset(&mut self, snapshot: Snapshot) {
        self.entries.clear();
        self.entries.push(snapshot);
        self.index = 0;
    }

    /// The current state.
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
