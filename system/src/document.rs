use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::message::{DocumentId, DocumentSnapshot, DocumentSummary};

/// One history entry: the full document text at a point in time, not a
/// diff. Snapshots keep `jump` O(1) at the cost of memory, which is fine
/// for text-sized content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub index: usize,
    pub content: String,
    pub created_at_ms: u64,
}

/// A document and its linear version history.
///
/// Invariant: `versions` is never empty and `cursor < versions.len()`.
/// Undo, redo and jump move only the cursor; `append` is the only
/// operation that grows or truncates the history.
#[derive(Debug)]
pub struct Document {
    id: DocumentId,
    versions: Vec<Version>,
    cursor: usize,
}

impl Document {
    pub fn new(id: DocumentId) -> Self {
        Self {
            id,
            versions: vec![Version {
                index: 0,
                content: String::new(),
                created_at_ms: now_ms(),
            }],
            cursor: 0,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> &Version {
        &self.versions[self.cursor]
    }

    /// Appends a new version and moves the cursor to it. When the cursor
    /// sits behind the newest version because of a prior undo, everything
    /// after the cursor is discarded first, so the history stays a single
    /// linear sequence.
    pub fn append(&mut self, content: String) -> &Version {
        self.versions.truncate(self.cursor + 1);
        let index = self.versions.len();
        self.versions.push(Version {
            index,
            content,
            created_at_ms: now_ms(),
        });
        self.cursor = index;
        &self.versions[self.cursor]
    }

    /// Steps the cursor back. `None` when already at the oldest version;
    /// that is a no-op, not an error.
    pub fn undo(&mut self) -> Option<&Version> {
        if self.cursor > 0 {
            self.cursor -= 1;
            Some(&self.versions[self.cursor])
        } else {
            None
        }
    }

    /// Steps the cursor forward. `None` when already at the newest version.
    pub fn redo(&mut self) -> Option<&Version> {
        if self.cursor + 1 < self.versions.len() {
            self.cursor += 1;
            Some(&self.versions[self.cursor])
        } else {
            None
        }
    }

    /// Moves the cursor to an arbitrary version. Pure navigation: the
    /// history is never truncated. `None` when the target is out of
    /// bounds, in which case the cursor is unchanged.
    pub fn jump(&mut self, version_index: usize) -> Option<&Version> {
        if version_index < self.versions.len() {
            self.cursor = version_index;
            Some(&self.versions[self.cursor])
        } else {
            None
        }
    }

    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            id: self.id,
            versions: self.versions.clone(),
            cursor: self.cursor,
        }
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id,
            version_count: self.versions.len(),
            cursor: self.cursor,
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
