//! Snapshot-based undo/redo.
//!
//! DESIGN
//! ======
//! Every user-visible mutation ends with one `commit` of a full deep copy of
//! the scene's entities. The history keeps an ordered list of snapshots with
//! a cursor: `undo`/`redo` move the cursor and hand back the snapshot to
//! restore. Gestures (drags, strokes) commit only when they finish, so each
//! undo step is one gesture.
//!
//! The list is bounded; once it grows past the limit the oldest snapshot is
//! evicted and becomes unreachable.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use tracing::debug;

use crate::doc::Entity;

/// Immutable deep copy of a scene's entities, in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    entities: Vec<Entity>,
}

impl Snapshot {
    #[must_use]
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Bounded snapshot history with a cursor.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<Snapshot>,
    current: usize,
    limit: usize,
}

impl History {
    /// Start a history whose oldest reachable state is `initial`.
    ///
    /// `limit` counts every retained snapshot, `initial` included, and is
    /// raised to at least 1.
    #[must_use]
    pub fn new(initial: Snapshot, limit: usize) -> Self {
        let mut snapshots = VecDeque::with_capacity(limit.clamp(1, 64));
        snapshots.push_back(initial);
        Self { snapshots, current: 0, limit: limit.max(1) }
    }

    /// Record a new state: drop any redo tail, append, advance, evict.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.snapshots.truncate(self.current + 1);
        self.snapshots.push_back(snapshot);
        self.current = self.snapshots.len() - 1;
        while self.snapshots.len() > self.limit {
            self.snapshots.pop_front();
            self.current -= 1;
        }
        debug!(index = self.current, len = self.snapshots.len(), "history commit");
    }

    /// Step back one snapshot. `None` when already at the oldest.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.current == 0 {
            return None;
        }
        self.current -= 1;
        self.snapshots.get(self.current)
    }

    /// Step forward one snapshot. `None` when already at the newest.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.current + 1 >= self.snapshots.len() {
            return None;
        }
        self.current += 1;
        self.snapshots.get(self.current)
    }

    /// The snapshot under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.current)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.snapshots.len()
    }

    /// Cursor position; `0` is the oldest retained snapshot.
    #[must_use]
    pub fn index(&self) -> usize {
        self.current
    }

    /// Number of retained snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always `false`: a history holds at least its initial snapshot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}
