#![forbid(unsafe_code)]

//! Snapshot undo/redo for selections.
//!
//! [`SelectionHistory`] stores canonical snapshots as `Arc<[TreePath<N>]>`,
//! the same allocation the model hands to observers, so recording a change
//! costs one refcount bump.
//!
//! ```text
//! push(s3)
//! ┌──────────────────────────────────────────────────┐
//! │ Undo Stack:  [s0, s1, s2, s3]                    │
//! │ Redo Stack:  []                                  │
//! │ Current:     s3                                  │
//! └──────────────────────────────────────────────────┘
//!
//! undo() x2
//! ┌──────────────────────────────────────────────────┐
//! │ Undo Stack:  [s0, s1]                            │
//! │ Redo Stack:  [s2, s3]                            │
//! │ Current:     s1                                  │
//! └──────────────────────────────────────────────────┘
//!
//! push(s4) (new branch, clears redo)
//! ┌──────────────────────────────────────────────────┐
//! │ Undo Stack:  [s0, s1, s4]                        │
//! │ Redo Stack:  []                                  │
//! │ Current:     s4                                  │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. `undo_stack.len() <= max_depth` after any operation.
//! 2. Redo stack is cleared on every `push`.
//! 3. `current()` is the most recently pushed or restored snapshot.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use crate::path::TreePath;

/// Shared canonical snapshot.
pub type Snapshot<N> = Arc<[TreePath<N>]>;

/// Depth-bounded undo/redo stack of selection snapshots.
pub struct SelectionHistory<N> {
    /// Current snapshot at the back.
    undo_stack: VecDeque<Snapshot<N>>,
    /// Most recently undone at the back.
    redo_stack: VecDeque<Snapshot<N>>,
    max_depth: usize,
}

impl<N> fmt::Debug for SelectionHistory<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionHistory")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl<N> SelectionHistory<N> {
    /// Create a history seeded with `initial` as the current snapshot.
    #[must_use]
    pub fn new(max_depth: usize, initial: Snapshot<N>) -> Self {
        let mut history = Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth: max_depth.max(1),
        };
        history.undo_stack.push_back(initial);
        history
    }

    /// Record a new current snapshot, clearing the redo stack.
    pub fn push(&mut self, snapshot: Snapshot<N>) {
        self.redo_stack.clear();
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    /// Step back; returns the snapshot that is now current.
    pub fn undo(&mut self) -> Option<Snapshot<N>> {
        if self.undo_stack.len() < 2 {
            return None;
        }
        let current = self.undo_stack.pop_back()?;
        self.redo_stack.push_back(current);
        self.undo_stack.back().cloned()
    }

    /// Step forward; returns the snapshot that is now current.
    pub fn redo(&mut self) -> Option<Snapshot<N>> {
        let snapshot = self.redo_stack.pop_back()?;
        self.undo_stack.push_back(snapshot);
        self.undo_stack.back().cloned()
    }

    #[must_use]
    pub fn current(&self) -> Option<&Snapshot<N>> {
        self.undo_stack.back()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() >= 2
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Snapshots on the undo stack, including the current one.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Forget everything except the current snapshot.
    pub fn truncate_to_current(&mut self) {
        self.redo_stack.clear();
        let keep = self.undo_stack.len().saturating_sub(1);
        self.undo_stack.drain(..keep);
    }
}
