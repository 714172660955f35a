//! Session-only linear undo/redo over stage-board snapshots.
//!
//! Independent of the history ledger: undo snapshots capture the stage
//! collections only (no vocabularies, no commit metadata), live in a bounded
//! FIFO stack, and die with the session — they are never persisted.
//!
//! Contract for callers: every logical mutation pushes a pre-image snapshot
//! **before** applying its change. A batch of N sub-mutations pushes once per
//! independently undoable step; a skipped push silently collapses that step
//! out of the undo history.

use crate::store::StageBoard;

/// Maximum retained undo snapshots; the oldest is evicted beyond this.
pub const UNDO_CAP: usize = 30;

/// Linear (non-branching) undo/redo stacks.
#[derive(Debug, Default)]
pub struct UndoStack {
    undo: Vec<StageBoard>,
    redo: Vec<StageBoard>,
}

impl UndoStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture a pre-image snapshot.
    ///
    /// Clears the redo stack: a new action invalidates any previously
    /// available redo branch.
    pub fn push(&mut self, pre_image: StageBoard) {
        self.undo.push(pre_image);
        if self.undo.len() > UNDO_CAP {
            self.undo.remove(0);
        }
        self.redo.clear();
    }

    /// Pop the most recent undo snapshot, parking `current` on the redo
    /// stack. Returns `None` (no-op) when the undo stack is empty.
    pub fn undo(&mut self, current: &StageBoard) -> Option<StageBoard> {
        let previous = self.undo.pop()?;
        self.redo.push(current.clone());
        Some(previous)
    }

    /// Symmetric inverse of [`UndoStack::undo`].
    pub fn redo(&mut self, current: &StageBoard) -> Option<StageBoard> {
        let next = self.redo.pop()?;
        self.undo.push(current.clone());
        if self.undo.len() > UNDO_CAP {
            self.undo.remove(0);
        }
        Some(next)
    }

    /// Drop both stacks. Called by the manual save checkpoint: past this
    /// point recovery goes through the history ledger, not undo.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }
}
