//! Snapshot-based undo/redo stacks.

use platekit_core::constants::DEFAULT_HISTORY_DEPTH;

use crate::snapshot::Snapshot;

/// Undo/redo manager over group snapshots, bounded to `max_depth`
/// undoable steps.
///
/// The bottom of the undo stack is always the canonical empty snapshot,
/// so `undo_stack.len() >= 1` holds at all times and undoing everything
/// recovers an empty group. Recording past the depth limit evicts the
/// oldest step above that bottom.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_depth: usize,
}

impl HistoryManager {
    /// Creates a manager holding only the empty snapshot, keeping at
    /// most `max_depth` undoable steps.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: vec![Snapshot::empty()],
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Changes the depth limit, evicting the oldest steps if the stack
    /// already exceeds it.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
        self.evict();
    }

    /// Records a snapshot if it differs from the current top by more
    /// than `epsilon` (element-wise on the transform matrices). A
    /// distinct snapshot clears the redo stack.
    ///
    /// Returns whether the snapshot was pushed.
    pub fn record(&mut self, snapshot: Snapshot, epsilon: f64) -> bool {
        if let Some(top) = self.undo_stack.last() {
            if top.approx_eq(&snapshot, epsilon) {
                return false;
            }
        }
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        self.evict();
        true
    }

    fn evict(&mut self) {
        // Index 0 is the canonical empty snapshot and never leaves.
        while self.undo_stack.len() > self.max_depth + 1 {
            self.undo_stack.remove(1);
        }
    }

    /// Whether an undo step is available.
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    /// Whether a redo step is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Steps back one snapshot and returns the state to recover to.
    /// A call at the stack boundary is a no-op returning `None`.
    pub fn undo(&mut self) -> Option<Snapshot> {
        if !self.can_undo() {
            return None;
        }
        let top = self.undo_stack.pop()?;
        self.redo_stack.push(top);
        self.undo_stack.last().cloned()
    }

    /// Steps forward one snapshot and returns the state to recover to.
    /// A call with an empty redo stack is a no-op returning `None`.
    pub fn redo(&mut self) -> Option<Snapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(snapshot.clone());
        Some(snapshot)
    }

    /// Number of undoable steps.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len() - 1
    }

    /// Number of redoable steps.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Every snapshot currently held, undo stack then redo stack.
    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot> {
        self.undo_stack.iter().chain(self.redo_stack.iter())
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}
