//! Undo/Redo snapshot history.
//!
//! Every gesture pushes one full-buffer checkpoint before it draws.
//! Undo swaps the live buffer with the newest checkpoint, parking the
//! live state on the redo stack; redo is the mirror image. Starting a new
//! action drops the redo branch (linear history, no branching).
//!
//! `undo_depth() + redo_depth()` is unchanged by undo/redo, so trimming
//! the undo stack on `checkpoint` is enough to honor `max_depth`.

use sd_render::{Snapshot, Surface};

/// Two LIFO snapshot stacks with an optional depth cap.
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Maximum undo checkpoints (`0` = unbounded).
    max_depth: usize,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Capture the surface as the undo point for a new action.
    pub fn begin_action(&mut self, surface: &Surface) {
        self.checkpoint(surface.snapshot());
    }

    /// Push an already-captured pre-action snapshot.
    pub fn checkpoint(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        if self.max_depth > 0 && self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
            log::debug!("history full, dropped oldest checkpoint");
        }
        // Clear redo stack on new action
        self.redo_stack.clear();
    }

    /// Restore the newest checkpoint. Returns `false` if there is none.
    pub fn undo(&mut self, surface: &mut Surface) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(surface.snapshot());
        surface.restore(&previous);
        true
    }

    /// Re-apply the newest undone state. Returns `false` if there is none.
    pub fn redo(&mut self, surface: &mut Surface) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(surface.snapshot());
        surface.restore(&next);
        true
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
