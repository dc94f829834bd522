use crate::element::SceneElement;
use crate::view_state::ViewState;

/// A committed editing state: the element list and view state as they were
/// right after an undoable action applied
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub elements: Vec<SceneElement>,
    pub view: ViewState,
}

/// Undo/redo checkpoints.
///
/// Only deltas dispatched with `commit_to_history` become checkpoints; live
/// view updates (zoom, scroll) never land here.
#[derive(Debug, Default)]
pub struct UndoHistory {
    undo_stack: Vec<Checkpoint>,
    redo_stack: Vec<Checkpoint>,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new checkpoint. Any redoable states are discarded.
    pub fn record(&mut self, checkpoint: Checkpoint) {
        self.undo_stack.push(checkpoint);
        self.redo_stack.clear();
    }

    /// Pop the most recent checkpoint, stashing `current` for redo
    pub fn undo(&mut self, current: Checkpoint) -> Option<Checkpoint> {
        let restored = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(restored)
    }

    /// Re-apply the most recently undone checkpoint, stashing `current`
    pub fn redo(&mut self, current: Checkpoint) -> Option<Checkpoint> {
        let restored = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(restored)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn checkpoint_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
