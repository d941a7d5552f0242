//! Bounded undo/redo history over annotation mutations.
//!
//! Entries carry full before/after snapshots; undo and redo only replay
//! stored state, they never recompute geometry.

use crate::annotation::{Annotation, AnnotationCollection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    Create,
    Delete,
    Move,
    Resize,
    Edit,
    Style,
    PointMove,
}

impl HistoryAction {
    /// Human-readable label for toolbar tooltips.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Create => "Create annotation",
            Self::Delete => "Delete annotation",
            Self::Move => "Move annotation",
            Self::Resize => "Resize annotation",
            Self::Edit => "Edit text",
            Self::Style => "Change style",
            Self::PointMove => "Move point",
        }
    }
}

/// One recorded transition. `before` is absent for creates, `after` for
/// deletes; both must be present for mutations so each direction can be
/// replayed from snapshots alone.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub action: HistoryAction,
    pub annotation_id: String,
    pub before: Option<Annotation>,
    pub after: Option<Annotation>,
}

impl HistoryEntry {
    pub fn new(
        action: HistoryAction,
        annotation_id: impl Into<String>,
        before: Option<Annotation>,
        after: Option<Annotation>,
    ) -> Self {
        Self {
            action,
            annotation_id: annotation_id.into(),
            before,
            after,
        }
    }
}

#[derive(Debug)]
pub struct HistoryEngine {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_depth: usize,
}

impl HistoryEngine {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Records a completed action. Any redo branch is invalidated, and the
    /// oldest undo entry is evicted beyond capacity.
    pub fn push_action(&mut self, entry: HistoryEntry) {
        tracing::debug!(
            action = ?entry.action,
            annotation_id = %entry.annotation_id,
            undo_depth = self.undo_stack.len() + 1,
            "history action pushed",
        );
        self.undo_stack.push(entry);
        self.redo_stack.clear();

        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
    }

    /// Reverts the most recent action against `annotations` and moves the
    /// entry to the redo stack. Returns `None` when there is nothing to
    /// undo.
    pub fn undo(&mut self, annotations: &mut AnnotationCollection) -> Option<HistoryEntry> {
        let Some(entry) = self.undo_stack.pop() else {
            tracing::debug!("nothing to undo");
            return None;
        };

        apply_undo(&entry, annotations);
        tracing::debug!(
            action = ?entry.action,
            annotation_id = %entry.annotation_id,
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len() + 1,
            "action undone",
        );
        self.redo_stack.push(entry.clone());
        Some(entry)
    }

    /// Re-applies the most recently undone action and moves the entry back
    /// to the undo stack. Returns `None` when there is nothing to redo.
    pub fn redo(&mut self, annotations: &mut AnnotationCollection) -> Option<HistoryEntry> {
        let Some(entry) = self.redo_stack.pop() else {
            tracing::debug!("nothing to redo");
            return None;
        };

        apply_redo(&entry, annotations);
        tracing::debug!(
            action = ?entry.action,
            annotation_id = %entry.annotation_id,
            "action redone",
        );
        self.undo_stack.push(entry.clone());
        Some(entry)
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

    pub fn last_action_description(&self) -> Option<&'static str> {
        self.undo_stack.last().map(|e| e.action.description())
    }

    pub fn next_redo_description(&self) -> Option<&'static str> {
        self.redo_stack.last().map(|e| e.action.description())
    }

    /// Empties both stacks, e.g. when a new study is loaded.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        tracing::debug!("history cleared");
    }
}

fn apply_undo(entry: &HistoryEntry, annotations: &mut AnnotationCollection) {
    match entry.action {
        HistoryAction::Create => {
            annotations.remove(&entry.annotation_id);
        }
        HistoryAction::Delete => {
            if let Some(before) = &entry.before {
                annotations.upsert(before.clone());
            }
        }
        _ => {
            if let Some(before) = &entry.before {
                annotations.upsert(before.clone());
            }
        }
    }
}

fn apply_redo(entry: &HistoryEntry, annotations: &mut AnnotationCollection) {
    match entry.action {
        HistoryAction::Delete => {
            annotations.remove(&entry.annotation_id);
        }
        _ => {
            if let Some(after) = &entry.after {
                annotations.upsert(after.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::transform::move_annotation;
    use crate::annotation::AnnotationKind;
    use crate::geometry::Point;

    fn annotation(id: &str, x: f64) -> Annotation {
        Annotation::new(
            id,
            AnnotationKind::Rectangle,
            vec![Point::new(x, 0.2), Point::new(x + 0.2, 0.4)],
        )
    }

    fn engine() -> HistoryEngine {
        HistoryEngine::new(50)
    }

    #[test]
    fn undo_of_create_removes_and_redo_restores_deep_equal_state() {
        let mut history = engine();
        let mut collection = AnnotationCollection::new();

        let created = annotation("a1", 0.1);
        collection.upsert(created.clone());
        history.push_action(HistoryEntry::new(
            HistoryAction::Create,
            "a1",
            None,
            Some(created.clone()),
        ));

        history.undo(&mut collection).expect("undo should apply");
        assert!(!collection.contains("a1"));

        history.redo(&mut collection).expect("redo should apply");
        assert_eq!(collection.get("a1"), Some(&created));
    }

    #[test]
    fn undo_of_delete_restores_the_snapshot() {
        let mut history = engine();
        let mut collection = AnnotationCollection::new();

        let doomed = annotation("a1", 0.1);
        collection.upsert(doomed.clone());
        collection.remove("a1");
        history.push_action(HistoryEntry::new(
            HistoryAction::Delete,
            "a1",
            Some(doomed.clone()),
            None,
        ));

        let _ = history.undo(&mut collection);
        assert_eq!(collection.get("a1"), Some(&doomed));

        let _ = history.redo(&mut collection);
        assert!(!collection.contains("a1"));
    }

    #[test]
    fn round_trip_restores_every_intermediate_state() {
        let mut history = engine();
        let mut collection = AnnotationCollection::new();

        let mut states = Vec::new();
        let mut current = annotation("a1", 0.1);
        collection.upsert(current.clone());
        history.push_action(HistoryEntry::new(
            HistoryAction::Create,
            "a1",
            None,
            Some(current.clone()),
        ));
        states.push(collection.clone());

        for _ in 0..4 {
            let moved = move_annotation(&current, Point::new(0.05, 0.02));
            history.push_action(HistoryEntry::new(
                HistoryAction::Move,
                "a1",
                Some(current.clone()),
                Some(moved.clone()),
            ));
            collection.upsert(moved.clone());
            states.push(collection.clone());
            current = moved;
        }

        // Walk all the way back, checking each intermediate state.
        for expected in states.iter().rev().skip(1) {
            history.undo(&mut collection).expect("undo should apply");
            assert_eq!(&collection, expected);
        }
        history.undo(&mut collection).expect("undo of create");
        assert!(collection.is_empty());

        // And forward again.
        for expected in states.iter() {
            history.redo(&mut collection).expect("redo should apply");
            assert_eq!(&collection, expected);
        }
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_stack_holds_fifty_entries_evicting_the_oldest() {
        let mut history = engine();
        let mut collection = AnnotationCollection::new();
        let base = annotation("a1", 0.0);
        collection.upsert(base.clone());

        let mut previous = base;
        for _ in 0..51 {
            let next = move_annotation(&previous, Point::new(0.001, 0.0));
            history.push_action(HistoryEntry::new(
                HistoryAction::Move,
                "a1",
                Some(previous.clone()),
                Some(next.clone()),
            ));
            collection.upsert(next.clone());
            previous = next;
        }

        assert_eq!(history.undo_depth(), 50);

        // Drain the stack; the very first transition is no longer undoable,
        // so the earliest reachable state is after move #1.
        let mut undone = 0;
        while history.undo(&mut collection).is_some() {
            undone += 1;
        }
        assert_eq!(undone, 50);
        let survivor = collection.get("a1").expect("annotation should remain");
        assert!((survivor.points[0].x - 0.001).abs() < 1e-9);
    }

    #[test]
    fn new_action_invalidates_the_redo_branch() {
        let mut history = engine();
        let mut collection = AnnotationCollection::new();

        let v0 = annotation("a1", 0.1);
        let v1 = move_annotation(&v0, Point::new(0.1, 0.0));
        let v2 = move_annotation(&v1, Point::new(0.1, 0.0));
        collection.upsert(v2.clone());
        history.push_action(HistoryEntry::new(
            HistoryAction::Move,
            "a1",
            Some(v0.clone()),
            Some(v1.clone()),
        ));
        history.push_action(HistoryEntry::new(
            HistoryAction::Move,
            "a1",
            Some(v1.clone()),
            Some(v2.clone()),
        ));

        let _ = history.undo(&mut collection);
        let _ = history.undo(&mut collection);
        assert!(history.can_redo());

        let branch = move_annotation(&v0, Point::new(0.0, 0.3));
        history.push_action(HistoryEntry::new(
            HistoryAction::Move,
            "a1",
            Some(v0),
            Some(branch),
        ));

        assert!(!history.can_redo());
        assert!(history.redo(&mut collection).is_none());
    }

    #[test]
    fn empty_stacks_signal_nothing_to_do() {
        let mut history = engine();
        let mut collection = AnnotationCollection::new();
        assert!(history.undo(&mut collection).is_none());
        assert!(history.redo(&mut collection).is_none());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn descriptions_follow_the_stack_tops() {
        let mut history = engine();
        let mut collection = AnnotationCollection::new();
        assert!(history.last_action_description().is_none());

        let a = annotation("a1", 0.1);
        history.push_action(HistoryEntry::new(
            HistoryAction::Create,
            "a1",
            None,
            Some(a.clone()),
        ));
        history.push_action(HistoryEntry::new(
            HistoryAction::Edit,
            "a1",
            Some(a.clone()),
            Some(a),
        ));

        assert_eq!(history.last_action_description(), Some("Edit text"));
        let _ = history.undo(&mut collection);
        assert_eq!(history.last_action_description(), Some("Create annotation"));
        assert_eq!(history.next_redo_description(), Some("Edit text"));
    }

    #[test]
    fn clear_empties_both_stacks() {
        let mut history = engine();
        let mut collection = AnnotationCollection::new();
        let a = annotation("a1", 0.1);
        history.push_action(HistoryEntry::new(
            HistoryAction::Create,
            "a1",
            None,
            Some(a),
        ));
        let _ = history.undo(&mut collection);

        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
