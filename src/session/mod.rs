//! Interaction session state: selection, dragging, text editing, history
//! and hover, coordinated by [`EditorSession`].
//!
//! Each sub-session is an ordinary instantiable struct; two editors in one
//! process never share state. Mutations follow a return-value contract: an
//! operation that commits a change returns the committed annotation, and the
//! session applies it to its own collection rather than dispatching through
//! any external store.

pub mod drag;
mod error;
pub mod history;
pub mod hover;
pub mod selection;
pub mod text_edit;

pub use drag::{DragDelta, DragKind, DragSession, DragState};
pub use error::{SessionError, SessionResult};
pub use history::{HistoryAction, HistoryEngine, HistoryEntry};
pub use hover::{HoverState, HoverStyle, HoverTransition};
pub use selection::{canvas_bounding_box, near_annotation_edge, SelectionState};
pub use text_edit::{TextEditSession, TextEditorState};

use crate::annotation::control::{self, ControlPoint, ControlPointKind};
use crate::annotation::{Annotation, AnnotationCollection};
use crate::config::EngineConfig;
use crate::geometry::Point;
use crate::render::DirtyRegionTracker;

/// Owns the annotation collection and every piece of interaction state for
/// one editor surface.
///
/// Coordinate spaces: annotations store normalized image-space points, while
/// pointer input arrives in canvas pixels. Methods that need to cross that
/// boundary take an `image_to_canvas` mapping from the caller, since the
/// session deliberately knows nothing about zoom or pan.
#[derive(Debug)]
pub struct EditorSession {
    config: EngineConfig,
    annotations: AnnotationCollection,
    selection: SelectionState,
    hover: HoverState,
    drag: DragSession,
    text_edit: TextEditSession,
    history: HistoryEngine,
    dirty: DirtyRegionTracker,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            annotations: AnnotationCollection::new(),
            selection: SelectionState::new(),
            hover: HoverState::new(),
            drag: DragSession::new(config.drag_noise_threshold),
            text_edit: TextEditSession::new(),
            history: HistoryEngine::new(config.history_depth),
            dirty: DirtyRegionTracker::from_config(&config),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn annotations(&self) -> &AnnotationCollection {
        &self.annotations
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    pub fn text_edit(&self) -> &TextEditSession {
        &self.text_edit
    }

    pub fn history(&self) -> &HistoryEngine {
        &self.history
    }

    pub fn dirty(&self) -> &DirtyRegionTracker {
        &self.dirty
    }

    pub fn dirty_mut(&mut self) -> &mut DirtyRegionTracker {
        &mut self.dirty
    }

    // --- annotation lifecycle ---

    /// Adds or replaces an annotation, recording an undoable create entry.
    pub fn add_annotation(
        &mut self,
        annotation: Annotation,
        image_to_canvas: impl Fn(Point) -> Point,
    ) {
        self.mark_annotation_dirty(&annotation, &image_to_canvas);
        self.history.push_action(HistoryEntry::new(
            HistoryAction::Create,
            annotation.id.clone(),
            None,
            Some(annotation.clone()),
        ));
        self.annotations.upsert(annotation);
    }

    /// Removes an annotation, recording an undoable delete entry. Clears
    /// selection and hover if they pointed at it.
    pub fn remove_annotation(
        &mut self,
        annotation_id: &str,
        image_to_canvas: impl Fn(Point) -> Point,
    ) -> Option<Annotation> {
        let removed = self.annotations.remove(annotation_id)?;
        self.mark_annotation_dirty(&removed, &image_to_canvas);
        self.history.push_action(HistoryEntry::new(
            HistoryAction::Delete,
            annotation_id,
            Some(removed.clone()),
            None,
        ));
        if self.selection.selected_annotation_id() == Some(annotation_id) {
            self.selection.clear_annotation();
        }
        if self.hover.is_annotation_hovered(annotation_id) {
            self.hover.set_hovered_annotation(None);
        }
        Some(removed)
    }

    // --- hit testing ---

    /// Topmost annotation whose outline is within the configured edge
    /// threshold of `position`. Later additions win ties.
    pub fn annotation_at(
        &self,
        position: Point,
        image_to_canvas: impl Fn(Point) -> Point,
    ) -> Option<&Annotation> {
        self.annotations.iter().rev().find(|annotation| {
            near_annotation_edge(
                position,
                annotation,
                self.config.edge_hit_threshold,
                &image_to_canvas,
            )
        })
    }

    /// Control points for the currently selected annotation, in generation
    /// order.
    pub fn selected_control_points(
        &self,
        image_to_canvas: impl Fn(Point) -> Point,
    ) -> Vec<ControlPoint> {
        match self.selection.selected_annotation(&self.annotations) {
            Some(annotation) => control::generate_control_points(annotation, image_to_canvas),
            None => Vec::new(),
        }
    }

    /// First control point within the configured hit radius of `position`.
    pub fn control_point_at<'a>(
        &self,
        control_points: &'a [ControlPoint],
        position: Point,
    ) -> Option<&'a ControlPoint> {
        control::control_point_at(control_points, position, self.config.control_point_hit_radius)
    }

    // --- selection ---

    /// Selects an annotation, marking both the previous and new selection
    /// regions dirty so their outlines repaint.
    pub fn select_annotation(
        &mut self,
        annotation_id: &str,
        image_to_canvas: impl Fn(Point) -> Point,
    ) {
        if let Some(previous) = self.selection.selected_annotation(&self.annotations) {
            let bounds = canvas_bounding_box(previous, &image_to_canvas);
            self.dirty.mark_dirty(bounds);
        }
        self.selection.select_annotation(annotation_id);
        if let Some(current) = self.annotations.get(annotation_id) {
            let bounds = canvas_bounding_box(current, &image_to_canvas);
            self.dirty.mark_dirty(bounds);
        }
    }

    pub fn clear_selection(&mut self, image_to_canvas: impl Fn(Point) -> Point) {
        if let Some(previous) = self.selection.selected_annotation(&self.annotations) {
            let bounds = canvas_bounding_box(previous, &image_to_canvas);
            self.dirty.mark_dirty(bounds);
        }
        self.selection.clear_annotation();
    }

    // --- hover ---

    /// Updates the hovered annotation, marking the regions that gained or
    /// lost the highlight. Returns whether the hover target changed.
    pub fn set_hovered_annotation(
        &mut self,
        annotation_id: Option<&str>,
        image_to_canvas: impl Fn(Point) -> Point,
    ) -> bool {
        let previous = self.hover.hovered_annotation_id().map(str::to_owned);
        if !self.hover.set_hovered_annotation(annotation_id.map(str::to_owned)) {
            return false;
        }
        for id in [previous.as_deref(), annotation_id].into_iter().flatten() {
            if let Some(annotation) = self.annotations.get(id) {
                let bounds = canvas_bounding_box(annotation, &image_to_canvas);
                self.dirty.mark_dirty(bounds);
            }
        }
        true
    }

    // --- dragging ---

    /// Begins a move drag on an existing annotation. Returns `Ok(false)`
    /// when the annotation does not exist.
    pub fn start_move_drag(
        &mut self,
        annotation_id: &str,
        position: Point,
    ) -> SessionResult<bool> {
        let Some(annotation) = self.annotations.get(annotation_id) else {
            tracing::warn!(annotation_id, "move drag target not found");
            return Ok(false);
        };
        self.drag.start_drag(annotation, position, DragKind::Move)?;
        Ok(true)
    }

    /// Begins a drag on a control point, choosing the drag kind from the
    /// kind of handle grabbed.
    pub fn start_control_point_drag(
        &mut self,
        control_point: &ControlPoint,
        position: Point,
    ) -> SessionResult<bool> {
        let Some(annotation) = self.annotations.get(&control_point.annotation_id) else {
            tracing::warn!(
                annotation_id = %control_point.annotation_id,
                "control point drag target not found"
            );
            return Ok(false);
        };
        let drag_kind = match control_point.kind {
            ControlPointKind::Corner | ControlPointKind::Edge => DragKind::Resize,
            ControlPointKind::Point => DragKind::Point,
            ControlPointKind::Center => DragKind::Move,
        };
        self.drag
            .start_control_point_drag(annotation, position, drag_kind, &control_point.id)?;
        Ok(true)
    }

    pub fn update_drag(&mut self, position: Point) -> Option<DragDelta> {
        self.drag.update_drag(position)
    }

    /// Ends the active drag. When the movement exceeded the noise threshold
    /// the final annotation is committed to the collection, a history entry
    /// is recorded and both the old and new regions are marked dirty. The
    /// committed annotation is returned; `None` means nothing changed.
    pub fn commit_drag(
        &mut self,
        final_annotation: Option<Annotation>,
        image_to_canvas: impl Fn(Point) -> Point,
    ) -> Option<Annotation> {
        let initial = self.drag.initial_annotation().cloned();
        let drag_kind = self.drag.state().map(|state| state.drag_kind);
        let committed = self.drag.end_drag(final_annotation)?;

        let action = match drag_kind {
            Some(DragKind::Resize) => HistoryAction::Resize,
            Some(DragKind::Point) => HistoryAction::PointMove,
            _ => HistoryAction::Move,
        };
        if let Some(initial) = &initial {
            self.mark_annotation_dirty(initial, &image_to_canvas);
        }
        self.mark_annotation_dirty(&committed, &image_to_canvas);
        self.history.push_action(HistoryEntry::new(
            action,
            committed.id.clone(),
            initial,
            Some(committed.clone()),
        ));
        self.annotations.upsert(committed.clone());
        Some(committed)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel_drag();
    }

    // --- text editing ---

    /// Begins editing an annotation's text. Returns `Ok(false)` when the
    /// annotation does not exist.
    pub fn start_text_edit(
        &mut self,
        annotation_id: &str,
        position: Point,
    ) -> SessionResult<bool> {
        let Some(annotation) = self.annotations.get(annotation_id) else {
            tracing::warn!(annotation_id, "text edit target not found");
            return Ok(false);
        };
        self.text_edit.start_edit(annotation, position)?;
        Ok(true)
    }

    pub fn update_text(&mut self, text: impl Into<String>) {
        self.text_edit.update_text(text);
    }

    /// Saves the active text edit, recording an undoable edit entry and
    /// marking the annotation's region dirty.
    pub fn save_text_edit(
        &mut self,
        image_to_canvas: impl Fn(Point) -> Point,
    ) -> Option<Annotation> {
        let before = self
            .text_edit
            .editing_annotation_id()
            .and_then(|id| self.annotations.get(id))
            .cloned();
        let committed = self.text_edit.save_edit(&self.annotations)?;

        self.mark_annotation_dirty(&committed, &image_to_canvas);
        self.history.push_action(HistoryEntry::new(
            HistoryAction::Edit,
            committed.id.clone(),
            before,
            Some(committed.clone()),
        ));
        self.annotations.upsert(committed.clone());
        Some(committed)
    }

    pub fn cancel_text_edit(&mut self) {
        self.text_edit.cancel_edit();
    }

    // --- history ---

    /// Undoes the most recent change, marking affected regions dirty and
    /// dropping selection on annotations that no longer exist.
    pub fn undo(&mut self, image_to_canvas: impl Fn(Point) -> Point) -> Option<HistoryEntry> {
        let entry = self.history.undo(&mut self.annotations)?;
        self.after_history_step(&entry, &image_to_canvas);
        Some(entry)
    }

    /// Reapplies the most recently undone change.
    pub fn redo(&mut self, image_to_canvas: impl Fn(Point) -> Point) -> Option<HistoryEntry> {
        let entry = self.history.redo(&mut self.annotations)?;
        self.after_history_step(&entry, &image_to_canvas);
        Some(entry)
    }

    fn after_history_step(
        &mut self,
        entry: &HistoryEntry,
        image_to_canvas: impl Fn(Point) -> Point,
    ) {
        for snapshot in [entry.before.as_ref(), entry.after.as_ref()]
            .into_iter()
            .flatten()
        {
            let bounds = canvas_bounding_box(snapshot, &image_to_canvas);
            self.dirty.mark_dirty(bounds);
        }
        if self
            .selection
            .selected_annotation(&self.annotations)
            .is_none()
        {
            self.selection.clear_annotation();
        }
        if self
            .hover
            .hovered_annotation_id()
            .is_some_and(|id| !self.annotations.contains(id))
        {
            self.hover.set_hovered_annotation(None);
        }
    }

    fn mark_annotation_dirty(
        &mut self,
        annotation: &Annotation,
        image_to_canvas: impl Fn(Point) -> Point,
    ) {
        let bounds = canvas_bounding_box(annotation, image_to_canvas);
        self.dirty.mark_dirty(bounds);
    }
}
