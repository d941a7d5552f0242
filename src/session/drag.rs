//! Drag engine: tracks one in-progress move/resize/point-edit gesture.
//!
//! The session snapshots the annotation at drag start and reports cumulative
//! deltas while the pointer moves. Committing on pointer-up is the only path
//! that produces a new annotation value; recording it in history and in the
//! live collection is the caller's job.

use crate::annotation::{transform, Annotation};
use crate::geometry::Point;

use super::error::{SessionError, SessionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    /// Translating the whole annotation.
    Move,
    /// Moving a single vertex.
    Point,
    /// Dragging a resize control point.
    Resize,
}

/// Cumulative movement since drag start, not frame-to-frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragDelta {
    pub dx: f64,
    pub dy: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub drag_kind: DragKind,
    pub start_position: Point,
    pub current_position: Point,
    pub target_id: String,
    pub control_point_id: Option<String>,
    /// Deep snapshot taken at drag start; seeds undo and visual revert.
    pub initial_annotation: Annotation,
}

#[derive(Debug)]
pub struct DragSession {
    state: Option<DragState>,
    /// Movement in either axis at or below this is treated as a click.
    noise_threshold: f64,
}

impl DragSession {
    pub fn new(noise_threshold: f64) -> Self {
        Self {
            state: None,
            noise_threshold,
        }
    }

    /// Opens a move/point drag on `annotation`. Rejected while another drag
    /// is active.
    pub fn start_drag(
        &mut self,
        annotation: &Annotation,
        start_position: Point,
        drag_kind: DragKind,
    ) -> SessionResult<()> {
        self.open(annotation, start_position, drag_kind, None)
    }

    /// Opens a drag bound to a specific control point. Resize handles use
    /// [`DragKind::Resize`], vertex handles [`DragKind::Point`].
    pub fn start_control_point_drag(
        &mut self,
        annotation: &Annotation,
        start_position: Point,
        drag_kind: DragKind,
        control_point_id: impl Into<String>,
    ) -> SessionResult<()> {
        self.open(
            annotation,
            start_position,
            drag_kind,
            Some(control_point_id.into()),
        )
    }

    fn open(
        &mut self,
        annotation: &Annotation,
        start_position: Point,
        drag_kind: DragKind,
        control_point_id: Option<String>,
    ) -> SessionResult<()> {
        if let Some(active) = &self.state {
            tracing::warn!(
                active_target = %active.target_id,
                requested_target = %annotation.id,
                "drag start rejected, a drag is already active",
            );
            return Err(SessionError::DragAlreadyActive {
                target_id: active.target_id.clone(),
            });
        }

        tracing::debug!(
            annotation_id = %annotation.id,
            ?drag_kind,
            control_point = control_point_id.as_deref(),
            "drag started",
        );
        self.state = Some(DragState {
            drag_kind,
            start_position,
            current_position: start_position,
            target_id: annotation.id.clone(),
            control_point_id,
            initial_annotation: annotation.clone(),
        });
        Ok(())
    }

    /// Records the pointer position and returns the cumulative delta from
    /// drag start, or `None` when no drag is active.
    pub fn update_drag(&mut self, current_position: Point) -> Option<DragDelta> {
        let state = self.state.as_mut()?;
        state.current_position = current_position;
        Some(DragDelta {
            dx: current_position.x - state.start_position.x,
            dy: current_position.y - state.start_position.y,
        })
    }

    /// Closes the drag. When cumulative movement exceeded the noise
    /// threshold in either axis, returns `final_annotation` for the caller
    /// to commit; below-threshold drags are clicks and commit nothing.
    /// Always clears drag state; a second call is a safe no-op.
    pub fn end_drag(&mut self, final_annotation: Option<Annotation>) -> Option<Annotation> {
        let Some(state) = self.state.take() else {
            tracing::warn!("end_drag called with no drag in progress");
            return None;
        };

        let dx = state.current_position.x - state.start_position.x;
        let dy = state.current_position.y - state.start_position.y;
        let moved = dx.abs() > self.noise_threshold || dy.abs() > self.noise_threshold;
        tracing::debug!(
            annotation_id = %state.target_id,
            drag_kind = ?state.drag_kind,
            dx,
            dy,
            moved,
            "drag ended",
        );

        if moved {
            final_annotation
        } else {
            None
        }
    }

    /// Discards the drag unconditionally. The caller reverts visuals using
    /// the snapshot it took from [`DragSession::initial_annotation`].
    pub fn cancel_drag(&mut self) {
        if let Some(state) = self.state.take() {
            tracing::debug!(annotation_id = %state.target_id, "drag cancelled");
        }
    }

    /// Snapshot translated by `delta`, for move-drag previews. `delta` must
    /// be in the annotation's own coordinate space.
    pub fn apply_movement(&self, delta: DragDelta) -> Option<Annotation> {
        let state = self.state.as_ref()?;
        Some(transform::move_annotation(
            &state.initial_annotation,
            Point::new(delta.dx, delta.dy),
        ))
    }

    /// Snapshot with vertex `index` moved to `new_position`, for point-drag
    /// previews.
    pub fn apply_point_movement(&self, index: usize, new_position: Point) -> Option<Annotation> {
        let state = self.state.as_ref()?;
        Some(transform::move_point(
            &state.initial_annotation,
            index,
            new_position,
        ))
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&DragState> {
        self.state.as_ref()
    }

    pub fn initial_annotation(&self) -> Option<&Annotation> {
        self.state.as_ref().map(|s| &s.initial_annotation)
    }
}
