//! Inline text edit session for text and label annotations.

use crate::annotation::{Annotation, AnnotationCollection};
use crate::geometry::Point;

use super::error::{SessionError, SessionResult};

#[derive(Debug, Clone, PartialEq)]
pub struct TextEditorState {
    pub annotation_id: String,
    pub position: Point,
    pub initial_text: String,
    pub current_text: String,
}

/// One edit session at a time; save or cancel resolves it.
#[derive(Debug, Default)]
pub struct TextEditSession {
    state: Option<TextEditorState>,
}

impl TextEditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an edit session on `annotation`. Rejected while another edit is
    /// active.
    pub fn start_edit(&mut self, annotation: &Annotation, position: Point) -> SessionResult<()> {
        if let Some(active) = &self.state {
            tracing::warn!(
                active_annotation = %active.annotation_id,
                requested_annotation = %annotation.id,
                "text edit start rejected, an edit is already active",
            );
            return Err(SessionError::TextEditAlreadyActive {
                annotation_id: active.annotation_id.clone(),
            });
        }

        let initial_text = annotation.text.clone().unwrap_or_default();
        tracing::debug!(annotation_id = %annotation.id, "text edit started");
        self.state = Some(TextEditorState {
            annotation_id: annotation.id.clone(),
            position,
            current_text: initial_text.clone(),
            initial_text,
        });
        Ok(())
    }

    /// Replaces the in-progress text. Warns and does nothing when no edit is
    /// active.
    pub fn update_text(&mut self, text: impl Into<String>) {
        match self.state.as_mut() {
            Some(state) => state.current_text = text.into(),
            None => tracing::warn!("cannot update text, no edit in progress"),
        }
    }

    /// Resolves the session: looks up the live annotation and returns it
    /// with the new text for the caller to commit. A vanished annotation is
    /// treated as a cancel. Clears the session either way.
    pub fn save_edit(&mut self, annotations: &AnnotationCollection) -> Option<Annotation> {
        let Some(state) = self.state.take() else {
            tracing::warn!("cannot save text, no edit in progress");
            return None;
        };

        let Some(annotation) = annotations.get(&state.annotation_id) else {
            tracing::warn!(
                annotation_id = %state.annotation_id,
                "annotation vanished during edit, treating save as cancel",
            );
            return None;
        };

        tracing::debug!(
            annotation_id = %state.annotation_id,
            old_text = %state.initial_text,
            new_text = %state.current_text,
            "text edit saved",
        );
        let mut updated = annotation.clone();
        updated.text = Some(state.current_text);
        updated.touch();
        Some(updated)
    }

    /// Discards the session without producing a change.
    pub fn cancel_edit(&mut self) {
        if let Some(state) = self.state.take() {
            tracing::debug!(
                annotation_id = %state.annotation_id,
                discarded_text = %state.current_text,
                "text edit cancelled",
            );
        }
    }

    pub fn is_editing(&self) -> bool {
        self.state.is_some()
    }

    pub fn has_changes(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| state.current_text != state.initial_text)
    }

    pub fn state(&self) -> Option<&TextEditorState> {
        self.state.as_ref()
    }

    pub fn editing_annotation_id(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.annotation_id.as_str())
    }
}
