use thiserror::Error;

pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Re-entrancy violations. One drag and one text edit may be open at a time;
/// a second start is rejected and the first session stays authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a drag is already active on annotation {target_id}")]
    DragAlreadyActive { target_id: String },

    #[error("a text edit is already active on annotation {annotation_id}")]
    TextEditAlreadyActive { annotation_id: String },
}
