//! Annotation geometry and interaction engine for image viewers.
//!
//! The crate models annotations as normalized image-space point sets and
//! provides the interaction machinery a canvas front end needs: control
//! point generation, hit testing, cursor resolution, drag and text-edit
//! sessions, bounded undo/redo, dirty-region tracking and layered
//! composition. It owns no event loop and draws nothing itself; the host
//! feeds it pointer input and renders from the state it returns.

pub mod annotation;
pub mod config;
pub mod cursor;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod render;
pub mod session;

pub use annotation::{Annotation, AnnotationCollection, AnnotationKind, ControlPoint};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use geometry::{BoundingBox, Point, Rect};
pub use session::EditorSession;
