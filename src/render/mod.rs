//! Rendering support: dirty-region tracking and layered composition.

pub mod compositor;
pub mod dirty;

pub use compositor::{CanvasLayers, LayerKind};
pub use dirty::DirtyRegionTracker;
