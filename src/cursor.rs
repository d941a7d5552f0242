//! Cursor policy: maps the current interaction context to exactly one
//! cursor indicator using a fixed precedence.

use crate::annotation::{Annotation, AnnotationKind, ControlPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    Default,
    Move,
    Text,
    Crosshair,
    Grab,
    Grabbing,
    ZoomIn,
    ZoomOut,
    ResizeN,
    ResizeS,
    ResizeE,
    ResizeW,
    ResizeNe,
    ResizeNw,
    ResizeSe,
    ResizeSw,
}

impl CursorKind {
    /// CSS cursor name, for viewers that drive a platform cursor.
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Move => "move",
            Self::Text => "text",
            Self::Crosshair => "crosshair",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
            Self::ZoomIn => "zoom-in",
            Self::ZoomOut => "zoom-out",
            Self::ResizeN => "n-resize",
            Self::ResizeS => "s-resize",
            Self::ResizeE => "e-resize",
            Self::ResizeW => "w-resize",
            Self::ResizeNe => "ne-resize",
            Self::ResizeNw => "nw-resize",
            Self::ResizeSe => "se-resize",
            Self::ResizeSw => "sw-resize",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveTool {
    Select,
    Pan,
    Zoom,
    Draw(AnnotationKind),
}

/// Interaction context fed to [`resolve`]. Fields are ordered by precedence.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorContext<'a> {
    pub is_dragging: bool,
    pub drawing: Option<AnnotationKind>,
    pub hovered_control_point: Option<&'a ControlPoint>,
    pub hovered_annotation: Option<&'a Annotation>,
    pub active_tool: Option<ActiveTool>,
}

/// Resolves the one cursor for the given context:
/// dragging > drawing > hovered control point > hovered annotation >
/// active tool > default.
pub fn resolve(context: CursorContext<'_>) -> CursorKind {
    if context.is_dragging {
        return CursorKind::Grabbing;
    }
    if let Some(kind) = context.drawing {
        return drawing_cursor(kind);
    }
    if let Some(control_point) = context.hovered_control_point {
        return control_point.cursor;
    }
    if let Some(annotation) = context.hovered_annotation {
        return annotation_hover_cursor(annotation);
    }
    if let Some(tool) = context.active_tool {
        return match tool {
            ActiveTool::Pan => CursorKind::Grab,
            ActiveTool::Zoom => CursorKind::ZoomIn,
            ActiveTool::Draw(kind) => drawing_cursor(kind),
            ActiveTool::Select => CursorKind::Default,
        };
    }
    CursorKind::Default
}

pub const fn drawing_cursor(kind: AnnotationKind) -> CursorKind {
    match kind {
        AnnotationKind::Text => CursorKind::Text,
        _ => CursorKind::Crosshair,
    }
}

pub const fn annotation_hover_cursor(annotation: &Annotation) -> CursorKind {
    match annotation.kind {
        AnnotationKind::Text => CursorKind::Text,
        _ => CursorKind::Move,
    }
}

/// Resize cursor for an arbitrary angle (degrees, counter-clockwise from
/// east): eight 45-degree compass sectors centered on the cardinal and
/// intercardinal directions.
pub fn resize_cursor_from_angle(angle_degrees: f64) -> CursorKind {
    let normalized = ((angle_degrees % 360.0) + 360.0) % 360.0;
    if !(22.5..337.5).contains(&normalized) {
        CursorKind::ResizeE
    } else if normalized < 67.5 {
        CursorKind::ResizeNe
    } else if normalized < 112.5 {
        CursorKind::ResizeN
    } else if normalized < 157.5 {
        CursorKind::ResizeNw
    } else if normalized < 202.5 {
        CursorKind::ResizeW
    } else if normalized < 247.5 {
        CursorKind::ResizeSw
    } else if normalized < 292.5 {
        CursorKind::ResizeS
    } else {
        CursorKind::ResizeSe
    }
}
