//! Layered canvas storage and final composition.
//!
//! Rendering is split across three same-sized RGBA layers so that moving a
//! control point does not force the base image to repaint. Layers composite
//! bottom-up into a single frame: base, then annotations, then controls.

use image::{imageops, Rgba, RgbaImage};

/// The three layers, in composition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Background image or screenshot.
    Base,
    /// Committed annotation shapes.
    Annotation,
    /// Control points, selection outlines and hover highlights.
    Control,
}

impl LayerKind {
    pub const ALL: [LayerKind; 3] = [LayerKind::Base, LayerKind::Annotation, LayerKind::Control];
}

/// Owns the layer bitmaps plus a per-layer dirty flag the renderer uses to
/// skip repainting layers whose content has not changed.
#[derive(Debug, Clone)]
pub struct CanvasLayers {
    width: u32,
    height: u32,
    base: RgbaImage,
    annotation: RgbaImage,
    control: RgbaImage,
    dirty: [bool; 3],
}

impl CanvasLayers {
    /// Allocates all three layers transparent at the given size. Every layer
    /// starts dirty so the first frame paints everything.
    pub fn new(width: u32, height: u32) -> Self {
        tracing::debug!(width, height, "initializing canvas layers");
        Self {
            width,
            height,
            base: RgbaImage::new(width, height),
            annotation: RgbaImage::new(width, height),
            control: RgbaImage::new(width, height),
            dirty: [true; 3],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reallocates every layer at a new size, discarding prior content. The
    /// caller is expected to repaint; all layers are marked dirty.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        tracing::debug!(width, height, "resizing canvas layers");
        self.width = width;
        self.height = height;
        self.base = RgbaImage::new(width, height);
        self.annotation = RgbaImage::new(width, height);
        self.control = RgbaImage::new(width, height);
        self.dirty = [true; 3];
    }

    pub fn layer(&self, kind: LayerKind) -> &RgbaImage {
        match kind {
            LayerKind::Base => &self.base,
            LayerKind::Annotation => &self.annotation,
            LayerKind::Control => &self.control,
        }
    }

    /// Mutable access to a layer's pixels. Marks the layer dirty, since the
    /// caller is about to draw into it.
    pub fn layer_mut(&mut self, kind: LayerKind) -> &mut RgbaImage {
        self.dirty[Self::index(kind)] = true;
        match kind {
            LayerKind::Base => &mut self.base,
            LayerKind::Annotation => &mut self.annotation,
            LayerKind::Control => &mut self.control,
        }
    }

    /// Resets a layer to fully transparent.
    pub fn clear_layer(&mut self, kind: LayerKind) {
        let layer = self.layer_mut(kind);
        for pixel in layer.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    pub fn mark_dirty(&mut self, kind: LayerKind) {
        self.dirty[Self::index(kind)] = true;
    }

    pub fn mark_clean(&mut self, kind: LayerKind) {
        self.dirty[Self::index(kind)] = false;
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty = [true; 3];
    }

    pub fn is_dirty(&self, kind: LayerKind) -> bool {
        self.dirty[Self::index(kind)]
    }

    pub fn any_dirty(&self) -> bool {
        self.dirty.iter().any(|d| *d)
    }

    /// Flattens the layers bottom-up into a fresh frame and marks every
    /// layer clean.
    pub fn composite(&mut self) -> RgbaImage {
        let mut frame = RgbaImage::new(self.width, self.height);
        imageops::overlay(&mut frame, &self.base, 0, 0);
        imageops::overlay(&mut frame, &self.annotation, 0, 0);
        imageops::overlay(&mut frame, &self.control, 0, 0);
        self.dirty = [false; 3];
        frame
    }

    /// Releases the layer bitmaps, shrinking to a zero-sized canvas.
    pub fn cleanup(&mut self) {
        self.resize(0, 0);
    }

    fn index(kind: LayerKind) -> usize {
        match kind {
            LayerKind::Base => 0,
            LayerKind::Annotation => 1,
            LayerKind::Control => 2,
        }
    }
}
