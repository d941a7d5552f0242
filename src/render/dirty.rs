//! Dirty-region accumulation between redraws.
//!
//! Regions are expanded by a small margin when recorded so that strokes and
//! control point handles drawn just outside an annotation's bounds are
//! repainted too. Nearby regions merge until no further pair qualifies, which
//! keeps the per-frame rect count low during drags.

use crate::config::EngineConfig;
use crate::geometry::{Point, Rect};

#[derive(Debug, Clone)]
pub struct DirtyRegionTracker {
    regions: Vec<Rect>,
    margin: f64,
    merge_threshold: f64,
}

impl DirtyRegionTracker {
    pub fn new(margin: f64, merge_threshold: f64) -> Self {
        Self {
            regions: Vec::new(),
            margin,
            merge_threshold,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.dirty_margin, config.dirty_merge_threshold)
    }

    /// Records a region needing repaint. The rect is expanded by the margin
    /// before merging; degenerate rects are ignored.
    pub fn mark_dirty(&mut self, region: Rect) {
        if region.width <= 0.0 || region.height <= 0.0 {
            tracing::debug!(?region, "ignoring degenerate dirty region");
            return;
        }
        self.regions.push(region.expanded(self.margin));
        self.coalesce();
    }

    /// Merges every pair of regions whose expanded bounds are within the
    /// merge threshold, repeating until a pass makes no change.
    fn coalesce(&mut self) {
        loop {
            let mut merged_any = false;
            let mut i = 0;
            while i < self.regions.len() {
                let mut j = i + 1;
                while j < self.regions.len() {
                    if self.should_merge(self.regions[i], self.regions[j]) {
                        let other = self.regions.swap_remove(j);
                        self.regions[i] = self.regions[i].union(&other);
                        merged_any = true;
                    } else {
                        j += 1;
                    }
                }
                i += 1;
            }
            if !merged_any {
                break;
            }
        }
    }

    fn should_merge(&self, a: Rect, b: Rect) -> bool {
        a.expanded(self.merge_threshold).intersects(&b)
    }

    pub fn dirty_rects(&self) -> &[Rect] {
        &self.regions
    }

    pub fn has_dirty(&self) -> bool {
        !self.regions.is_empty()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn is_point_dirty(&self, point: Point) -> bool {
        self.regions.iter().any(|r| r.contains(point))
    }

    pub fn is_rect_dirty(&self, rect: Rect) -> bool {
        self.regions.iter().any(|r| r.intersects(&rect))
    }

    /// Sum of the tracked region areas. Overlap between merged survivors is
    /// rare, so this is treated as a good-enough coverage estimate.
    pub fn total_dirty_area(&self) -> f64 {
        self.regions.iter().map(Rect::area).sum()
    }

    /// Whether accumulated damage covers enough of the canvas that a full
    /// repaint is cheaper than clipping to each region.
    pub fn should_redraw_all(&self, width: f64, height: f64, fraction: f64) -> bool {
        let canvas_area = width * height;
        if canvas_area <= 0.0 {
            return true;
        }
        self.total_dirty_area() >= canvas_area * fraction
    }
}
