//! Engine tuning knobs loaded from JSON, falling back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Interaction and rendering thresholds. Every field defaults independently,
/// so a partial config file only overrides what it names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hit radius around a control point, in canvas pixels.
    pub control_point_hit_radius: f64,
    /// Distance from an annotation outline that still counts as a hit.
    pub edge_hit_threshold: f64,
    /// Smallest width/height or radius a resize may produce, in image space.
    pub min_resize_size: f64,
    /// Per-axis movement below which an ended drag is discarded as noise.
    pub drag_noise_threshold: f64,
    /// Maximum number of undoable entries retained.
    pub history_depth: usize,
    /// Margin added around each recorded dirty region, in canvas pixels.
    pub dirty_margin: f64,
    /// Gap under which two dirty regions merge, in canvas pixels.
    pub dirty_merge_threshold: f64,
    /// Dirty coverage fraction above which a full repaint is preferred.
    pub full_redraw_fraction: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            control_point_hit_radius: 15.0,
            edge_hit_threshold: 10.0,
            min_resize_size: 0.01,
            drag_noise_threshold: 1.0,
            history_depth: 50,
            dirty_margin: 5.0,
            dirty_merge_threshold: 50.0,
            full_redraw_fraction: 0.5,
        }
    }
}

impl EngineConfig {
    /// Parses a config from JSON, with a logged fallback to defaults on
    /// malformed input.
    pub fn from_json_str(contents: &str) -> Self {
        serde_json::from_str(contents).unwrap_or_else(|err| {
            tracing::warn!(?err, "failed to parse engine config; using defaults");
            Self::default()
        })
    }

    /// Loads a config file. A missing or unreadable file yields defaults,
    /// matching the parse fallback.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json_str(&contents),
            Err(err) => {
                tracing::warn!(?err, ?path, "failed to read engine config; using defaults");
                Self::default()
            }
        }
    }
}
