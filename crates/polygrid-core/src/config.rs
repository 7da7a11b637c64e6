//! Tunables for the two controllers.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default half-size of the square window around a vertex, in pixels.
pub const DEFAULT_VERTEX_TOLERANCE: f64 = 20.0;
/// Samples further than this from the previous one are treated as
/// multi-touch glitches.
pub const DEFAULT_JUMP_THRESHOLD: f64 = 100.0;
/// Movement allowed before a tap becomes a drag.
pub const DEFAULT_TOUCH_SLOP: f64 = 8.0;
pub const DEFAULT_LONG_PRESS_TIMEOUT_MS: u64 = 500;

/// Polygon editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolygonConfig {
    pub vertex_tolerance: f64,
    pub jump_threshold: f64,
    pub touch_slop: f64,
    pub long_press_timeout_ms: u64,
    /// Allow vertices and shapes to leave the surface.
    pub allow_drag_out_of_bounds: bool,
    /// Track selection per polygon instead of a single index.
    pub multiple_selection: bool,
    /// A tap toggles (multi) or sets (single) the selection.
    pub click_toggles_selection: bool,
    /// Only the selected polygon can be dragged.
    pub drag_requires_selection: bool,
    /// Vertices can be grabbed and moved.
    pub vertex_editing: bool,
    /// Whole polygons can be grabbed and moved.
    pub shape_dragging: bool,
}

impl Default for PolygonConfig {
    fn default() -> Self {
        Self {
            vertex_tolerance: DEFAULT_VERTEX_TOLERANCE,
            jump_threshold: DEFAULT_JUMP_THRESHOLD,
            touch_slop: DEFAULT_TOUCH_SLOP,
            long_press_timeout_ms: DEFAULT_LONG_PRESS_TIMEOUT_MS,
            allow_drag_out_of_bounds: false,
            multiple_selection: false,
            click_toggles_selection: true,
            drag_requires_selection: false,
            vertex_editing: true,
            shape_dragging: true,
        }
    }
}

impl PolygonConfig {
    pub fn long_press_timeout(&self) -> Duration {
        Duration::from_millis(self.long_press_timeout_ms)
    }

    /// Parse a JSON config. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Grid selector configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: usize,
    pub columns: usize,
    /// Keep the finished lasso stroke available for display.
    pub show_stroke: bool,
}
