//! Gesture script format.
//!
//! A script describes a surface, the polygons and grid laid over it, and the
//! input to feed each controller, as JSON:
//!
//! ```json
//! {
//!   "surface": { "width": 200.0, "height": 200.0 },
//!   "polygon_config": { "touch_slop": 4.0 },
//!   "polygons": [{ "vertices": [{ "x": 20.0, "y": 20.0 }, ...] }],
//!   "polygon_steps": [
//!     { "step": "pointer", "event": { "kind": "down", "position": { "x": 100.0, "y": 100.0 } } },
//!     { "step": "wait", "ms": 600 }
//!   ],
//!   "grid": { "config": { "rows": 3, "columns": 4 }, "area": "3,8,0", "steps": [] }
//! }
//! ```

use kurbo::Size;
use polygrid_core::{ConfigError, GridConfig, GridMode, Polygon, PolygonConfig, PointerEvent};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or replaying a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Area error: {0}")]
    Area(#[from] polygrid_core::AreaError),
}

/// One input step for the polygon editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum PolygonStep {
    Pointer { event: PointerEvent },
    /// Advance the clock and poll the pending long press.
    Wait { ms: u64 },
}

/// One input step for the grid selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum GridStep {
    Pointer { event: PointerEvent },
    Mode { mode: GridMode },
    Clear,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GridScript {
    pub config: GridConfig,
    /// Area text merged into the grid before the steps run.
    pub area: Option<String>,
    pub steps: Vec<GridStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    pub surface: Size,
    pub polygon_config: PolygonConfig,
    /// Config file, relative to the script. Replaces `polygon_config`.
    pub polygon_config_file: Option<PathBuf>,
    pub polygons: Vec<Polygon>,
    pub polygon_steps: Vec<PolygonStep>,
    pub grid: Option<GridScript>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            surface: Size::new(400.0, 400.0),
            polygon_config: PolygonConfig::default(),
            polygon_config_file: None,
            polygons: Vec::new(),
            polygon_steps: Vec::new(),
            grid: None,
        }
    }
}

impl Script {
    pub fn from_json_str(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a script file and resolve its config file, if any.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let json = std::fs::read_to_string(path)?;
        let mut script = Self::from_json_str(&json)?;

        if let Some(file) = &script.polygon_config_file {
            let file = match path.parent() {
                Some(dir) if file.is_relative() => dir.join(file),
                _ => file.clone(),
            };
            log::debug!("loading polygon config from {}", file.display());
            script.polygon_config = PolygonConfig::load(&file)?;
        }
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_minimal_script() {
        let script = Script::from_json_str("{}").unwrap();
        assert_eq!(script.surface, Size::new(400.0, 400.0));
        assert!(script.polygons.is_empty());
        assert!(script.grid.is_none());
    }

    #[test]
    fn test_parse_steps() {
        let json = r#"{
            "polygons": [{ "vertices": [{"x": 0.0, "y": 0.0}, {"x": 10.0, "y": 0.0}, {"x": 10.0, "y": 10.0}] }],
            "polygon_steps": [
                { "step": "pointer", "event": { "kind": "down", "position": {"x": 5.0, "y": 2.0} } },
                { "step": "wait", "ms": 250 }
            ],
            "grid": {
                "config": { "rows": 2, "columns": 2 },
                "steps": [{ "step": "mode", "mode": "Erase" }, { "step": "clear" }]
            }
        }"#;
        let script = Script::from_json_str(json).unwrap();

        assert_eq!(script.polygons[0].len(), 3);
        assert_eq!(
            script.polygon_steps,
            vec![
                PolygonStep::Pointer {
                    event: PointerEvent::down(5.0, 2.0)
                },
                PolygonStep::Wait { ms: 250 },
            ]
        );
        let grid = script.grid.unwrap();
        assert_eq!(grid.config.rows, 2);
        assert_eq!(
            grid.steps,
            vec![GridStep::Mode { mode: GridMode::Erase }, GridStep::Clear]
        );
    }

    #[test]
    fn test_demo_script_parses() {
        let script = Script::from_json_str(include_str!("../../../demos/square.json")).unwrap();
        assert_eq!(script.polygons[0].label(), Some("square"));
        assert_eq!(script.polygon_config.long_press_timeout_ms, 400);
        assert_eq!(script.grid.unwrap().steps.len(), 4);
    }

    #[test]
    fn test_load_resolves_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = std::fs::File::create(dir.path().join("editor.json")).unwrap();
        config.write_all(br#"{"touch_slop": 2.0}"#).unwrap();

        let script_path = dir.path().join("script.json");
        std::fs::write(&script_path, r#"{"polygon_config_file": "editor.json"}"#).unwrap();

        let script = Script::load(&script_path).unwrap();
        assert_eq!(script.polygon_config.touch_slop, 2.0);
    }

    #[test]
    fn test_load_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Script::load(&dir.path().join("missing.json")),
            Err(ScriptError::Io(_))
        ));

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Script::load(&path), Err(ScriptError::Parse(_))));

        std::fs::write(&path, r#"{"polygon_config_file": "nope.json"}"#).unwrap();
        assert!(matches!(Script::load(&path), Err(ScriptError::Config(_))));
    }
}
