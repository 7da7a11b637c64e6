//! Polygrid host shell
//!
//! A headless host for the polygrid controllers: loads a gesture script,
//! feeds it through the polygon editor and the grid selector, and reports the
//! resulting models and callbacks.

mod replay;
mod script;

pub use replay::{CallbackEvent, GridReport, Report, run};
pub use script::{GridScript, GridStep, PolygonStep, Script, ScriptError};

/// Load the script at `path` and replay it.
pub fn run_file(path: &std::path::Path) -> Result<Report, ScriptError> {
    let script = Script::load(path)?;
    log::info!(
        "replaying {} ({} polygon steps)",
        path.display(),
        script.polygon_steps.len()
    );
    run(script)
}
