//! Replay a gesture script and print the resulting state as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    polygrid_core::init();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: polygrid <script.json>");
        return ExitCode::FAILURE;
    };

    let report = match polygrid_app::run_file(&path) {
        Ok(report) => report,
        Err(err) => {
            log::error!("replay failed: {err}");
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to serialize report: {err}");
            ExitCode::FAILURE
        }
    }
}
