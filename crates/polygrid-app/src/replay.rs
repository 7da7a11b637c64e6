//! Script replay against the two controllers.

use crate::script::{GridScript, GridStep, PolygonStep, Script, ScriptError};
use kurbo::Size;
use polygrid_core::input::Instant;
use polygrid_core::{Grid, GridController, Polygon, PolygonController};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// A callback delivered by the polygon editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CallbackEvent {
    TrackStart { polygon: usize },
    Changed { polygon: usize, from_user: bool },
    TrackStop { polygon: usize },
    Click { polygon: usize },
    LongClick { polygon: usize },
}

#[derive(Debug, Clone, Serialize)]
pub struct GridReport {
    pub area: String,
    pub filled_cells: Vec<(usize, usize)>,
}

/// Final state after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub events: Vec<CallbackEvent>,
    pub polygons: Vec<Polygon>,
    pub selected: Vec<usize>,
    pub grid: Option<GridReport>,
}

/// Run every step of `script` and collect the outcome.
pub fn run(script: Script) -> Result<Report, ScriptError> {
    let events = Rc::new(RefCell::new(Vec::new()));

    let mut editor = PolygonController::new(script.polygon_config);
    editor.set_surface_size(script.surface);
    editor.add_all(script.polygons);
    record_callbacks(&mut editor, &events);

    let mut now = Instant::now();
    for step in script.polygon_steps {
        match step {
            PolygonStep::Pointer { event } => {
                let consumed = editor.handle_pointer_event(event, now);
                log::debug!("{event:?} consumed: {consumed}");
            }
            PolygonStep::Wait { ms } => {
                now += Duration::from_millis(ms);
                editor.poll_long_press(now);
            }
        }
    }

    let grid = match script.grid {
        Some(grid) => Some(run_grid(grid, script.surface)?),
        None => None,
    };

    let events = events.borrow().clone();
    Ok(Report {
        events,
        selected: editor.selected_indices(),
        polygons: editor.polygons().to_vec(),
        grid,
    })
}

fn record_callbacks(editor: &mut PolygonController, events: &Rc<RefCell<Vec<CallbackEvent>>>) {
    let callbacks = editor.callbacks_mut();

    let log = events.clone();
    callbacks.on_track_start(move |polygon| {
        log.borrow_mut().push(CallbackEvent::TrackStart { polygon });
    });
    let log = events.clone();
    callbacks.on_changed(move |polygon, from_user| {
        log.borrow_mut()
            .push(CallbackEvent::Changed { polygon, from_user });
    });
    let log = events.clone();
    callbacks.on_track_stop(move |polygon| {
        log.borrow_mut().push(CallbackEvent::TrackStop { polygon });
    });
    let log = events.clone();
    callbacks.on_click(move |polygon| {
        log.borrow_mut().push(CallbackEvent::Click { polygon });
    });
    let log = events.clone();
    callbacks.on_long_click(move |polygon| {
        log.borrow_mut().push(CallbackEvent::LongClick { polygon });
    });
}

fn run_grid(script: GridScript, surface: Size) -> Result<GridReport, ScriptError> {
    let grid = Grid::new(script.config.rows, script.config.columns).with_size(surface);
    let mut selector = GridController::new(grid);
    selector.show_stroke(script.config.show_stroke);

    if let Some(area) = &script.area {
        selector.load_area(area)?;
    }

    for step in script.steps {
        match step {
            GridStep::Pointer { event } => {
                selector.handle_pointer_event(event);
            }
            GridStep::Mode { mode } => selector.set_mode(mode),
            GridStep::Clear => selector.clear_all(),
        }
    }

    Ok(GridReport {
        area: selector.area(),
        filled_cells: selector.grid().filled_cells().collect(),
    })
}
