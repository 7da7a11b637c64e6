//! Optional host callbacks fired by the polygon controller.
//!
//! Each event kind has at most one handler. Registering a handler replaces the
//! previous one.

use std::fmt;

type IndexCallback = Box<dyn FnMut(usize)>;
type ChangeCallback = Box<dyn FnMut(usize, bool)>;

/// Handlers for polygon gestures, keyed by the polygon's collection index.
#[derive(Default)]
pub struct Callbacks {
    on_track_start: Option<IndexCallback>,
    on_changed: Option<ChangeCallback>,
    on_track_stop: Option<IndexCallback>,
    on_click: Option<IndexCallback>,
    on_long_click: Option<IndexCallback>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gesture grabbed polygon `index`.
    pub fn on_track_start(&mut self, f: impl FnMut(usize) + 'static) {
        self.on_track_start = Some(Box::new(f));
    }

    /// Polygon `index` changed. `from_user` is false for programmatic edits.
    pub fn on_changed(&mut self, f: impl FnMut(usize, bool) + 'static) {
        self.on_changed = Some(Box::new(f));
    }

    /// The gesture on polygon `index` ended.
    pub fn on_track_stop(&mut self, f: impl FnMut(usize) + 'static) {
        self.on_track_stop = Some(Box::new(f));
    }

    pub fn on_click(&mut self, f: impl FnMut(usize) + 'static) {
        self.on_click = Some(Box::new(f));
    }

    pub fn on_long_click(&mut self, f: impl FnMut(usize) + 'static) {
        self.on_long_click = Some(Box::new(f));
    }

    /// Drop every handler.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn has_long_click(&self) -> bool {
        self.on_long_click.is_some()
    }

    pub(crate) fn track_start(&mut self, index: usize) {
        if let Some(f) = self.on_track_start.as_mut() {
            f(index);
        }
    }

    pub(crate) fn changed(&mut self, index: usize, from_user: bool) {
        if let Some(f) = self.on_changed.as_mut() {
            f(index, from_user);
        }
    }

    pub(crate) fn track_stop(&mut self, index: usize) {
        if let Some(f) = self.on_track_stop.as_mut() {
            f(index);
        }
    }

    pub(crate) fn click(&mut self, index: usize) {
        if let Some(f) = self.on_click.as_mut() {
            f(index);
        }
    }

    pub(crate) fn long_click(&mut self, index: usize) {
        if let Some(f) = self.on_long_click.as_mut() {
            f(index);
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_track_start", &self.on_track_start.is_some())
            .field("on_changed", &self.on_changed.is_some())
            .field("on_track_stop", &self.on_track_stop.is_some())
            .field("on_click", &self.on_click.is_some())
            .field("on_long_click", &self.on_long_click.is_some())
            .finish()
    }
}
