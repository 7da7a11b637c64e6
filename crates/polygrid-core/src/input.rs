//! Pointer events fed to the controllers by the host surface.

use kurbo::Point;
use serde::{Deserialize, Serialize};

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;

/// Pointer event type for unified mouse/touch handling.
///
/// `pointers` is the number of pointers down when the event was produced.
/// The drag controllers only process single-pointer gestures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down {
        position: Point,
        #[serde(default = "single_pointer")]
        pointers: usize,
    },
    Move {
        position: Point,
        #[serde(default = "single_pointer")]
        pointers: usize,
    },
    Up {
        position: Point,
    },
    Cancel {
        position: Point,
    },
}

fn single_pointer() -> usize {
    1
}

impl PointerEvent {
    /// Single-pointer press.
    pub fn down(x: f64, y: f64) -> Self {
        Self::Down {
            position: Point::new(x, y),
            pointers: 1,
        }
    }

    /// Single-pointer move.
    pub fn moved(x: f64, y: f64) -> Self {
        Self::Move {
            position: Point::new(x, y),
            pointers: 1,
        }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::Up {
            position: Point::new(x, y),
        }
    }

    pub fn position(&self) -> Point {
        match *self {
            Self::Down { position, .. }
            | Self::Move { position, .. }
            | Self::Up { position }
            | Self::Cancel { position } => position,
        }
    }

    /// Whether this event belongs to a multi-touch gesture.
    pub fn is_multi_touch(&self) -> bool {
        match *self {
            Self::Down { pointers, .. } | Self::Move { pointers, .. } => pointers > 1,
            Self::Up { .. } | Self::Cancel { .. } => false,
        }
    }
}
