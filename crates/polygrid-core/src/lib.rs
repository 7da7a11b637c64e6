//! Polygrid Core Library
//!
//! Platform-agnostic interaction and geometry core for two drawing widgets:
//! a draggable polygon editor and a grid-cell area selector. Hosts feed
//! pointer events in, render the models, and persist grid selections as area
//! text.

pub mod area;
pub mod callbacks;
pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod grid_controller;
pub mod init;
pub mod input;
pub mod polygon;
pub mod polygon_controller;

pub use callbacks::Callbacks;
pub use config::{GridConfig, PolygonConfig};
pub use error::{AreaError, AreaResult, ConfigError};
pub use geometry::Extrema;
pub use grid::{Grid, GridMode};
pub use grid_controller::GridController;
pub use init::init;
pub use input::PointerEvent;
pub use polygon::{Polygon, PolygonId, PolygonRecord};
pub use polygon_controller::{InteractionState, LongPressTicket, PolygonController};
