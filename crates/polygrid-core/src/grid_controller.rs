//! Paint, erase and lasso-fill cells of a [`Grid`] from pointer input.

use crate::area;
use crate::error::AreaResult;
use crate::geometry;
use crate::grid::{Grid, GridMode};
use crate::input::PointerEvent;
use kurbo::{BezPath, Point, Rect, Size};

/// Drives a [`Grid`] from pointer gestures.
///
/// Every sample of a drag applies the current mode to the cell under it.
/// The samples are also collected into a freehand stroke; on release the
/// stroke is closed and every cell whose center falls inside it gets the mode
/// applied too.
#[derive(Debug, Clone, Default)]
pub struct GridController {
    grid: Grid,
    stroke: Vec<Point>,
    painting: bool,
    show_stroke: bool,
    redraw_requested: bool,
}

impl GridController {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            ..Self::default()
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn is_painting(&self) -> bool {
        self.painting
    }

    pub fn mode(&self) -> GridMode {
        self.grid.mode()
    }

    pub fn set_mode(&mut self, mode: GridMode) {
        self.grid.set_mode(mode);
    }

    pub fn set_surface_size(&mut self, size: Size) {
        self.grid.set_size(size);
        self.request_redraw();
    }

    /// Keep the finished stroke visible after release.
    pub fn show_stroke(&mut self, show: bool) {
        self.show_stroke = show;
        self.request_redraw();
    }

    /// Return and clear the pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    /// Empty every cell and drop the stroke. Dimensions are kept.
    pub fn clear_all(&mut self) {
        self.grid.clear();
        self.stroke.clear();
        self.painting = false;
        self.request_redraw();
    }

    /// Change the grid dimensions. Every cell starts empty.
    pub fn resize(&mut self, rows: usize, columns: usize) {
        self.grid.resize(rows, columns);
        self.stroke.clear();
        self.painting = false;
        self.request_redraw();
    }

    /// Dispatch a pointer event. Returns whether the event was consumed.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> bool {
        if event.is_multi_touch() {
            return false;
        }
        match event {
            PointerEvent::Down { position, .. } => self.press(position),
            PointerEvent::Move { position, .. } => self.move_to(position),
            PointerEvent::Up { position } => self.release(position),
            PointerEvent::Cancel { .. } => self.cancel(),
        }
    }

    /// Start a stroke. Returns `false` when the grid has no cells.
    pub fn press(&mut self, point: Point) -> bool {
        if !self.grid.is_editable() {
            return false;
        }
        let point = self.clamp(point);
        log::debug!("grid press at {point:?}");

        self.stroke.clear();
        self.stroke.push(point);
        self.painting = true;
        self.paint_at(point);
        self.request_redraw();
        true
    }

    /// Extend the stroke and paint the cell under `point`.
    pub fn move_to(&mut self, point: Point) -> bool {
        if !self.painting {
            return false;
        }
        let point = self.clamp(point);
        log::trace!("grid move to {point:?}");

        self.stroke.push(point);
        self.paint_at(point);
        self.request_redraw();
        true
    }

    /// Close the stroke and lasso-fill the cells inside it.
    pub fn release(&mut self, point: Point) -> bool {
        if !self.painting {
            return false;
        }
        let point = self.clamp(point);
        self.stroke.push(point);
        self.painting = false;

        let changed = self.lasso_fill();
        log::debug!("grid release, lasso changed {changed} cells");
        self.request_redraw();
        true
    }

    /// Drop the stroke without filling. Cells painted so far stay painted.
    pub fn cancel(&mut self) -> bool {
        if !self.painting {
            return false;
        }
        self.painting = false;
        self.stroke.clear();
        self.request_redraw();
        true
    }

    /// Samples of the current or last stroke.
    pub fn stroke(&self) -> &[Point] {
        &self.stroke
    }

    /// Path of the current or last stroke; closed once the gesture ended.
    pub fn stroke_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some((first, rest)) = self.stroke.split_first() else {
            return path;
        };
        path.move_to(*first);
        for point in rest {
            path.line_to(*point);
        }
        if !self.painting {
            path.close_path();
        }
        path
    }

    /// The stroke to draw, honouring [`GridController::show_stroke`].
    pub fn visible_stroke(&self) -> Option<BezPath> {
        (self.show_stroke && !self.stroke.is_empty()).then(|| self.stroke_path())
    }

    pub fn filled_rects(&self) -> Vec<Rect> {
        self.grid.filled_rects()
    }

    /// Export the fill matrix as area text.
    pub fn area(&self) -> String {
        area::encode(&self.grid)
    }

    /// Merge area text into the fill matrix.
    pub fn load_area(&mut self, text: &str) -> AreaResult<()> {
        area::decode(&mut self.grid, text)?;
        self.request_redraw();
        Ok(())
    }

    /// Clamp into the surface. The far edges map onto the last pixel so they
    /// still land in the last row/column.
    fn clamp(&self, point: Point) -> Point {
        let size = self.grid.size();
        let axis = |v: f64, max: f64| {
            if v >= max {
                (max - 1.0).max(0.0)
            } else if v < 0.0 {
                0.0
            } else {
                v
            }
        };
        Point::new(axis(point.x, size.width), axis(point.y, size.height))
    }

    fn paint_at(&mut self, point: Point) {
        if let Some((row, column)) = self.grid.cell_at(point) {
            self.grid.apply(row, column);
        }
    }

    fn lasso_fill(&mut self) -> usize {
        let Some(bounds) = geometry::bounding_rect(&self.stroke) else {
            return 0;
        };

        let mut changed = 0;
        for row in 0..self.grid.rows() {
            for column in 0..self.grid.columns() {
                let center = self.grid.cell_center(row, column);
                if !bounds.contains(center) {
                    continue;
                }
                if geometry::point_in_polygon(&self.stroke, center) && self.grid.apply(row, column)
                {
                    changed += 1;
                }
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(rows: usize, columns: usize, width: f64, height: f64) -> GridController {
        GridController::new(Grid::new(rows, columns).with_size(Size::new(width, height)))
    }

    fn filled(c: &GridController) -> Vec<(usize, usize)> {
        c.grid().filled_cells().collect()
    }

    #[test]
    fn test_empty_grid_rejects_gesture() {
        let mut c = controller(0, 4, 400.0, 300.0);
        assert!(!c.press(Point::new(10.0, 10.0)));
        assert!(!c.move_to(Point::new(20.0, 10.0)));
        assert!(!c.release(Point::new(20.0, 10.0)));
        assert!(c.stroke().is_empty());
    }

    #[test]
    fn test_drag_paints_cells_under_samples() {
        let mut c = controller(3, 4, 400.0, 300.0);
        c.press(Point::new(50.0, 50.0));
        c.move_to(Point::new(150.0, 50.0));
        c.move_to(Point::new(250.0, 50.0));
        assert_eq!(filled(&c), vec![(0, 0), (0, 1), (0, 2)]);

        // A straight stroke encloses nothing.
        c.release(Point::new(250.0, 50.0));
        assert_eq!(filled(&c), vec![(0, 0), (0, 1), (0, 2)]);
        assert!(!c.is_painting());
    }

    #[test]
    fn test_lasso_fills_untouched_center() {
        let mut c = controller(3, 3, 300.0, 300.0);
        c.press(Point::new(150.0, 20.0));
        c.move_to(Point::new(280.0, 150.0));
        c.move_to(Point::new(150.0, 280.0));
        assert!(!c.grid().is_filled(1, 1));
        assert!(!c.grid().is_filled(1, 0));

        c.release(Point::new(20.0, 150.0));
        assert_eq!(filled(&c), vec![(0, 1), (1, 0), (1, 1), (1, 2), (2, 1)]);
    }

    #[test]
    fn test_lasso_bulk_fills_inner_block() {
        let mut c = controller(4, 4, 400.0, 400.0);
        c.press(Point::new(110.0, 20.0));
        c.move_to(Point::new(380.0, 110.0));
        c.move_to(Point::new(290.0, 380.0));
        for cell in [(1, 1), (1, 2), (2, 1), (2, 2)] {
            assert!(!c.grid().is_filled(cell.0, cell.1));
        }

        c.release(Point::new(20.0, 290.0));
        assert_eq!(
            filled(&c),
            vec![(0, 1), (1, 1), (1, 2), (1, 3), (2, 0), (2, 1), (2, 2), (3, 2)]
        );
    }

    #[test]
    fn test_erase_mode_lasso() {
        let mut c = controller(3, 3, 300.0, 300.0);
        for row in 0..3 {
            for column in 0..3 {
                c.grid_mut().set(row, column, true);
            }
        }
        c.set_mode(GridMode::Erase);

        c.press(Point::new(150.0, 20.0));
        c.move_to(Point::new(280.0, 150.0));
        c.move_to(Point::new(150.0, 280.0));
        c.release(Point::new(20.0, 150.0));

        assert_eq!(filled(&c), vec![(0, 0), (0, 2), (2, 0), (2, 2)]);
    }

    #[test]
    fn test_points_clamped_into_surface() {
        let mut c = controller(3, 4, 400.0, 300.0);
        c.press(Point::new(-20.0, 500.0));
        assert_eq!(c.stroke()[0], Point::new(0.0, 299.0));
        assert!(c.grid().is_filled(2, 0));

        c.move_to(Point::new(400.0, -5.0));
        assert_eq!(c.stroke()[1], Point::new(399.0, 0.0));
        assert!(c.grid().is_filled(0, 3));
    }

    #[test]
    fn test_cancel_skips_lasso() {
        let mut c = controller(3, 3, 300.0, 300.0);
        c.press(Point::new(150.0, 20.0));
        c.move_to(Point::new(280.0, 150.0));
        c.move_to(Point::new(150.0, 280.0));
        c.move_to(Point::new(20.0, 150.0));
        assert!(c.handle_pointer_event(PointerEvent::Cancel {
            position: Point::new(20.0, 150.0)
        }));

        assert!(!c.grid().is_filled(1, 1));
        assert!(c.stroke().is_empty());
    }

    #[test]
    fn test_stroke_path_visibility() {
        let mut c = controller(3, 3, 300.0, 300.0);
        c.press(Point::new(10.0, 10.0));
        c.move_to(Point::new(100.0, 10.0));
        assert!(c.visible_stroke().is_none());
        assert_eq!(c.stroke_path().elements().len(), 2);

        c.show_stroke(true);
        c.release(Point::new(100.0, 100.0));
        let path = c.visible_stroke().unwrap();
        // move, two lines, close
        assert_eq!(path.elements().len(), 4);
    }

    #[test]
    fn test_clear_all_and_resize() {
        let mut c = controller(3, 3, 300.0, 300.0);
        c.press(Point::new(10.0, 10.0));
        c.release(Point::new(10.0, 10.0));
        assert_eq!(c.grid().filled_count(), 1);

        c.clear_all();
        assert_eq!(c.grid().filled_count(), 0);
        assert_eq!(c.grid().rows(), 3);
        assert!(c.stroke().is_empty());

        c.resize(2, 5);
        assert_eq!(c.grid().columns(), 5);
        assert_eq!(c.area(), "0,0");
    }

    #[test]
    fn test_area_round_trip_through_controller() {
        let mut c = controller(2, 4, 400.0, 200.0);
        c.load_area("11,6").unwrap();
        assert_eq!(filled(&c), vec![(0, 0), (0, 2), (0, 3), (1, 1), (1, 2)]);
        assert_eq!(c.area(), "11,6");
        assert!(c.take_redraw_request());
    }
}
