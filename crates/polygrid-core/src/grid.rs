//! Fixed-size grid of fillable cells laid over a drawing surface.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// What a touched cell turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridMode {
    #[default]
    Draw,
    Erase,
}

/// A `rows × columns` fill matrix stretched over a surface of `size` pixels.
///
/// Cells are stored row-major. A grid with zero rows or columns cannot be
/// edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridRecord")]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<bool>,
    size: Size,
    mode: GridMode,
}

#[derive(Deserialize)]
struct GridRecord {
    rows: usize,
    columns: usize,
    cells: Vec<bool>,
    size: Size,
    #[serde(default)]
    mode: GridMode,
}

impl TryFrom<GridRecord> for Grid {
    type Error = String;

    fn try_from(record: GridRecord) -> Result<Self, Self::Error> {
        let expected = record.rows * record.columns;
        if record.cells.len() != expected {
            return Err(format!(
                "expected {expected} cells for a {}x{} grid, found {}",
                record.rows,
                record.columns,
                record.cells.len()
            ));
        }
        Ok(Self {
            rows: record.rows,
            columns: record.columns,
            cells: record.cells,
            size: record.size,
            mode: record.mode,
        })
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl Grid {
    /// Create an empty grid. The surface size starts at zero.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![false; rows * columns],
            size: Size::ZERO,
            mode: GridMode::Draw,
        }
    }

    /// Builder: set the surface size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.set_size(size);
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Whether the grid has any cells to edit.
    pub fn is_editable(&self) -> bool {
        self.rows > 0 && self.columns > 0
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = Size::new(size.width.max(0.0), size.height.max(0.0));
    }

    pub fn mode(&self) -> GridMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: GridMode) {
        self.mode = mode;
    }

    /// Pixel size of one cell.
    pub fn cell_size(&self) -> Size {
        if !self.is_editable() {
            return Size::ZERO;
        }
        Size::new(
            self.size.width / self.columns as f64,
            self.size.height / self.rows as f64,
        )
    }

    /// Reallocate the matrix with new dimensions; every cell starts empty.
    pub fn resize(&mut self, rows: usize, columns: usize) {
        self.rows = rows;
        self.columns = columns;
        self.cells = vec![false; rows * columns];
    }

    /// Empty every cell, keeping the dimensions.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    fn offset(&self, row: usize, column: usize) -> Option<usize> {
        (row < self.rows && column < self.columns).then(|| row * self.columns + column)
    }

    /// Fill state of a cell. Out-of-range cells read as empty.
    pub fn is_filled(&self, row: usize, column: usize) -> bool {
        self.offset(row, column).is_some_and(|i| self.cells[i])
    }

    /// Set a cell. Out-of-range cells are ignored.
    pub fn set(&mut self, row: usize, column: usize, filled: bool) {
        if let Some(i) = self.offset(row, column) {
            self.cells[i] = filled;
        }
    }

    /// Apply the current mode to a cell. Returns whether the cell changed.
    pub fn apply(&mut self, row: usize, column: usize) -> bool {
        let Some(i) = self.offset(row, column) else {
            return false;
        };
        let filled = self.mode == GridMode::Draw;
        let changed = self.cells[i] != filled;
        self.cells[i] = filled;
        changed
    }

    /// One row of the matrix, left to right.
    pub fn row(&self, row: usize) -> Option<&[bool]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.columns;
        Some(&self.cells[start..start + self.columns])
    }

    /// The matrix as nested rows.
    pub fn to_matrix(&self) -> Vec<Vec<bool>> {
        (0..self.rows)
            .filter_map(|r| self.row(r).map(<[bool]>::to_vec))
            .collect()
    }

    /// Cell under a surface point, or `None` outside the grid.
    pub fn cell_at(&self, point: Point) -> Option<(usize, usize)> {
        let cell = self.cell_size();
        if cell.width <= 0.0 || cell.height <= 0.0 {
            return None;
        }
        let column = (point.x / cell.width).floor();
        let row = (point.y / cell.height).floor();
        if !(column >= 0.0 && row >= 0.0) {
            return None;
        }
        let (row, column) = (row as usize, column as usize);
        (row < self.rows && column < self.columns).then_some((row, column))
    }

    /// Pixel rectangle covered by a cell.
    pub fn cell_rect(&self, row: usize, column: usize) -> Rect {
        let cell = self.cell_size();
        Rect::new(
            column as f64 * cell.width,
            row as f64 * cell.height,
            (column + 1) as f64 * cell.width,
            (row + 1) as f64 * cell.height,
        )
    }

    pub fn cell_center(&self, row: usize, column: usize) -> Point {
        self.cell_rect(row, column).center()
    }

    /// Coordinates of all filled cells, row-major.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, filled)| **filled)
            .map(move |(i, _)| (i / columns, i % columns))
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|filled| **filled).count()
    }

    /// Rectangles of the filled cells, for the host to paint.
    pub fn filled_rects(&self) -> Vec<Rect> {
        self.filled_cells()
            .map(|(row, column)| self.cell_rect(row, column))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(3, 4).with_size(Size::new(400.0, 300.0))
    }

    #[test]
    fn test_cell_geometry() {
        let g = grid();
        assert_eq!(g.cell_size(), Size::new(100.0, 100.0));
        assert_eq!(g.cell_rect(1, 2), Rect::new(200.0, 100.0, 300.0, 200.0));
        assert_eq!(g.cell_center(0, 0), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_cell_at() {
        let g = grid();
        assert_eq!(g.cell_at(Point::new(0.0, 0.0)), Some((0, 0)));
        assert_eq!(g.cell_at(Point::new(399.0, 299.0)), Some((2, 3)));
        assert_eq!(g.cell_at(Point::new(400.0, 100.0)), None);
        assert_eq!(g.cell_at(Point::new(-1.0, 100.0)), None);
        assert_eq!(Grid::new(0, 4).cell_at(Point::new(1.0, 1.0)), None);
        assert_eq!(Grid::new(2, 2).cell_at(Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn test_apply_follows_mode() {
        let mut g = grid();
        assert!(g.apply(1, 1));
        assert!(!g.apply(1, 1));
        assert!(g.is_filled(1, 1));

        g.set_mode(GridMode::Erase);
        assert!(g.apply(1, 1));
        assert!(!g.is_filled(1, 1));
        assert!(!g.apply(7, 7));
    }

    #[test]
    fn test_filled_queries() {
        let mut g = grid();
        g.set(0, 3, true);
        g.set(2, 0, true);
        g.set(5, 5, true);

        assert_eq!(g.filled_count(), 2);
        assert_eq!(g.filled_cells().collect::<Vec<_>>(), vec![(0, 3), (2, 0)]);
        assert_eq!(g.filled_rects()[0], Rect::new(300.0, 0.0, 400.0, 100.0));
        assert_eq!(g.row(0), Some(&[false, false, false, true][..]));
        assert!(g.row(3).is_none());
    }

    #[test]
    fn test_resize_and_clear() {
        let mut g = grid();
        g.set(0, 0, true);
        g.clear();
        assert_eq!(g.filled_count(), 0);
        assert_eq!(g.columns(), 4);

        g.set(0, 0, true);
        g.resize(2, 2);
        assert_eq!(g.to_matrix(), vec![vec![false, false], vec![false, false]]);
        assert_eq!(g.cell_size(), Size::new(200.0, 150.0));
    }

    #[test]
    fn test_deserialize_checks_cell_count() {
        let bad = r#"{"rows": 2, "columns": 2, "cells": [true], "size": {"width": 10.0, "height": 10.0}}"#;
        assert!(serde_json::from_str::<Grid>(bad).is_err());

        let mut g = grid();
        g.set(1, 2, true);
        let json = serde_json::to_string(&g).unwrap();
        let restored: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, g);
    }
}
