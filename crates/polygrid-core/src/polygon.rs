//! Editable polygon model.

use crate::geometry::{self, Extrema};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for polygons.
pub type PolygonId = Uuid;

/// An implicitly closed polygon with a cached extrema index.
///
/// Vertex order is winding order; the last vertex connects back to the first.
/// A polygon is expected to have at least three vertices. Fewer are accepted,
/// but hit testing then never reports the inside.
///
/// Every method that moves a vertex recomputes the extrema before returning,
/// so [`Polygon::extrema`] always describes the current vertices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "PolygonRecord", into = "PolygonRecord")]
pub struct Polygon {
    id: PolygonId,
    vertices: Vec<Point>,
    extrema: Option<Extrema>,
    /// Selection flag, only meaningful in multi-select mode.
    pub(crate) selected: bool,
    label: Option<String>,
}

impl Polygon {
    /// Create a polygon from its vertices.
    pub fn new(vertices: Vec<Point>) -> Self {
        let mut polygon = Self {
            id: Uuid::new_v4(),
            vertices,
            extrema: None,
            selected: false,
            label: None,
        };
        polygon.recompute_bounds();
        polygon
    }

    /// Create a rectangle: top-left, top-right, bottom-right, bottom-left.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(vec![
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x0, rect.y1),
        ])
    }

    /// Builder: attach a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn id(&self) -> PolygonId {
        self.id
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex(&self, index: usize) -> Option<Point> {
        self.vertices.get(index).copied()
    }

    /// Replace every vertex.
    pub fn set_vertices(&mut self, vertices: Vec<Point>) {
        self.vertices = vertices;
        self.recompute_bounds();
    }

    /// Move a single vertex. Out-of-range indices are ignored.
    pub fn set_vertex(&mut self, index: usize, point: Point) {
        if let Some(vertex) = self.vertices.get_mut(index) {
            *vertex = point;
            self.recompute_bounds();
        }
    }

    /// Translate the polygon. Only the axes enabled by `move_x` / `move_y`
    /// receive the corresponding component of `delta`.
    pub fn translate(&mut self, delta: Vec2, move_x: bool, move_y: bool) {
        if !move_x && !move_y {
            return;
        }
        for vertex in &mut self.vertices {
            if move_x {
                vertex.x += delta.x;
            }
            if move_y {
                vertex.y += delta.y;
            }
        }
        self.recompute_bounds();
    }

    /// Rescan the vertices and refresh the extrema cache.
    pub fn recompute_bounds(&mut self) {
        self.extrema = geometry::compute_extrema(&self.vertices);
    }

    /// Cached extrema indices, `None` for an empty polygon.
    pub fn extrema(&self) -> Option<Extrema> {
        self.extrema
    }

    pub fn leftmost(&self) -> Option<Point> {
        self.extrema.map(|e| self.vertices[e.leftmost])
    }

    pub fn topmost(&self) -> Option<Point> {
        self.extrema.map(|e| self.vertices[e.topmost])
    }

    pub fn rightmost(&self) -> Option<Point> {
        self.extrema.map(|e| self.vertices[e.rightmost])
    }

    pub fn bottommost(&self) -> Option<Point> {
        self.extrema.map(|e| self.vertices[e.bottommost])
    }

    /// Bounding box built from the cached extrema.
    pub fn bounds(&self) -> Option<Rect> {
        let e = self.extrema?;
        Some(Rect::new(
            self.vertices[e.leftmost].x,
            self.vertices[e.topmost].y,
            self.vertices[e.rightmost].x,
            self.vertices[e.bottommost].y,
        ))
    }

    /// Check whether `point` lies inside the polygon (even-odd rule).
    pub fn contains(&self, point: Point) -> bool {
        geometry::point_in_polygon(&self.vertices, point)
    }

    /// Index of the first vertex within `tolerance` of `point`.
    pub fn hit_vertex(&self, point: Point, tolerance: f64) -> Option<usize> {
        geometry::nearest_vertex_index(&self.vertices, point, tolerance)
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    /// Raw multi-select flag. Use the controller's selection queries to get
    /// the mode-aware answer.
    pub fn is_flagged_selected(&self) -> bool {
        self.selected
    }
}

/// Plain serializable form of a [`Polygon`].
///
/// The extrema are written out for consumers that want them, but reading a
/// record always recomputes them from the vertices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: PolygonId,
    pub vertices: Vec<Point>,
    #[serde(default)]
    pub extrema: Option<Extrema>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub selected: bool,
}

impl From<Polygon> for PolygonRecord {
    fn from(polygon: Polygon) -> Self {
        Self {
            id: polygon.id,
            vertices: polygon.vertices,
            extrema: polygon.extrema,
            label: polygon.label,
            selected: polygon.selected,
        }
    }
}

impl From<PolygonRecord> for Polygon {
    fn from(record: PolygonRecord) -> Self {
        let mut polygon = Self {
            id: record.id,
            vertices: record.vertices,
            extrema: None,
            selected: record.selected,
            label: record.label,
        };
        polygon.recompute_bounds();
        polygon
    }
}
