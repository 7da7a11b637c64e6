//! Pure geometry helpers shared by the polygon editor and the grid selector.
//!
//! Everything here works on plain vertex slices so both the polygon model and
//! the freehand lasso stroke can use the same hit tests.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Indices of the vertices that reach the minimum/maximum x and y of a polygon.
///
/// Ties resolve to the earliest vertex: a later vertex only replaces a cached
/// extremum when it is strictly further out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extrema {
    pub leftmost: usize,
    pub topmost: usize,
    pub rightmost: usize,
    pub bottommost: usize,
}

/// Even-odd ray casting test.
///
/// A horizontal ray is cast from `point` towards +x and the edges it crosses
/// are counted. Horizontal edges are skipped and each edge covers the
/// half-open span `[min_y, max_y)` so a ray through a shared vertex is only
/// counted once. Points exactly on an edge get whatever the parity says.
pub fn point_in_polygon(vertices: &[Point], point: Point) -> bool {
    let count = vertices.len();
    let mut crossings = 0usize;

    for i in 0..count {
        let p1 = vertices[i];
        let p2 = vertices[(i + 1) % count];

        if p1.y == p2.y {
            continue;
        }
        if point.y < p1.y.min(p2.y) {
            continue;
        }
        if point.y >= p1.y.max(p2.y) {
            continue;
        }

        let x = (point.y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y) + p1.x;
        if x > point.x {
            crossings += 1;
        }
    }

    crossings % 2 == 1
}

/// Find the first vertex whose open square window of half-size `tolerance`
/// contains `point`.
pub fn nearest_vertex_index(vertices: &[Point], point: Point, tolerance: f64) -> Option<usize> {
    vertices.iter().position(|v| {
        point.x > v.x - tolerance
            && point.x < v.x + tolerance
            && point.y > v.y - tolerance
            && point.y < v.y + tolerance
    })
}

/// Scan the vertices once and return the extrema indices.
///
/// Returns `None` for an empty slice.
pub fn compute_extrema(vertices: &[Point]) -> Option<Extrema> {
    vertices.first()?;

    let mut extrema = Extrema {
        leftmost: 0,
        topmost: 0,
        rightmost: 0,
        bottommost: 0,
    };

    for (i, p) in vertices.iter().enumerate().skip(1) {
        if p.x < vertices[extrema.leftmost].x {
            extrema.leftmost = i;
        }
        if p.x > vertices[extrema.rightmost].x {
            extrema.rightmost = i;
        }
        if p.y < vertices[extrema.topmost].y {
            extrema.topmost = i;
        }
        if p.y > vertices[extrema.bottommost].y {
            extrema.bottommost = i;
        }
    }

    Some(extrema)
}

/// Axis-aligned bounding box of a vertex list.
pub fn bounding_rect(vertices: &[Point]) -> Option<Rect> {
    let extrema = compute_extrema(vertices)?;
    Some(Rect::new(
        vertices[extrema.leftmost].x,
        vertices[extrema.topmost].y,
        vertices[extrema.rightmost].x,
        vertices[extrema.bottommost].y,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ]
    }

    #[test]
    fn test_point_inside_and_outside() {
        let sq = square();
        assert!(point_in_polygon(&sq, Point::new(50.0, 50.0)));
        assert!(point_in_polygon(&sq, Point::new(1.0, 99.0)));
        assert!(!point_in_polygon(&sq, Point::new(150.0, 50.0)));
        assert!(!point_in_polygon(&sq, Point::new(-1.0, 50.0)));
        assert!(!point_in_polygon(&sq, Point::new(50.0, -10.0)));
    }

    #[test]
    fn test_concave_polygon() {
        // U shape opening upwards
        let u = vec![
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(30.0, 70.0),
            Point::new(70.0, 70.0),
            Point::new(70.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        assert!(point_in_polygon(&u, Point::new(15.0, 50.0)));
        assert!(point_in_polygon(&u, Point::new(85.0, 50.0)));
        assert!(!point_in_polygon(&u, Point::new(50.0, 30.0)));
        assert!(point_in_polygon(&u, Point::new(50.0, 85.0)));
    }

    #[test]
    fn test_cyclic_relabel_invariant() {
        let tri = vec![
            Point::new(10.0, 10.0),
            Point::new(90.0, 20.0),
            Point::new(40.0, 80.0),
        ];
        let probes = [
            Point::new(45.0, 35.0),
            Point::new(5.0, 5.0),
            Point::new(80.0, 60.0),
            Point::new(40.0, 79.0),
        ];

        for shift in 0..tri.len() {
            let mut rotated = tri.clone();
            rotated.rotate_left(shift);
            for probe in probes {
                assert_eq!(
                    point_in_polygon(&tri, probe),
                    point_in_polygon(&rotated, probe)
                );
            }
        }

        let mut reversed = tri.clone();
        reversed.reverse();
        for probe in probes {
            assert_eq!(point_in_polygon(&tri, probe), point_in_polygon(&reversed, probe));
        }
    }

    #[test]
    fn test_ray_through_vertex_counts_once() {
        // Diamond: a ray at y = 50 passes exactly through the left and right vertices.
        let diamond = vec![
            Point::new(50.0, 0.0),
            Point::new(100.0, 50.0),
            Point::new(50.0, 100.0),
            Point::new(0.0, 50.0),
        ];
        assert!(point_in_polygon(&diamond, Point::new(50.0, 50.0)));
        assert!(!point_in_polygon(&diamond, Point::new(-10.0, 50.0)));
    }

    #[test]
    fn test_degenerate_polygons() {
        assert!(!point_in_polygon(&[], Point::new(0.0, 0.0)));
        assert!(!point_in_polygon(&[Point::new(1.0, 1.0)], Point::new(0.0, 0.0)));
        let segment = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        assert!(!point_in_polygon(&segment, Point::new(2.0, 5.0)));
    }

    #[test]
    fn test_nearest_vertex_square_window() {
        let sq = square();
        assert_eq!(nearest_vertex_index(&sq, Point::new(5.0, 5.0), 20.0), Some(0));
        // Corner of the square window, outside a circle of the same radius.
        assert_eq!(nearest_vertex_index(&sq, Point::new(119.0, 119.0), 20.0), Some(2));
        // Window is open: exactly on the border is a miss.
        assert_eq!(nearest_vertex_index(&sq, Point::new(120.0, 100.0), 20.0), None);
        assert_eq!(nearest_vertex_index(&sq, Point::new(50.0, 50.0), 20.0), None);
    }

    #[test]
    fn test_nearest_vertex_prefers_storage_order() {
        let close = vec![
            Point::new(10.0, 10.0),
            Point::new(12.0, 12.0),
            Point::new(50.0, 50.0),
        ];
        assert_eq!(nearest_vertex_index(&close, Point::new(12.0, 12.0), 5.0), Some(0));
    }

    #[test]
    fn test_extrema_ties_keep_first_index() {
        let sq = square();
        let extrema = compute_extrema(&sq).unwrap();
        assert_eq!(extrema.leftmost, 0);
        assert_eq!(extrema.topmost, 0);
        assert_eq!(extrema.rightmost, 1);
        assert_eq!(extrema.bottommost, 2);
    }

    #[test]
    fn test_extrema_match_true_bounds() {
        let pts = vec![
            Point::new(3.0, 7.0),
            Point::new(-2.0, 4.0),
            Point::new(8.0, -1.0),
            Point::new(5.0, 12.0),
            Point::new(-2.0, 12.0),
        ];
        let extrema = compute_extrema(&pts).unwrap();
        assert_eq!(extrema.leftmost, 1);
        assert_eq!(extrema.rightmost, 2);
        assert_eq!(extrema.topmost, 2);
        assert_eq!(extrema.bottommost, 3);

        let rect = bounding_rect(&pts).unwrap();
        assert_eq!(rect, Rect::new(-2.0, -1.0, 8.0, 12.0));
    }

    #[test]
    fn test_extrema_empty() {
        assert!(compute_extrema(&[]).is_none());
        assert!(bounding_rect(&[]).is_none());
    }
}
