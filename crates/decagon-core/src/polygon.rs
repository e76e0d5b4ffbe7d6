//! The ten-vertex polygon being edited.

use crate::geometry::{self, Constraints, Violation};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};
use thiserror::Error;

/// Number of vertices in the polygon.
pub const VERTEX_COUNT: usize = 10;

/// Hand-picked starting layout inside a 400x440 view box.
pub const REFERENCE_VERTICES: [(f64, f64); VERTEX_COUNT] = [
    (200.0, 20.0),
    (317.4, 69.0),
    (380.4, 180.0),
    (380.4, 260.0),
    (317.4, 371.0),
    (200.0, 420.0),
    (82.6, 371.0),
    (19.6, 260.0),
    (19.6, 180.0),
    (82.6, 69.0),
];

/// Errors raised while building a polygon.
#[derive(Debug, Error, PartialEq)]
pub enum PolygonError {
    #[error("Expected {expected} vertices, found {found}")]
    WrongVertexCount { expected: usize, found: usize },
    #[error("Vertex {index} has a non-finite coordinate")]
    NonFiniteVertex { index: usize },
    #[error("Vertex {index} breaks the layout constraints: {violation}")]
    InvalidLayout { index: usize, violation: Violation },
}

/// Starting layout of the polygon.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
    /// The hand-picked reference coordinates.
    #[default]
    Reference,
    /// Vertices evenly spaced on a circle, vertex 0 at the top.
    Regular { center: Point, radius: f64 },
    /// Explicit coordinates.
    Custom { points: Vec<Point> },
}

impl Layout {
    /// Build the polygon for this layout, checking it against `constraints`.
    pub fn build(&self, constraints: &Constraints) -> Result<Polygon, PolygonError> {
        let polygon = match self {
            Layout::Reference => Polygon::reference(),
            Layout::Regular { center, radius } => Polygon::regular(*center, *radius),
            Layout::Custom { points } => Polygon::from_points(points)?,
        };
        polygon.validate(constraints)?;
        Ok(polygon)
    }
}

/// A closed polygon with exactly [`VERTEX_COUNT`] vertices.
///
/// Edge `i` runs from vertex `i` to vertex `(i + 1) % VERTEX_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polygon {
    vertices: [Point; VERTEX_COUNT],
}

impl Polygon {
    /// Create a polygon from a vertex array. No constraints are checked.
    pub fn new(vertices: [Point; VERTEX_COUNT]) -> Self {
        Self { vertices }
    }

    /// Create a polygon from a slice, which must hold exactly [`VERTEX_COUNT`] finite points.
    pub fn from_points(points: &[Point]) -> Result<Self, PolygonError> {
        let vertices: [Point; VERTEX_COUNT] =
            points.try_into().map_err(|_| PolygonError::WrongVertexCount {
                expected: VERTEX_COUNT,
                found: points.len(),
            })?;
        if let Some(index) = vertices.iter().position(|p| !p.is_finite()) {
            return Err(PolygonError::NonFiniteVertex { index });
        }
        Ok(Self { vertices })
    }

    /// The hand-picked reference layout.
    pub fn reference() -> Self {
        Self {
            vertices: REFERENCE_VERTICES.map(|(x, y)| Point::new(x, y)),
        }
    }

    /// Vertices evenly spaced on a circle, vertex 0 at the top, proceeding clockwise on screen.
    pub fn regular(center: Point, radius: f64) -> Self {
        let vertices = std::array::from_fn(|k| {
            let theta = -FRAC_PI_2 + k as f64 * TAU / VERTEX_COUNT as f64;
            Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin())
        });
        Self { vertices }
    }

    /// All vertices in order.
    pub fn vertices(&self) -> &[Point; VERTEX_COUNT] {
        &self.vertices
    }

    /// A single vertex, if `index` is in range.
    pub fn vertex(&self, index: usize) -> Option<Point> {
        self.vertices.get(index).copied()
    }

    /// A copy of this polygon with one vertex replaced.
    pub fn with_vertex(&self, index: usize, position: Point) -> Option<Self> {
        let mut candidate = *self;
        *candidate.vertices.get_mut(index)? = position;
        Some(candidate)
    }

    /// Edges as (start, end) pairs, edge `i` starting at vertex `i`.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        (0..VERTEX_COUNT).map(|i| (self.vertices[i], self.vertices[(i + 1) % VERTEX_COUNT]))
    }

    /// Check the constraints around a single vertex.
    pub fn check_vertex(&self, index: usize, constraints: &Constraints) -> Result<(), Violation> {
        geometry::check_move(&self.vertices, index, constraints)
    }

    /// Check the constraints around every vertex.
    pub fn validate(&self, constraints: &Constraints) -> Result<(), PolygonError> {
        if let Some(index) = self.vertices.iter().position(|p| !p.is_finite()) {
            return Err(PolygonError::NonFiniteVertex { index });
        }
        for index in 0..VERTEX_COUNT {
            self.check_vertex(index, constraints)
                .map_err(|violation| PolygonError::InvalidLayout { index, violation })?;
        }
        Ok(())
    }

    /// Axis-aligned bounding box.
    pub fn bounds(&self) -> Rect {
        let first = Rect::from_points(self.vertices[0], self.vertices[0]);
        self.vertices[1..]
            .iter()
            .fold(first, |rect, &p| rect.union_pt(p))
    }

    /// Signed area by the shoelace formula (positive when clockwise on screen).
    pub fn signed_area(&self) -> f64 {
        self.edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>()
            / 2.0
    }

    /// Enclosed area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Closed outline path.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.vertices[0]);
        for &p in &self.vertices[1..] {
            path.line_to(p);
        }
        path.close_path();
        path
    }
}

impl Default for Polygon {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_reference_layout_is_valid() {
        assert_eq!(Polygon::reference().validate(&Constraints::default()), Ok(()));
    }

    #[test]
    fn test_regular_layout() {
        let polygon = Polygon::regular(Point::new(250.0, 150.0), 120.0);
        let top = polygon.vertex(0).unwrap();
        assert!((top.x - 250.0).abs() < EPS);
        assert!((top.y - 30.0).abs() < EPS);
        // Second vertex sits to the right of the top one
        assert!(polygon.vertex(1).unwrap().x > top.x);
        assert_eq!(polygon.validate(&Constraints::default()), Ok(()));
    }

    #[test]
    fn test_from_points_wrong_count() {
        let points = vec![Point::ZERO; 9];
        assert_eq!(
            Polygon::from_points(&points),
            Err(PolygonError::WrongVertexCount { expected: 10, found: 9 })
        );
    }

    #[test]
    fn test_from_points_non_finite() {
        let mut points: Vec<Point> = Polygon::reference().vertices().to_vec();
        points[3].y = f64::NAN;
        assert_eq!(
            Polygon::from_points(&points),
            Err(PolygonError::NonFiniteVertex { index: 3 })
        );
    }

    #[test]
    fn test_collapsed_layout_rejected() {
        let result = Layout::Regular { center: Point::new(100.0, 100.0), radius: 5.0 }
            .build(&Constraints::default());
        assert!(matches!(
            result,
            Err(PolygonError::InvalidLayout { index: 0, violation: Violation::TooCloseToVertex { .. } })
        ));
    }

    #[test]
    fn test_custom_layout_roundtrips_points() {
        let points = Polygon::regular(Point::new(200.0, 200.0), 150.0).vertices().to_vec();
        let polygon = Layout::Custom { points: points.clone() }
            .build(&Constraints::default())
            .unwrap();
        assert_eq!(polygon.vertices().as_slice(), points.as_slice());
    }

    #[test]
    fn test_with_vertex_replaces_one() {
        let polygon = Polygon::reference();
        let moved = polygon.with_vertex(4, Point::new(1.0, 2.0)).unwrap();
        for i in 0..VERTEX_COUNT {
            if i == 4 {
                assert_eq!(moved.vertex(i), Some(Point::new(1.0, 2.0)));
            } else {
                assert_eq!(moved.vertex(i), polygon.vertex(i));
            }
        }
        assert!(polygon.with_vertex(VERTEX_COUNT, Point::ZERO).is_none());
    }

    #[test]
    fn test_edges_wrap_around() {
        let polygon = Polygon::reference();
        let edges: Vec<_> = polygon.edges().collect();
        assert_eq!(edges.len(), VERTEX_COUNT);
        assert_eq!(edges[9], (polygon.vertex(9).unwrap(), polygon.vertex(0).unwrap()));
    }

    #[test]
    fn test_bounds() {
        let bounds = Polygon::reference().bounds();
        assert!((bounds.x0 - 19.6).abs() < EPS);
        assert!((bounds.y0 - 20.0).abs() < EPS);
        assert!((bounds.x1 - 380.4).abs() < EPS);
        assert!((bounds.y1 - 420.0).abs() < EPS);
    }

    #[test]
    fn test_regular_area() {
        let radius = 100.0;
        let polygon = Polygon::regular(Point::new(0.0, 0.0), radius);
        // Regular n-gon: n/2 * r^2 * sin(2π/n)
        let expected = 5.0 * radius * radius * (TAU / 10.0).sin();
        assert!((polygon.area() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_path_is_closed() {
        let path = Polygon::reference().to_path();
        let elements = path.elements();
        assert_eq!(elements.len(), VERTEX_COUNT + 1);
        assert!(matches!(elements[0], PathEl::MoveTo(_)));
        assert!(matches!(elements[VERTEX_COUNT], PathEl::ClosePath));
    }
}
