//! Geometric predicates for polygon vertex constraints.
//!
//! Everything here is pure: a candidate vertex list and the index of the
//! vertex that moved go in, a verdict comes out. Only the moved vertex is
//! checked, since the rest of the polygon was already valid before the move.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum distance between a vertex and any other vertex or non-adjacent edge.
pub const DEFAULT_MIN_DISTANCE: f64 = 20.0;

/// Turn direction of an ordered point triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

/// How collinear and touching segment pairs are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntersectionPolicy {
    /// Plain "orientations differ" rule without collinear corrections.
    #[default]
    Proper,
    /// Also count collinear overlap and endpoint contact as intersecting.
    Inclusive,
}

/// Limits a polygon must respect around a moved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Minimum vertex-vertex and vertex-edge distance.
    pub min_distance: f64,
    /// Segment intersection classification.
    pub intersection: IntersectionPolicy,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            min_distance: DEFAULT_MIN_DISTANCE,
            intersection: IntersectionPolicy::default(),
        }
    }
}

impl Constraints {
    /// Create constraints with the given minimum distance.
    pub fn with_min_distance(min_distance: f64) -> Self {
        Self {
            min_distance,
            ..Self::default()
        }
    }

    /// Set the intersection policy.
    pub fn with_intersection(mut self, policy: IntersectionPolicy) -> Self {
        self.intersection = policy;
        self
    }
}

/// The first rule a candidate move breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("vertex {index} does not exist")]
    OutOfRange { index: usize },
    #[error("too close to vertex {other}")]
    TooCloseToVertex { other: usize },
    #[error("too close to edge {edge}")]
    TooCloseToEdge { edge: usize },
    #[error("new edge crosses edge {edge}")]
    CrossesEdge { edge: usize },
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Distance from `p` to the closest point of the finite segment `a`-`b`.
///
/// The projection of `p` onto the line through the segment is clamped to the
/// segment's extent, so points beyond an endpoint measure to that endpoint.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ap = p - a;
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq == 0.0 {
        return distance(p, a);
    }
    let t = (ap.dot(ab) / len_sq).clamp(0.0, 1.0);
    distance(p, a + ab * t)
}

/// Orientation of the ordered triple (`p`, `q`, `r`).
pub fn orientation(p: Point, q: Point, r: Point) -> Orientation {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if val == 0.0 {
        Orientation::Collinear
    } else if val > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Whether `q` lies within the bounding box of segment `p`-`r`.
/// Only meaningful when the three points are collinear.
fn on_segment(p: Point, q: Point, r: Point) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Whether segment `p1`-`q1` intersects segment `p2`-`q2`.
pub fn segments_intersect(p1: Point, q1: Point, p2: Point, q2: Point, policy: IntersectionPolicy) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    match policy {
        IntersectionPolicy::Proper => false,
        IntersectionPolicy::Inclusive => {
            (o1 == Orientation::Collinear && on_segment(p1, p2, q1))
                || (o2 == Orientation::Collinear && on_segment(p1, q2, q1))
                || (o3 == Orientation::Collinear && on_segment(p2, p1, q2))
                || (o4 == Orientation::Collinear && on_segment(p2, q1, q2))
        }
    }
}

fn ensure_in_range(points: &[Point], index: usize) -> Result<(), Violation> {
    if index < points.len() {
        Ok(())
    } else {
        Err(Violation::OutOfRange { index })
    }
}

/// Every other vertex must be at least `min_distance` away from `points[index]`.
pub fn check_vertex_separation(points: &[Point], index: usize, min_distance: f64) -> Result<(), Violation> {
    ensure_in_range(points, index)?;
    let moved = points[index];
    for (j, &other) in points.iter().enumerate() {
        if j != index && distance(moved, other) < min_distance {
            return Err(Violation::TooCloseToVertex { other: j });
        }
    }
    Ok(())
}

/// Every edge not touching `points[index]` must be at least `min_distance` away from it.
///
/// Edge `j` runs from `points[j]` to `points[(j + 1) % n]`.
pub fn check_edge_clearance(points: &[Point], index: usize, min_distance: f64) -> Result<(), Violation> {
    ensure_in_range(points, index)?;
    let n = points.len();
    let prev = (index + n - 1) % n;
    let moved = points[index];
    for j in 0..n {
        if j == index || j == prev {
            continue;
        }
        if distance_to_segment(moved, points[j], points[(j + 1) % n]) < min_distance {
            return Err(Violation::TooCloseToEdge { edge: j });
        }
    }
    Ok(())
}

/// The outgoing edge of `points[index]` must not cross any edge it does not share a vertex with.
pub fn check_no_crossing(points: &[Point], index: usize, policy: IntersectionPolicy) -> Result<(), Violation> {
    ensure_in_range(points, index)?;
    let n = points.len();
    let prev = (index + n - 1) % n;
    let next = (index + 1) % n;
    let (start, end) = (points[index], points[next]);
    for j in 0..n {
        if j == index || j == prev || j == next {
            continue;
        }
        if segments_intersect(start, end, points[j], points[(j + 1) % n], policy) {
            return Err(Violation::CrossesEdge { edge: j });
        }
    }
    Ok(())
}

/// Run all three checks for the vertex at `index`, reporting the first failure.
pub fn check_move(points: &[Point], index: usize, constraints: &Constraints) -> Result<(), Violation> {
    check_vertex_separation(points, index, constraints.min_distance)?;
    check_edge_clearance(points, index, constraints.min_distance)?;
    check_no_crossing(points, index, constraints.intersection)
}

/// Whether moving the vertex at `index` left `points` a valid polygon.
pub fn is_valid_move(points: &[Point], index: usize, constraints: &Constraints) -> bool {
    check_move(points, index, constraints).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    /// Ten points on a circle, vertex 0 at the top.
    fn decagon(center: Point, radius: f64) -> Vec<Point> {
        (0..10)
            .map(|k| {
                let theta = -std::f64::consts::FRAC_PI_2 + k as f64 * std::f64::consts::TAU / 10.0;
                Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin())
            })
            .collect()
    }

    #[test]
    fn test_orientation() {
        let p = Point::new(0.0, 0.0);
        let q = Point::new(10.0, 0.0);
        assert_eq!(orientation(p, q, Point::new(20.0, 0.0)), Orientation::Collinear);
        assert_eq!(orientation(p, q, Point::new(10.0, 10.0)), Orientation::CounterClockwise);
        assert_eq!(orientation(p, q, Point::new(10.0, -10.0)), Orientation::Clockwise);
    }

    #[test]
    fn test_distance_to_segment_interior() {
        let d = distance_to_segment(Point::new(5.0, 3.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!((d - 3.0).abs() < EPS);
    }

    #[test]
    fn test_distance_to_segment_beyond_endpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        // On the line through the segment, past b
        let d = distance_to_segment(Point::new(14.0, 0.0), a, b);
        assert!((d - 4.0).abs() < EPS);
        // Past a
        let d = distance_to_segment(Point::new(-7.0, 0.0), a, b);
        assert!((d - 7.0).abs() < EPS);
    }

    #[test]
    fn test_distance_to_degenerate_segment() {
        let a = Point::new(2.0, 2.0);
        let d = distance_to_segment(Point::new(5.0, 6.0), a, a);
        assert!((d - 5.0).abs() < EPS);
    }

    #[test]
    fn test_segments_crossing() {
        assert!(segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
            IntersectionPolicy::Proper,
        ));
    }

    #[test]
    fn test_segments_disjoint() {
        assert!(!segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 5.0),
            Point::new(10.0, 5.0),
            IntersectionPolicy::Proper,
        ));
    }

    #[test]
    fn test_collinear_overlap_depends_on_policy() {
        let p1 = Point::new(0.0, 0.0);
        let q1 = Point::new(10.0, 0.0);
        let p2 = Point::new(5.0, 0.0);
        let q2 = Point::new(15.0, 0.0);
        assert!(!segments_intersect(p1, q1, p2, q2, IntersectionPolicy::Proper));
        assert!(segments_intersect(p1, q1, p2, q2, IntersectionPolicy::Inclusive));
    }

    #[test]
    fn test_collinear_disjoint_never_intersects() {
        let p1 = Point::new(0.0, 0.0);
        let q1 = Point::new(10.0, 0.0);
        let p2 = Point::new(20.0, 0.0);
        let q2 = Point::new(30.0, 0.0);
        assert!(!segments_intersect(p1, q1, p2, q2, IntersectionPolicy::Proper));
        assert!(!segments_intersect(p1, q1, p2, q2, IntersectionPolicy::Inclusive));
    }

    #[test]
    fn test_regular_decagon_is_valid_everywhere() {
        let points = decagon(Point::new(250.0, 150.0), 120.0);
        let constraints = Constraints::default();
        for i in 0..points.len() {
            assert!(is_valid_move(&points, i, &constraints), "vertex {i}");
        }
    }

    #[test]
    fn test_small_nudge_is_valid() {
        let mut points = decagon(Point::new(250.0, 150.0), 120.0);
        points[0].x += 1.0;
        assert!(is_valid_move(&points, 0, &Constraints::default()));
    }

    #[test]
    fn test_vertex_separation_violation() {
        let mut points = decagon(Point::new(250.0, 150.0), 120.0);
        points[0] = points[1] + kurbo::Vec2::new(5.0, 0.0);
        assert_eq!(
            check_vertex_separation(&points, 0, DEFAULT_MIN_DISTANCE),
            Err(Violation::TooCloseToVertex { other: 1 })
        );
        assert!(!is_valid_move(&points, 0, &Constraints::default()));
    }

    #[test]
    fn test_coincident_with_neighbor_rejected() {
        let mut points = decagon(Point::new(250.0, 150.0), 120.0);
        points[0] = points[1];
        assert_eq!(
            check_move(&points, 0, &Constraints::default()),
            Err(Violation::TooCloseToVertex { other: 1 })
        );
    }

    #[test]
    fn test_edge_clearance_violation_only() {
        let center = Point::new(250.0, 150.0);
        let mut points = decagon(center, 120.0);
        // Just inside the middle of edge 2-3, well away from both of its endpoints
        let mid = points[2].midpoint(points[3]);
        let inward = (center - mid).normalize();
        points[0] = mid + inward * 15.0;

        assert_eq!(check_vertex_separation(&points, 0, DEFAULT_MIN_DISTANCE), Ok(()));
        assert_eq!(
            check_edge_clearance(&points, 0, DEFAULT_MIN_DISTANCE),
            Err(Violation::TooCloseToEdge { edge: 2 })
        );
        assert_eq!(check_no_crossing(&points, 0, IntersectionPolicy::Proper), Ok(()));
        assert!(!is_valid_move(&points, 0, &Constraints::default()));
    }

    #[test]
    fn test_crossing_violation_only() {
        let mut points = decagon(Point::new(250.0, 150.0), 120.0);
        // Far below the shape: edge 0-1 now cuts through the bottom of the polygon
        points[0] = Point::new(250.0, 400.0);

        assert_eq!(check_vertex_separation(&points, 0, DEFAULT_MIN_DISTANCE), Ok(()));
        assert_eq!(check_edge_clearance(&points, 0, DEFAULT_MIN_DISTANCE), Ok(()));
        assert_eq!(
            check_no_crossing(&points, 0, IntersectionPolicy::Proper),
            Err(Violation::CrossesEdge { edge: 4 })
        );
        assert!(!is_valid_move(&points, 0, &Constraints::default()));
    }

    #[test]
    fn test_adjacent_edges_are_not_clearance_checked() {
        let points = decagon(Point::new(250.0, 150.0), 120.0);
        // Vertex 0 lies on both of its own edges, so they must be skipped
        let n = points.len();
        for j in [0, n - 1] {
            assert!(distance_to_segment(points[0], points[j], points[(j + 1) % n]) < EPS);
        }
        assert_eq!(check_edge_clearance(&points, 0, 1.0), Ok(()));
    }

    #[test]
    fn test_out_of_range_index() {
        let points = decagon(Point::new(250.0, 150.0), 120.0);
        assert_eq!(
            check_move(&points, 10, &Constraints::default()),
            Err(Violation::OutOfRange { index: 10 })
        );
    }

    #[test]
    fn test_no_crossing_collinear_overlap_follows_policy() {
        // Vertex 0 pulled onto the line of edge 2, so edge 0 overlaps it
        let points = [
            Point::new(30.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(40.0, 0.0),
            Point::new(45.0, 30.0),
            Point::new(30.0, 40.0),
            Point::new(15.0, 42.0),
            Point::new(0.0, 40.0),
            Point::new(-15.0, 30.0),
            Point::new(-15.0, 5.0),
        ];
        assert_eq!(check_no_crossing(&points, 0, IntersectionPolicy::Proper), Ok(()));
        assert_eq!(
            check_no_crossing(&points, 0, IntersectionPolicy::Inclusive),
            Err(Violation::CrossesEdge { edge: 2 })
        );
    }
}
