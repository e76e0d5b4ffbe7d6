//! Vertex markers: the draggable dots drawn on each vertex.

use crate::polygon::Polygon;
use kurbo::Point;

/// Marker radius in view-box units.
pub const MARKER_RADIUS: f64 = 6.0;
/// Extra slack around a marker that still counts as a hit.
pub const MARKER_HIT_TOLERANCE: f64 = 10.0;

/// Interaction state of a marker, for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerState {
    #[default]
    Normal,
    Hovered,
    Dragged,
}

/// A draggable marker sitting on a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexMarker {
    /// Vertex index.
    pub index: usize,
    /// Position in view-box coordinates.
    pub position: Point,
    pub state: MarkerState,
}

impl VertexMarker {
    /// Create a marker in the normal state.
    pub fn new(index: usize, position: Point) -> Self {
        Self {
            index,
            position,
            state: MarkerState::Normal,
        }
    }

    /// Set the marker state.
    pub fn with_state(mut self, state: MarkerState) -> Self {
        self.state = state;
        self
    }

    /// Check if a point hits this marker.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// One marker per vertex, flagged with hover and drag state.
pub fn markers(polygon: &Polygon, hovered: Option<usize>, dragged: Option<usize>) -> Vec<VertexMarker> {
    polygon
        .vertices()
        .iter()
        .enumerate()
        .map(|(index, &position)| {
            let state = if dragged == Some(index) {
                MarkerState::Dragged
            } else if hovered == Some(index) {
                MarkerState::Hovered
            } else {
                MarkerState::Normal
            };
            VertexMarker::new(index, position).with_state(state)
        })
        .collect()
}

/// The marker under `point`, if any. When several overlap, the closest wins.
pub fn hit_test_marker(polygon: &Polygon, point: Point, tolerance: f64) -> Option<usize> {
    polygon
        .vertices()
        .iter()
        .enumerate()
        .map(|(index, &position)| VertexMarker::new(index, position))
        .filter(|marker| marker.hit_test(point, tolerance))
        .min_by(|a, b| {
            a.position
                .distance_squared(point)
                .total_cmp(&b.position.distance_squared(point))
        })
        .map(|marker| marker.index)
}
