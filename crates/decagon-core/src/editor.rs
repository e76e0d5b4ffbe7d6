//! Shape state holder: owns the polygon and applies drags to it.
//!
//! The polygon is only ever replaced by a candidate that passed validation,
//! so it is valid at every point between events.

use crate::config::EditorConfig;
use crate::drag::{DragMode, DragSession};
use crate::geometry::{Constraints, Violation};
use crate::input::PointerEvent;
use crate::markers::{self, MARKER_HIT_TOLERANCE};
use crate::polygon::{Polygon, PolygonError};
use crate::viewport::clamp_to_rect;
use kurbo::{Point, Rect};
use std::fmt;

/// Callback invoked with the new polygon after every committed change.
pub type Observer = Box<dyn FnMut(&Polygon)>;

/// Result of a drag update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// No drag in progress.
    Idle,
    /// The vertex moved.
    Moved,
    /// The target equals the current position, or was unusable.
    Unchanged,
    /// The move would break a constraint; the polygon kept its previous shape.
    Rejected(Violation),
}

/// Owns the polygon being edited and the active drag, if any.
pub struct ShapeEditor {
    polygon: Polygon,
    /// Layout restored by [`ShapeEditor::reset`].
    initial: Polygon,
    drag: Option<DragSession>,
    constraints: Constraints,
    drag_mode: DragMode,
    /// Dragged vertices are clamped into this rectangle when set.
    bounds: Option<Rect>,
    hit_tolerance: f64,
    observers: Vec<Observer>,
}

impl fmt::Debug for ShapeEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeEditor")
            .field("polygon", &self.polygon)
            .field("initial", &self.initial)
            .field("drag", &self.drag)
            .field("constraints", &self.constraints)
            .field("drag_mode", &self.drag_mode)
            .field("bounds", &self.bounds)
            .field("hit_tolerance", &self.hit_tolerance)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ShapeEditor {
    /// Create an editor starting from `initial`, which must satisfy `constraints`.
    pub fn new(initial: Polygon, constraints: Constraints) -> Result<Self, PolygonError> {
        initial.validate(&constraints)?;
        Ok(Self {
            polygon: initial,
            initial,
            drag: None,
            constraints,
            drag_mode: DragMode::default(),
            bounds: None,
            hit_tolerance: MARKER_HIT_TOLERANCE,
            observers: Vec::new(),
        })
    }

    /// Create an editor from configuration.
    pub fn from_config(config: &EditorConfig) -> Result<Self, PolygonError> {
        let constraints = config.constraints();
        let initial = config.layout.build(&constraints)?;
        let editor = Self::new(initial, constraints)?
            .with_drag_mode(config.drag_mode)
            .with_bounds(config.clamp_to_view.then_some(config.view_box));
        Ok(Self {
            hit_tolerance: config.hit_tolerance,
            ..editor
        })
    }

    /// Set how the dragged vertex follows the pointer.
    pub fn with_drag_mode(mut self, mode: DragMode) -> Self {
        self.drag_mode = mode;
        self
    }

    /// Set the rectangle dragged vertices are clamped into.
    pub fn with_bounds(mut self, bounds: Option<Rect>) -> Self {
        self.bounds = bounds.map(|rect| rect.abs());
        self
    }

    /// The current polygon.
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// The layout restored by reset.
    pub fn initial(&self) -> &Polygon {
        &self.initial
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn drag_mode(&self) -> DragMode {
        self.drag_mode
    }

    /// The active drag, if any.
    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Index of the vertex being dragged.
    pub fn dragged_vertex(&self) -> Option<usize> {
        self.drag.map(|d| d.vertex)
    }

    /// Register a callback run after every committed change.
    pub fn subscribe(&mut self, observer: impl FnMut(&Polygon) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self) {
        let polygon = self.polygon;
        for observer in &mut self.observers {
            observer(&polygon);
        }
    }

    /// Start dragging `vertex`, grabbed with the pointer at `pointer`.
    ///
    /// Returns `false` (and starts nothing) when `vertex` is out of range.
    pub fn begin_drag(&mut self, vertex: usize, pointer: Point) -> bool {
        let Some(position) = self.polygon.vertex(vertex) else {
            log::warn!("Ignoring drag of nonexistent vertex {}", vertex);
            return false;
        };
        self.drag = Some(DragSession::new(vertex, position, pointer, self.drag_mode));
        log::debug!("Begin drag of vertex {}", vertex);
        true
    }

    /// Move the dragged vertex toward `pointer`, if the result stays valid.
    pub fn update_drag(&mut self, pointer: Point) -> DragOutcome {
        let Some(session) = self.drag else {
            return DragOutcome::Idle;
        };
        if !pointer.is_finite() {
            return DragOutcome::Unchanged;
        }

        let mut target = session.target(pointer);
        if let Some(bounds) = self.bounds {
            target = clamp_to_rect(target, bounds);
        }
        if self.polygon.vertex(session.vertex) == Some(target) {
            return DragOutcome::Unchanged;
        }

        let Some(candidate) = self.polygon.with_vertex(session.vertex, target) else {
            return DragOutcome::Unchanged;
        };
        match candidate.check_vertex(session.vertex, &self.constraints) {
            Ok(()) => {
                self.polygon = candidate;
                self.notify();
                DragOutcome::Moved
            }
            Err(violation) => {
                log::debug!("Rejected move of vertex {} to {:?}: {}", session.vertex, target, violation);
                DragOutcome::Rejected(violation)
            }
        }
    }

    /// End the active drag. Vertex positions are left as they are.
    pub fn end_drag(&mut self) {
        if let Some(session) = self.drag.take() {
            log::debug!("End drag of vertex {}", session.vertex);
        }
    }

    /// Restore the initial layout and drop any drag in progress.
    pub fn reset(&mut self) {
        self.drag = None;
        self.polygon = self.initial;
        log::info!("Polygon reset to initial layout");
        self.notify();
    }

    /// The vertex whose marker is under `point`, if any.
    pub fn vertex_at(&self, point: Point) -> Option<usize> {
        markers::hit_test_marker(&self.polygon, point, self.hit_tolerance)
    }

    /// Route a unified pointer event to the drag operations.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> DragOutcome {
        match event {
            PointerEvent::Down { position } => {
                if let Some(vertex) = self.vertex_at(position) {
                    self.begin_drag(vertex, position);
                }
                DragOutcome::Idle
            }
            PointerEvent::Move { position } => self.update_drag(position),
            PointerEvent::Up | PointerEvent::Leave => {
                self.end_drag();
                DragOutcome::Idle
            }
        }
    }
}
