//! Decagon Core Library
//!
//! Platform-agnostic polygon model, constraint validation and drag editing
//! for the decagon editor.

pub mod config;
pub mod drag;
pub mod editor;
pub mod geometry;
pub mod input;
pub mod markers;
pub mod polygon;
pub mod viewport;

pub use config::{ConfigError, EditorConfig};
pub use drag::{DragMode, DragSession};
pub use editor::{DragOutcome, ShapeEditor};
pub use geometry::{Constraints, IntersectionPolicy, Orientation, Violation};
pub use input::{InputAdapter, MouseButton, PointerEvent, RawInput};
pub use markers::{MarkerState, VertexMarker};
pub use polygon::{Layout, Polygon, PolygonError, VERTEX_COUNT};
pub use viewport::Viewport;
