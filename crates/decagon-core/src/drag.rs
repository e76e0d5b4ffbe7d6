//! Drag session for a single vertex.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// How the dragged vertex follows the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragMode {
    /// Keep the offset between vertex and pointer from the moment of grabbing.
    #[default]
    Offset,
    /// Snap the vertex to the pointer.
    Direct,
}

/// An in-progress vertex drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Index of the vertex being moved.
    pub vertex: usize,
    /// Vector from the vertex to the pointer at grab time.
    pub grab_offset: Vec2,
}

impl DragSession {
    /// Start a session for `vertex`, grabbed at `pointer` while it sits at `position`.
    pub fn new(vertex: usize, position: Point, pointer: Point, mode: DragMode) -> Self {
        let grab_offset = match mode {
            DragMode::Offset => pointer - position,
            DragMode::Direct => Vec2::ZERO,
        };
        Self { vertex, grab_offset }
    }

    /// Where the vertex should go for the given pointer position.
    pub fn target(&self, pointer: Point) -> Point {
        pointer - self.grab_offset
    }
}
