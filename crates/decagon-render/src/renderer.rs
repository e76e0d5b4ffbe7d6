//! Renderer trait abstraction.

use decagon_core::editor::ShapeEditor;
use decagon_core::markers::{self, VertexMarker};
use decagon_core::viewport::Viewport;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Colors and sizes of the polygon and its markers, in view-box units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonStyle {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    pub marker_fill: Color,
    /// Marker fill while hovered or dragged.
    pub marker_active_fill: Color,
    pub marker_stroke: Color,
    pub marker_stroke_width: f64,
    pub marker_radius: f64,
    /// Background of the view box area.
    pub canvas: Color,
}

impl Default for PolygonStyle {
    fn default() -> Self {
        Self {
            fill: Color::from_rgba8(224, 242, 254, 255),
            stroke: Color::from_rgba8(14, 165, 233, 255),
            stroke_width: 2.0,
            marker_fill: Color::from_rgba8(14, 165, 233, 255),
            marker_active_fill: Color::from_rgba8(2, 132, 199, 255),
            marker_stroke: Color::WHITE,
            marker_stroke_width: 2.0,
            marker_radius: markers::MARKER_RADIUS,
            canvas: Color::WHITE,
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The editor whose polygon is drawn.
    pub editor: &'a ShapeEditor,
    /// Mapping from view box to screen.
    pub viewport: Viewport,
    /// Background color around the view box.
    pub background_color: Color,
    /// Marker under the pointer.
    pub hovered: Option<usize>,
    pub style: PolygonStyle,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(editor: &'a ShapeEditor, viewport: Viewport) -> Self {
        Self {
            editor,
            viewport,
            background_color: Color::from_rgba8(243, 244, 246, 255),
            hovered: None,
            style: PolygonStyle::default(),
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the hovered marker.
    pub fn with_hovered(mut self, hovered: Option<usize>) -> Self {
        self.hovered = hovered;
        self
    }

    /// Set the polygon style.
    pub fn with_style(mut self, style: PolygonStyle) -> Self {
        self.style = style;
        self
    }

    /// Markers to draw this frame.
    pub fn markers(&self) -> Vec<VertexMarker> {
        markers::markers(self.editor.polygon(), self.hovered, self.editor.dragged_vertex())
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the scene for a frame.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
