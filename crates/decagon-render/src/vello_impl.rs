//! Vello-based renderer implementation.

use crate::renderer::{PolygonStyle, RenderContext, Renderer};
use decagon_core::markers::{MarkerState, VertexMarker};
use kurbo::{Affine, Circle, Stroke};
use peniko::Fill;
use vello::Scene;

/// Growth of a marker's radius while hovered or dragged.
const ACTIVE_MARKER_SCALE: f64 = 1.35;

/// Vello-based renderer for the polygon and its markers.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    fn render_marker(&mut self, marker: &VertexMarker, style: &PolygonStyle, transform: Affine) {
        let (radius, fill) = match marker.state {
            MarkerState::Normal => (style.marker_radius, style.marker_fill),
            MarkerState::Hovered | MarkerState::Dragged => {
                (style.marker_radius * ACTIVE_MARKER_SCALE, style.marker_active_fill)
            }
        };
        let circle = Circle::new(marker.position, radius);

        self.scene.fill(Fill::NonZero, transform, fill, None, &circle);
        self.scene.stroke(
            &Stroke::new(style.marker_stroke_width),
            transform,
            style.marker_stroke,
            None,
            &circle,
        );
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();

        let transform = ctx.viewport.transform();
        let style = ctx.style;

        // View box backdrop, already in screen space
        let backdrop = ctx.viewport.screen_view_box();
        self.scene.fill(Fill::NonZero, Affine::IDENTITY, style.canvas, None, &backdrop);

        // Outline; strokes scale with the view box like SVG
        let path = ctx.editor.polygon().to_path();
        self.scene.fill(Fill::NonZero, transform, style.fill, None, &path);
        self.scene.stroke(&Stroke::new(style.stroke_width), transform, style.stroke, None, &path);

        for marker in ctx.markers() {
            self.render_marker(&marker, &style, transform);
        }
    }
}
