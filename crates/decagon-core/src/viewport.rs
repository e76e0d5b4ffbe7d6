//! Mapping between screen pixels and the editor's view box.

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// View box of the reference layout.
pub const DEFAULT_VIEW_BOX: Rect = Rect::new(0.0, 0.0, 400.0, 440.0);

/// Fits a view box into a screen area, preserving aspect ratio and centering it.
///
/// Polygon coordinates live in the view box; pointer input and rendering
/// happen in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Local coordinate rectangle the polygon lives in.
    pub view_box: Rect,
    /// Screen area the view box is drawn into, in pixels.
    pub screen: Rect,
}

/// Clamp `point` into `rect`.
///
/// The rectangle is normalized first, so inverted corners still clamp. A
/// rectangle with a non-finite corner leaves the point as is.
pub fn clamp_to_rect(point: Point, rect: Rect) -> Point {
    let rect = rect.abs();
    if !rect.is_finite() {
        return point;
    }
    Point::new(point.x.clamp(rect.x0, rect.x1), point.y.clamp(rect.y0, rect.y1))
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_VIEW_BOX, DEFAULT_VIEW_BOX.size())
    }
}

impl Viewport {
    /// Create a viewport filling a screen of the given size.
    pub fn new(view_box: Rect, screen_size: Size) -> Self {
        Self {
            view_box,
            screen: screen_size.to_rect(),
        }
    }

    /// Set the screen area (e.g. after a resize or when the side panel takes space).
    pub fn set_screen(&mut self, screen: Rect) {
        self.screen = screen;
    }

    /// Uniform scale from view-box units to pixels.
    pub fn scale(&self) -> f64 {
        let sx = self.screen.width() / self.view_box.width();
        let sy = self.screen.height() / self.view_box.height();
        let scale = sx.min(sy);
        if scale.is_finite() && scale > 0.0 { scale } else { 1.0 }
    }

    /// Transform from view-box coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        let scale = self.scale();
        let fitted = self.view_box.size() * scale;
        let origin = self.screen.center()
            - Vec2::new(fitted.width / 2.0, fitted.height / 2.0);
        Affine::translate(origin.to_vec2()) * Affine::scale(scale) * Affine::translate(-self.view_box.origin().to_vec2())
    }

    /// Transform from screen coordinates to view-box coordinates.
    pub fn inverse_transform(&self) -> Affine {
        self.transform().inverse()
    }

    /// Convert a screen point to view-box coordinates.
    pub fn screen_to_local(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a view-box point to screen coordinates.
    pub fn local_to_screen(&self, local_point: Point) -> Point {
        self.transform() * local_point
    }

    /// The view box as it appears on screen.
    pub fn screen_view_box(&self) -> Rect {
        self.transform().transform_rect_bbox(self.view_box)
    }
}
