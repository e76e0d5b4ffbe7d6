//! Input adapter unifying mouse and touch events into pointer events.

use crate::viewport::Viewport;
use kurbo::Point;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Platform input in screen coordinates, before unification.
///
/// Positions are optional because some platforms deliver events without
/// coordinates; those events are dropped by the adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    MouseDown {
        position: Option<Point>,
        button: MouseButton,
    },
    MouseMove {
        position: Option<Point>,
    },
    MouseUp {
        button: MouseButton,
    },
    MouseLeave,
    TouchStart {
        touches: Vec<Point>,
    },
    TouchMove {
        touches: Vec<Point>,
    },
    TouchEnd,
    TouchCancel,
}

/// Pointer event in view-box coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up,
    Leave,
}

/// Translates [`RawInput`] into [`PointerEvent`]s and tracks the pointer.
#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    /// Last known pointer position in view-box coordinates.
    pointer_position: Option<Point>,
    /// Whether the primary button or a touch is held.
    pressed: bool,
}

fn usable(position: Option<Point>) -> Option<Point> {
    position.filter(|p| p.is_finite())
}

impl InputAdapter {
    /// Create a new adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known pointer position in view-box coordinates.
    pub fn pointer_position(&self) -> Option<Point> {
        self.pointer_position
    }

    /// Whether the primary button or a touch is currently held.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Translate a raw event. Returns `None` for events that carry no usable
    /// information, such as secondary buttons or touches without coordinates.
    pub fn translate(&mut self, raw: RawInput, viewport: &Viewport) -> Option<PointerEvent> {
        let to_local = |p: Point| viewport.screen_to_local(p);
        let event = match raw {
            RawInput::MouseDown { position, button: MouseButton::Left } => {
                let position = to_local(usable(position)?);
                self.pressed = true;
                PointerEvent::Down { position }
            }
            RawInput::MouseUp { button: MouseButton::Left } => {
                self.pressed = false;
                PointerEvent::Up
            }
            RawInput::MouseDown { .. } | RawInput::MouseUp { .. } => return None,
            RawInput::MouseMove { position } => PointerEvent::Move {
                position: to_local(usable(position)?),
            },
            RawInput::TouchStart { touches } => {
                let position = to_local(usable(touches.first().copied())?);
                self.pressed = true;
                PointerEvent::Down { position }
            }
            RawInput::TouchMove { touches } => PointerEvent::Move {
                position: to_local(usable(touches.first().copied())?),
            },
            RawInput::TouchEnd => {
                self.pressed = false;
                PointerEvent::Up
            }
            RawInput::MouseLeave | RawInput::TouchCancel => {
                self.pressed = false;
                self.pointer_position = None;
                return Some(PointerEvent::Leave);
            }
        };

        if let PointerEvent::Down { position } | PointerEvent::Move { position } = event {
            self.pointer_position = Some(position);
        }
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Size};

    #[test]
    fn test_mouse_and_touch_produce_same_events() {
        let viewport = Viewport::default();
        let mut mouse = InputAdapter::new();
        let mut touch = InputAdapter::new();
        let p = Point::new(40.0, 50.0);

        assert_eq!(
            mouse.translate(RawInput::MouseDown { position: Some(p), button: MouseButton::Left }, &viewport),
            touch.translate(RawInput::TouchStart { touches: vec![p] }, &viewport),
        );
        assert_eq!(
            mouse.translate(RawInput::MouseMove { position: Some(p) }, &viewport),
            touch.translate(RawInput::TouchMove { touches: vec![p] }, &viewport),
        );
        assert_eq!(
            mouse.translate(RawInput::MouseUp { button: MouseButton::Left }, &viewport),
            touch.translate(RawInput::TouchEnd, &viewport),
        );
    }

    #[test]
    fn test_press_tracking() {
        let viewport = Viewport::default();
        let mut input = InputAdapter::new();
        input.translate(RawInput::MouseDown { position: Some(Point::new(1.0, 1.0)), button: MouseButton::Left }, &viewport);
        assert!(input.is_pressed());
        input.translate(RawInput::MouseUp { button: MouseButton::Left }, &viewport);
        assert!(!input.is_pressed());
    }

    #[test]
    fn test_missing_coordinates_dropped() {
        let viewport = Viewport::default();
        let mut input = InputAdapter::new();
        assert_eq!(input.translate(RawInput::MouseMove { position: None }, &viewport), None);
        assert_eq!(input.translate(RawInput::TouchMove { touches: vec![] }, &viewport), None);
        assert_eq!(
            input.translate(RawInput::MouseMove { position: Some(Point::new(f64::NAN, 1.0)) }, &viewport),
            None
        );
        assert_eq!(input.pointer_position(), None);
    }

    #[test]
    fn test_secondary_buttons_ignored() {
        let viewport = Viewport::default();
        let mut input = InputAdapter::new();
        let down = RawInput::MouseDown { position: Some(Point::new(1.0, 1.0)), button: MouseButton::Right };
        assert_eq!(input.translate(down, &viewport), None);
        assert_eq!(input.translate(RawInput::MouseUp { button: MouseButton::Middle }, &viewport), None);
        assert!(!input.is_pressed());
    }

    #[test]
    fn test_positions_converted_to_view_box() {
        let viewport = Viewport::new(Rect::new(0.0, 0.0, 400.0, 440.0), Size::new(800.0, 880.0));
        let mut input = InputAdapter::new();
        let event = input.translate(RawInput::MouseMove { position: Some(Point::new(400.0, 440.0)) }, &viewport);
        assert_eq!(event, Some(PointerEvent::Move { position: Point::new(200.0, 220.0) }));
        assert_eq!(input.pointer_position(), Some(Point::new(200.0, 220.0)));
    }

    #[test]
    fn test_leave_clears_pointer() {
        let viewport = Viewport::default();
        let mut input = InputAdapter::new();
        input.translate(RawInput::TouchStart { touches: vec![Point::new(5.0, 5.0)] }, &viewport);
        assert_eq!(input.translate(RawInput::TouchCancel, &viewport), Some(PointerEvent::Leave));
        assert_eq!(input.pointer_position(), None);
        assert!(!input.is_pressed());
    }
}
