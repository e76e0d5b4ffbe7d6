//! Translates window events into editor operations.

use decagon_core::editor::{DragOutcome, ShapeEditor};
use decagon_core::input::{InputAdapter, MouseButton, PointerEvent, RawInput};
use decagon_core::viewport::Viewport;
use kurbo::Point;
use winit::event::{ElementState, TouchPhase, WindowEvent};

/// Routes mouse and touch window events through the input adapter to the editor.
#[derive(Debug, Default)]
pub struct EventHandler {
    adapter: InputAdapter,
    /// Last cursor position in screen pixels. Button events carry no position of their own.
    cursor: Option<Point>,
    /// Id of the touch that drives the drag; other fingers are ignored.
    active_touch: Option<u64>,
    /// Marker under the pointer.
    hovered: Option<usize>,
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker under the pointer, if any.
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Convert a mouse button event.
    pub fn mouse_input(&mut self, state: ElementState, button: winit::event::MouseButton) -> Option<RawInput> {
        let button = match button {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            _ => return None,
        };
        Some(match state {
            ElementState::Pressed => RawInput::MouseDown {
                position: self.cursor,
                button,
            },
            ElementState::Released => RawInput::MouseUp { button },
        })
    }

    /// Convert a cursor movement.
    pub fn cursor_moved(&mut self, position: Point) -> RawInput {
        self.cursor = Some(position);
        RawInput::MouseMove {
            position: Some(position),
        }
    }

    /// Convert a cursor leaving the window.
    pub fn cursor_left(&mut self) -> RawInput {
        self.cursor = None;
        RawInput::MouseLeave
    }

    /// Convert a touch event, following only the first finger down.
    pub fn touch_input(&mut self, id: u64, phase: TouchPhase, location: Point) -> Option<RawInput> {
        match phase {
            TouchPhase::Started => {
                if self.active_touch.is_some() {
                    return None;
                }
                self.active_touch = Some(id);
                Some(RawInput::TouchStart {
                    touches: vec![location],
                })
            }
            _ if self.active_touch != Some(id) => None,
            TouchPhase::Moved => Some(RawInput::TouchMove {
                touches: vec![location],
            }),
            TouchPhase::Ended => {
                self.active_touch = None;
                Some(RawInput::TouchEnd)
            }
            TouchPhase::Cancelled => {
                self.active_touch = None;
                Some(RawInput::TouchCancel)
            }
        }
    }

    /// Convert a window event to raw input, if it is a pointer event.
    pub fn raw_input(&mut self, event: &WindowEvent) -> Option<RawInput> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.cursor_moved(Point::new(position.x, position.y)))
            }
            WindowEvent::CursorLeft { .. } => Some(self.cursor_left()),
            WindowEvent::MouseInput { state, button, .. } => self.mouse_input(*state, *button),
            WindowEvent::Touch(touch) => self.touch_input(
                touch.id,
                touch.phase,
                Point::new(touch.location.x, touch.location.y),
            ),
            _ => None,
        }
    }

    /// Feed raw input to the editor. Returns whether anything visible changed.
    ///
    /// When `ui_has_pointer` is set (the pointer is over the side panel) new
    /// drags are not started, but an active drag keeps receiving events.
    pub fn handle_raw_input(
        &mut self,
        raw: RawInput,
        editor: &mut ShapeEditor,
        viewport: &Viewport,
        ui_has_pointer: bool,
    ) -> bool {
        let Some(event) = self.adapter.translate(raw, viewport) else {
            log::debug!("Dropped pointer input without usable coordinates");
            return false;
        };

        if ui_has_pointer && editor.drag().is_none() {
            return self.set_hovered(None);
        }

        let was_dragging = editor.dragged_vertex();
        let outcome = editor.handle_pointer_event(event);

        let hovered = match event {
            PointerEvent::Down { position } | PointerEvent::Move { position } => editor.vertex_at(position),
            PointerEvent::Up => self.adapter.pointer_position().and_then(|p| editor.vertex_at(p)),
            PointerEvent::Leave => None,
        };
        let hover_changed = self.set_hovered(hovered);

        matches!(outcome, DragOutcome::Moved) || hover_changed || was_dragging != editor.dragged_vertex()
    }

    /// Handle a window event. Returns whether a redraw is needed.
    pub fn handle_window_event(
        &mut self,
        event: &WindowEvent,
        editor: &mut ShapeEditor,
        viewport: &Viewport,
        ui_has_pointer: bool,
    ) -> bool {
        match self.raw_input(event) {
            Some(raw) => self.handle_raw_input(raw, editor, viewport, ui_has_pointer),
            None => false,
        }
    }

    fn set_hovered(&mut self, hovered: Option<usize>) -> bool {
        let changed = self.hovered != hovered;
        self.hovered = hovered;
        changed
    }
}
