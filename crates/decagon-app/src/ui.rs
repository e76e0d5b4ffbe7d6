//! UI components using egui.

use decagon_core::drag::DragMode;
use decagon_core::editor::ShapeEditor;
use decagon_core::polygon::VERTEX_COUNT;
use egui::{Align2, Color32, Context, CornerRadius, CursorIcon, Frame, Margin, Pos2, Sense, Stroke, Vec2};

use crate::shortcuts::ShortcutRegistry;

/// Standard colors used across the panel.
mod theme {
    use egui::Color32;

    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    pub const ACCENT: Color32 = Color32::from_rgb(14, 165, 233);
    pub const ACCENT_HOVER: Color32 = Color32::from_rgb(2, 132, 199);
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
}

const CORNER_RADIUS: u8 = 4;
const PANEL_RADIUS: u8 = 8;
const PANEL_WIDTH: f32 = 200.0;

/// Actions triggered from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// Restore the initial layout.
    Reset,
}

/// Persistent UI state between frames.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Whether the properties panel is expanded.
    pub panel_open: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self { panel_open: true }
    }
}

/// Snapshot of the editor shown in the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelInfo {
    pub area: f64,
    pub dragged: Option<usize>,
    pub hovered: Option<usize>,
    pub drag_mode: DragMode,
    pub min_distance: f64,
}

impl PanelInfo {
    /// Capture the parts of the editor the panel displays.
    pub fn from_editor(editor: &ShapeEditor, hovered: Option<usize>) -> Self {
        Self {
            area: editor.polygon().area(),
            dragged: editor.dragged_vertex(),
            hovered,
            drag_mode: editor.drag_mode(),
            min_distance: editor.constraints().min_distance,
        }
    }

    /// One-line description of what the pointer is doing.
    pub fn status(&self) -> String {
        match (self.dragged, self.hovered) {
            (Some(i), _) => format!("Dragging vertex {}", i),
            (None, Some(i)) => format!("Vertex {}", i),
            (None, None) => "Drag a vertex to reshape".to_string(),
        }
    }
}

/// Angle facts of a regular polygon with `sides` sides, as label/value rows.
pub fn polygon_facts(sides: usize) -> Vec<(&'static str, String)> {
    let n = sides as f64;
    let interior_sum = (n - 2.0) * 180.0;
    vec![
        ("Sides", sides.to_string()),
        ("Interior angle sum", format!("{}°", interior_sum)),
        ("Each interior angle", format!("{}°", interior_sum / n)),
        ("Exterior angle sum", "360°".to_string()),
        ("Each exterior angle", format!("{}°", 360.0 / n)),
    ]
}

/// Render the UI and return any triggered action.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState, info: &PanelInfo) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("properties_panel"))
        .anchor(Align2::RIGHT_TOP, Vec2::new(-12.0, 12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(PANEL_WIDTH);
                ui.spacing_mut().item_spacing = Vec2::new(4.0, 4.0);

                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Decagon").size(13.0).strong().color(theme::TEXT));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let icon = if ui_state.panel_open { "−" } else { "+" };
                        if ui.small_button(icon).clicked() {
                            ui_state.panel_open = !ui_state.panel_open;
                        }
                    });
                });

                if !ui_state.panel_open {
                    return;
                }

                separator(ui);
                section_label(ui, "REGULAR DECAGON");
                for (label, value) in polygon_facts(VERTEX_COUNT) {
                    property_row(ui, label, &value);
                }

                separator(ui);
                section_label(ui, "CURRENT SHAPE");
                property_row(ui, "Area", &format!("{:.0}", info.area));
                property_row(ui, "Min distance", &format!("{}", info.min_distance));
                let mode = match info.drag_mode {
                    DragMode::Offset => "Offset",
                    DragMode::Direct => "Direct",
                };
                property_row(ui, "Drag mode", mode);
                ui.label(egui::RichText::new(info.status()).size(11.0).color(theme::TEXT_MUTED));

                separator(ui);
                section_label(ui, "SHORTCUTS");
                for shortcut in ShortcutRegistry::all() {
                    property_row(ui, shortcut.description, &shortcut.format());
                }

                ui.add_space(4.0);
                if primary_button(ui, "Reset") {
                    action = Some(UiAction::Reset);
                }
            });
        });

    action
}

/// Floating panel frame with border and soft shadow.
fn panel_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(PANEL_RADIUS))
        .stroke(Stroke::new(1.0, theme::BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(8))
}

/// Draw a section label (small, muted text).
fn section_label(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(text).size(10.0).color(theme::TEXT_MUTED));
}

fn separator(ui: &mut egui::Ui) {
    let rect = ui.available_rect_before_wrap();
    let y = rect.top() + 4.0;
    ui.painter().line_segment(
        [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
        Stroke::new(1.0, Color32::from_gray(230)),
    );
    ui.add_space(8.0);
}

/// Label on the left, value on the right.
fn property_row(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(label).size(12.0).color(theme::TEXT));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(egui::RichText::new(value).size(12.0).color(theme::TEXT_MUTED));
        });
    });
}

/// Full-width accent button. Returns true if clicked.
fn primary_button(ui: &mut egui::Ui, label: &str) -> bool {
    let size = Vec2::new(ui.available_width(), 28.0);
    let (rect, response) = ui.allocate_at_least(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let bg_color = if response.hovered() {
            theme::ACCENT_HOVER
        } else {
            theme::ACCENT
        };
        ui.painter().rect_filled(rect, CornerRadius::same(CORNER_RADIUS), bg_color);
        ui.painter().text(
            rect.center(),
            Align2::CENTER_CENTER,
            label,
            egui::FontId::proportional(13.0),
            Color32::WHITE,
        );
    }

    let clicked = response.clicked();
    response.on_hover_cursor(CursorIcon::PointingHand);
    clicked
}

#[cfg(test)]
mod tests {
    use super::*;
    use decagon_core::geometry::Constraints;
    use decagon_core::polygon::Polygon;
    use kurbo::Point;

    #[test]
    fn test_decagon_facts() {
        let facts = polygon_facts(10);
        let values: Vec<&str> = facts.iter().map(|(_, v)| v.as_str()).collect();
        assert_eq!(values, ["10", "1440°", "144°", "360°", "36°"]);
    }

    #[test]
    fn test_panel_info_status() {
        let mut editor = ShapeEditor::new(Polygon::reference(), Constraints::default()).unwrap();
        let info = PanelInfo::from_editor(&editor, Some(3));
        assert_eq!(info.status(), "Vertex 3");
        assert_eq!(info.min_distance, 20.0);
        assert!(info.area > 0.0);

        editor.begin_drag(0, Point::new(200.0, 20.0));
        let info = PanelInfo::from_editor(&editor, Some(3));
        assert_eq!(info.status(), "Dragging vertex 0");
    }

    #[test]
    fn test_render_ui_without_click() {
        let ctx = Context::default();
        let mut ui_state = UiState::default();
        let editor = ShapeEditor::new(Polygon::reference(), Constraints::default()).unwrap();
        let info = PanelInfo::from_editor(&editor, None);

        let mut action = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            action = render_ui(ctx, &mut ui_state, &info);
        });
        assert_eq!(action, None);
        assert!(ui_state.panel_open);
    }
}
