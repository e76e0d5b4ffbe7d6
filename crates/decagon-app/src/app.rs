//! Core application state and lifecycle.

use decagon_core::config::{ConfigError, EditorConfig};
use decagon_core::editor::ShapeEditor;
use decagon_core::geometry::Constraints;
use decagon_core::polygon::Polygon;
use decagon_core::viewport::Viewport;
use decagon_render::{PolygonStyle, RenderContext, RenderResult, Renderer, RendererError, VelloRenderer};
use kurbo::{Rect, Size};
use peniko::Color;
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, ModifiersState, NamedKey};
use winit::window::{Window, WindowId};

use crate::event_handler::EventHandler;
use crate::frame::{self, PanelFrame};
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::ui::{render_ui, PanelInfo, UiAction, UiState};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    pub editor: EditorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Decagon Editor".to_string(),
            width: 900,
            height: 600,
            background_color: Color::from_rgba8(243, 244, 246, 255),
            editor: EditorConfig::default(),
        }
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    shape_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion (needed for WebGPU/WASM)
    texture_blitter: vello::wgpu::util::TextureBlitter,
    style: PolygonStyle,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    editor: ShapeEditor,
    viewport: Viewport,
    modifiers: ModifiersState,
    config: AppConfig,

    // Event handling
    event_handler: EventHandler,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// Window waiting for async surface creation (WASM only)
    pending_window: Option<Arc<Window>>,
    /// Flag to indicate async init is in progress
    #[cfg(target_arch = "wasm32")]
    init_in_progress: std::cell::Cell<bool>,
}

/// `config` if its settings are usable, otherwise the defaults. A layout that
/// only breaks the constraints is kept; `build_editor` replaces it.
fn usable_editor_config(config: &EditorConfig) -> EditorConfig {
    match config.validate() {
        Err(ConfigError::Polygon(_)) | Ok(()) => config.clone(),
        Err(e) => {
            log::error!("Invalid editor config, using defaults: {}", e);
            EditorConfig::default()
        }
    }
}

/// Build the editor for `config`, falling back to the reference layout and
/// then to the default constraints.
fn build_editor(config: &EditorConfig) -> ShapeEditor {
    match ShapeEditor::from_config(config) {
        Ok(editor) => editor,
        Err(e) => {
            log::error!("Invalid configured layout, using the reference decagon: {}", e);
            let fallback = EditorConfig {
                layout: Default::default(),
                ..config.clone()
            };
            ShapeEditor::from_config(&fallback).unwrap_or_else(|e| {
                log::error!("Reference layout rejected by configured constraints: {}", e);
                ShapeEditor::new(Polygon::reference(), Constraints::default())
                    .expect("Reference layout satisfies the default constraints")
            })
        }
    }
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            init_in_progress: std::cell::Cell::new(false),
        }
    }

    /// Run the application.
    pub async fn run(config: AppConfig) {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let app = App::with_config(config);

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            event_loop.run_app(&mut app).expect("Event loop error");
        }
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let render_cx = self.render_cx.as_ref().expect("RenderContext not initialized");
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .expect("Failed to create Vello renderer");

        // Vello renders to Rgba8Unorm; the surface may be Bgra8Unorm
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let editor_config = usable_editor_config(&self.config.editor);
        let mut editor = build_editor(&editor_config);
        let redraw_window = window.clone();
        editor.subscribe(move |_| redraw_window.request_redraw());

        let viewport = Viewport::new(
            editor_config.view_box,
            Size::new(surface.config.width as f64, surface.config.height as f64),
        );

        let style = PolygonStyle {
            marker_radius: editor_config.marker_radius,
            ..PolygonStyle::default()
        };

        log::info!("Decagon editor initialized - {}x{}", surface.config.width, surface.config.height);
        let shortcuts: Vec<String> = ShortcutRegistry::all()
            .iter()
            .map(|s| format!("{}={}", s.format(), s.description))
            .collect();
        log::info!("Keyboard shortcuts: {}", shortcuts.join(", "));

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            shape_renderer: VelloRenderer::new(),
            texture_blitter,
            style,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state: UiState::default(),
            editor,
            viewport,
            modifiers: ModifiersState::empty(),
            config: self.config.clone(),
            event_handler: EventHandler::new(),
        });

        self.pending_window = None;

        // Request initial redraw
        window.request_redraw();
    }

    /// Create the surface on the browser's executor, then finish init.
    #[cfg(target_arch = "wasm32")]
    fn spawn_surface_init(&mut self, window: Arc<Window>) {
        let (width, height) = crate::web::viewport_pixels((self.config.width, self.config.height));
        let self_ptr = self as *mut Self;

        wasm_bindgen_futures::spawn_local(async move {
            log::info!("Creating surface asynchronously...");
            let mut render_cx = vello::util::RenderContext::new();
            let created = render_cx
                .create_surface(window.clone(), width, height, PresentMode::AutoVsync)
                .await;

            // SAFETY: WASM is single-threaded and the event loop keeps App alive
            let app = unsafe { &mut *self_ptr };
            match created {
                Ok(surface) => {
                    // SAFETY: the surface holds an Arc of the window
                    let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
                    app.render_cx = Some(render_cx);
                    app.finish_init(window, surface);
                }
                Err(e) => {
                    log::error!("Failed to create surface: {:?}", e);
                    app.init_in_progress.set(false);
                }
            }
        });
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    fn apply_shortcut(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::Reset => self.editor.reset(),
            ShortcutAction::CancelDrag => {
                if self.editor.drag().is_some() {
                    self.editor.end_drag();
                    self.window.request_redraw();
                }
            }
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let key = match &event.logical_key {
            Key::Character(c) => c.as_str(),
            Key::Named(NamedKey::Escape) => "Escape",
            _ => return,
        };
        let ctrl = self.modifiers.control_key() || self.modifiers.super_key();
        if let Some(action) = ShortcutRegistry::action_for(key, ctrl, self.modifiers.shift_key()) {
            log::debug!("Shortcut {:?}", action);
            self.apply_shortcut(action);
        }
    }

    /// Build the UI and the scene, then draw both to the surface.
    fn redraw(&mut self, render_cx: &vello::util::RenderContext) -> RenderResult<()> {
        // UI first so a reset lands in this frame's scene
        let egui_input = self.egui_state.take_egui_input(&self.window);
        let info = PanelInfo::from_editor(&self.editor, self.event_handler.hovered());
        let ui_state = &mut self.ui_state;
        let mut ui_action = None;
        let egui_output = self.egui_ctx.run(egui_input, |ctx| {
            ui_action = render_ui(ctx, ui_state, &info);
        });
        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);
        let egui_primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        if let Some(UiAction::Reset) = ui_action {
            self.editor.reset();
        }

        let ctx = RenderContext::new(&self.editor, self.viewport)
            .with_background(self.config.background_color)
            .with_hovered(self.event_handler.hovered())
            .with_style(self.style);
        self.shape_renderer.build_scene(&ctx);
        let base_color = self.shape_renderer.background_color(&ctx);
        let scene = self.shape_renderer.take_scene();

        let device_handle = &render_cx.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;
        let (width, height) = (self.surface.config.width, self.surface.config.height);

        let surface_texture = self
            .surface
            .surface
            .get_current_texture()
            .map_err(|e| RendererError::Surface(format!("{:?}", e)))?;
        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        let target = frame::scene_target(device, width, height);
        let params = RenderParams {
            base_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };
        self.vello_renderer
            .render_to_texture(device, queue, &scene, &target, &params)
            .map_err(|e| RendererError::RenderFailed(format!("{:?}", e)))?;
        frame::present_scene(device, queue, &self.texture_blitter, &target, &surface_view);

        let panel = PanelFrame {
            primitives: egui_primitives,
            textures: egui_output.textures_delta,
            screen: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [width, height],
                pixels_per_point: egui_output.pixels_per_point,
            },
        };
        frame::paint_panel(&mut self.egui_renderer, device, queue, &surface_view, &panel);
        surface_texture.present();

        // The panel asks for more frames while hovered or animating
        if self.egui_ctx.has_requested_repaint() {
            self.window.request_redraw();
        }

        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        log::info!("Creating window...");

        #[cfg(not(target_arch = "wasm32"))]
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        #[cfg(target_arch = "wasm32")]
        let window_attrs = {
            use winit::platform::web::WindowAttributesExtWebSys;

            let pixels = crate::web::viewport_pixels((self.config.width, self.config.height));
            let canvas = crate::web::attach_canvas(pixels).expect("Failed to attach canvas");
            log::info!("Canvas attached: {}x{} physical pixels", pixels.0, pixels.1);

            Window::default_attributes()
                .with_title(&self.config.title)
                .with_canvas(Some(canvas))
        };

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        log::info!("Window created, initializing renderer...");

        // On native, block on async surface creation
        #[cfg(not(target_arch = "wasm32"))]
        {
            let size = window.inner_size();
            let (width, height) = if size.width == 0 || size.height == 0 {
                (self.config.width, self.config.height)
            } else {
                (size.width, size.height)
            };
            log::info!("Surface size: {}x{}", width, height);

            let render_cx = self.render_cx.get_or_insert_with(vello::util::RenderContext::new);
            let surface = pollster::block_on(render_cx.create_surface(
                window.clone(),
                width,
                height,
                PresentMode::AutoVsync,
            ))
            .expect("Failed to create surface");

            // SAFETY: the surface holds an Arc of the window, which App keeps alive
            let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
            self.finish_init(window, surface);
        }

        // On WASM, store window for later async initialization
        #[cfg(target_arch = "wasm32")]
        {
            self.pending_window = Some(window);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        // On WASM the surface is created asynchronously after the first event
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            if let Some(window) = self.pending_window.clone() {
                if !self.init_in_progress.replace(true) {
                    self.spawn_surface_init(window.clone());
                }
                // Keep events coming until init completes
                window.request_redraw();
            }
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }
        let ui_has_pointer = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }

                state
                    .viewport
                    .set_screen(Rect::new(0.0, 0.0, size.width as f64, size.height as f64));

                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }

                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };
                if let Err(e) = state.redraw(render_cx) {
                    match e {
                        RendererError::Surface(_) => log::warn!("{}", e),
                        _ => log::error!("{}", e),
                    }
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                state.modifiers = modifiers.state();
            }

            WindowEvent::KeyboardInput { ref event, .. } => {
                if !state.egui_ctx.wants_keyboard_input() {
                    state.handle_key(event);
                }
            }

            WindowEvent::Focused(false) => {
                // Releases outside the window never arrive
                if state.editor.drag().is_some() {
                    state.editor.end_drag();
                    state.window.request_redraw();
                }
            }

            ref pointer_event => {
                if state.event_handler.handle_window_event(
                    pointer_event,
                    &mut state.editor,
                    &state.viewport,
                    ui_has_pointer,
                ) {
                    state.window.request_redraw();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decagon_core::editor::DragOutcome;
    use decagon_core::polygon::Layout;
    use kurbo::Point;

    #[test]
    fn test_build_editor_from_default_config() {
        let editor = build_editor(&EditorConfig::default());
        assert_eq!(*editor.polygon(), Polygon::reference());
    }

    #[test]
    fn test_build_editor_falls_back_on_invalid_layout() {
        let config = EditorConfig {
            layout: Layout::Regular {
                center: Point::new(200.0, 220.0),
                radius: 5.0,
            },
            ..EditorConfig::default()
        };
        let editor = build_editor(&config);
        assert_eq!(*editor.polygon(), Polygon::reference());
        assert_eq!(editor.constraints().min_distance, 20.0);
    }

    #[test]
    fn test_inverted_view_box_replaced_by_defaults() {
        let config = EditorConfig {
            view_box: Rect::new(400.0, 0.0, 0.0, 440.0),
            ..EditorConfig::default()
        };
        let usable = usable_editor_config(&config);
        assert_eq!(usable, EditorConfig::default());

        let mut editor = build_editor(&usable);
        assert!(editor.begin_drag(0, Point::new(200.0, 20.0)));
        assert_eq!(editor.update_drag(Point::new(201.0, 20.0)), DragOutcome::Moved);
    }

    #[test]
    fn test_usable_config_keeps_invalid_layout() {
        let config = EditorConfig {
            min_distance: 30.0,
            layout: Layout::Regular {
                center: Point::new(200.0, 220.0),
                radius: 5.0,
            },
            ..EditorConfig::default()
        };
        assert_eq!(usable_editor_config(&config), config);
        assert_eq!(usable_editor_config(&EditorConfig::default()), EditorConfig::default());
    }

    #[test]
    fn test_build_editor_falls_back_to_default_constraints() {
        // Too strict for the reference layout as well
        let config = EditorConfig {
            min_distance: 500.0,
            ..EditorConfig::default()
        };
        let editor = build_editor(&config);
        assert_eq!(*editor.polygon(), Polygon::reference());
        assert_eq!(*editor.constraints(), Constraints::default());
    }
}
