//! Decagon Application
//!
//! The application shell providing windowing, input handling,
//! and integration of the editor, renderer and UI.

mod app;
mod event_handler;
mod frame;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig};
pub use event_handler::EventHandler;
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};
pub use ui::{render_ui, PanelInfo, UiAction, UiState};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
