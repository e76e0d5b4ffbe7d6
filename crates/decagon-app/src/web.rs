//! WebAssembly entry point and page helpers.

use decagon_core::EditorConfig;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

use crate::AppConfig;

const CANVAS_ID: &str = "decagon-canvas";

/// Full-page canvas. `touch-action: none` keeps touch drags from scrolling.
const CANVAS_STYLE: &str = "position:fixed;top:0;left:0;width:100%;height:100%;display:block;touch-action:none";

/// Editor settings from the page URL, e.g. `?layout=regular&drag_mode=direct`.
fn editor_config_from_url() -> EditorConfig {
    let mut config = EditorConfig::default();
    let Some(window) = web_sys::window() else {
        return config;
    };
    let location = window.location();

    if let Ok(search) = location.search() {
        config.apply_query(&search);
    }
    if let Ok(hash) = location.hash() {
        config.apply_query(&hash);
    }
    config
}

/// Size of the browser viewport in physical pixels. `fallback` is used, in
/// CSS pixels, for any dimension the browser does not report.
pub(crate) fn viewport_pixels(fallback: (u32, u32)) -> (u32, u32) {
    let Some(window) = web_sys::window() else {
        return fallback;
    };
    let css = |value: Result<JsValue, JsValue>, default: u32| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(default as f64)
    };
    let dpr = window.device_pixel_ratio();
    let width = css(window.inner_width(), fallback.0) * dpr;
    let height = css(window.inner_height(), fallback.1) * dpr;
    (width as u32, height as u32)
}

/// Find the editor canvas, or create it inside `#app`, and size it to
/// `pixels`. Removes the loading placeholder.
pub(crate) fn attach_canvas(pixels: (u32, u32)) -> Option<HtmlCanvasElement> {
    let document = web_sys::window()?.document()?;
    if let Some(loading) = document.get_element_by_id("loading") {
        loading.remove();
    }

    let element = match document.get_element_by_id(CANVAS_ID) {
        Some(element) => element,
        None => {
            let element = document.create_element("canvas").ok()?;
            element.set_id(CANVAS_ID);
            document.get_element_by_id("app")?.append_child(&element).ok()?;
            element
        }
    };
    element.set_attribute("style", CANVAS_STYLE).ok()?;

    let canvas: HtmlCanvasElement = element.dyn_into().ok()?;
    canvas.set_width(pixels.0);
    canvas.set_height(pixels.1);
    Some(canvas)
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub async fn run_wasm() {
    console_error_panic_hook::set_once();

    console_log::init_with_level(log::Level::Info).expect("Failed to initialize logger");

    log::info!("Starting Decagon editor (WASM)");

    let config = AppConfig {
        editor: editor_config_from_url(),
        ..AppConfig::default()
    };
    crate::App::run(config).await;
}
