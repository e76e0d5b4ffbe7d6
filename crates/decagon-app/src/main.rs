//! Main application entry point (native).
//!
//! Usage: `decagon [config.json]`

#[cfg(feature = "native")]
fn main() {
    use decagon_app::{App, AppConfig};
    use decagon_core::EditorConfig;
    use std::path::PathBuf;

    env_logger::init();
    log::info!("Starting Decagon editor");

    let mut config = AppConfig::default();
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        match EditorConfig::load(&path) {
            Ok(editor) => {
                log::info!("Loaded config from {}", path.display());
                config.editor = editor;
            }
            Err(e) => log::error!("Using default config: {}", e),
        }
    }

    pollster::block_on(App::run(config));
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
