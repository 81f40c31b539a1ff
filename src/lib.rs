#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod error;
pub mod config;
pub mod types;
pub mod style;
pub mod geometry;
pub mod objects;
pub mod scene;
pub mod drawing;
pub mod selection;
pub mod background;
pub mod io;
pub mod engine;
pub mod render;

pub use engine::CanvasHost;
pub use error::{PaintError, Result};
pub use types::*;
pub use objects::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("logger already initialised");
    }
}
