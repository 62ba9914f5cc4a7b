//! Scroll-driven portfolio stage.
//!
//! The platform-independent core (scroll mapping, springs, section
//! choreography, the ordered ticker) builds everywhere and is tested on the
//! host. The browser glue lives in `wasm` and only compiles for wasm32.

pub mod camera;
pub mod config;
pub mod cursor;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod magnetic;
pub mod mapper;
pub mod particles;
pub mod scroll;
pub mod section;
pub mod setters;
pub mod spring;
pub mod stage;
pub mod style;
pub mod text;
pub mod ticker;
pub mod timeline;
pub mod trigger;

pub use error::{Error, Result};
pub use mapper::{map_scroll, MeshPose};
pub use stage::{Stage, StageState};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod app;
    mod dom;
    mod listeners;
    mod render;
    mod shaders;

    pub use app::{mount, Portfolio};

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
        if console_log::init_with_level(level).is_err() {
            web_sys::console::warn_1(&"logger already initialised".into());
        }
        log::info!("scrollfolio {}", env!("CARGO_PKG_VERSION"));
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{mount, Portfolio};
