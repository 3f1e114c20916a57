//! Festive Runner core crate.
//!
//! Endless-runner side game drawn on a 2D canvas. The engine, entities and
//! input mapping are plain Rust and run natively under `cargo test`; the
//! browser side (canvas, atlas image, audio, animation frames, listeners)
//! lives in `web` and is reached from JS through `start_game()`.

use wasm_bindgen::prelude::*;

pub mod audio;
pub mod clock;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod input;
pub mod logging;
pub mod sprites;
pub mod surface;
pub mod util;
mod web;

pub use audio::{AudioError, AudioPlayer, AudioSink, Cue};
pub use clock::{FrameClock, FrameId, FrameLoop, FrameScheduler};
pub use config::{ConfigError, GameConfig};
pub use engine::{Engine, GameState};
pub use error::GameError;
pub use input::{Command, InputAdapter, InputEvent, Key};
pub use sprites::{SpriteName, SpriteRegion, SpriteSheet};
pub use surface::{Surface, TextAlign, TextStyle};
pub use util::{Rect, Rng, check_collision};
pub use web::{GameHandle, start_game};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}
