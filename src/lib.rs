#[macro_use]
pub mod browser;

pub mod background;
pub mod data;
pub mod engine;
pub mod game;
pub mod geom;
pub mod physics;
pub mod player;
pub mod sprite;

use crate::engine::GameLoop;
use crate::game::Walkabout;
use wasm_bindgen::prelude::*;

/// WebAssembly entry point: set up panic reporting and hand control to the
/// game loop on the local executor.
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    browser::spawn_local(async move {
        if let Err(err) = GameLoop::start(Walkabout::new()).await {
            log!("Error starting game loop: {:#}", err);
        }
    });

    Ok(())
}
