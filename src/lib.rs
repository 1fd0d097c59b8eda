// ==================== Imports ====================
use engine::GameLoop;
use game::CuteCritters;
use wasm_bindgen::prelude::*;

mod audio;
mod browser;
pub mod body;
pub mod camera;
pub mod collectible;
pub mod collision;
pub mod controls;
pub mod engine;
pub mod events;
mod game;
pub mod particles;
pub mod score;
pub mod terrain;
pub mod tuning;
mod ui;
pub mod world;

// ==================== Main Functions ====================
/// Main entry for Webassembly module
/// - installs the panic hook and the console logger
/// - spawns the game loop on the browser's task queue
#[wasm_bindgen(start)]
pub fn main_js() -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info)
        .map_err(|err| JsValue::from_str(&format!("Could not start logging : {}", err)))?;

    browser::spawn_local(async move {
        if let Err(err) = GameLoop::start(CuteCritters::new()).await {
            log::error!("Could not start the game : {:#}", err);
        }
    });

    Ok(())
}
