//! Runs in a headless browser with `wasm-pack test --headless --firefox`
#![cfg(target_arch = "wasm32")]

use cute_critters::engine::KeyState;
use cute_critters::tuning::Tuning;
use cute_critters::world::World;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn world_runs_under_wasm() {
    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let mut world = World::new(Tuning::default(), seed);
    let right: KeyState = ["ArrowRight"].into_iter().collect();
    for _ in 0..600 {
        world.tick(&right);
    }
    assert!(world.body().position.x > 1000.0);
    assert!(world.terrain().frontier() - world.body().right() >= 400.0);
}

#[wasm_bindgen_test]
fn partial_tuning_fills_in_defaults() {
    let json = r#"{ "body": { "gravity": 0.5 }, "camera": { "smoothing": 0.2 }, "particles_while_paused": true }"#;
    let value = js_sys::JSON::parse(json).unwrap();
    let tuning: Tuning = serde_wasm_bindgen::from_value(value).unwrap();

    let mut expected = Tuning::default();
    expected.body.gravity = 0.5;
    expected.camera.smoothing = 0.2;
    expected.particles_while_paused = true;
    assert_eq!(tuning, expected);
    assert!(tuning.validate().is_ok());
}
