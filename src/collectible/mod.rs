// ┌─────────────────── Collectible lifecycle ───────────────────┐
// │  From State   →  Event     →  To State                      │
// ├─────────────────────────────────────────────────────────────┤
// │  Idle         →  Interact  →  Interacting (bubble shown)    │
// │  Interacting  →  Update    →  Interacting (timer > 0)       │
// │  Interacting  →  Update    →  Collected   (timer == 0)      │
// └─────────────────────────────────────────────────────────────┘
// - state.rs  : typed states, transitions only through their methods
// - animal.rs : the enum state machine and the Animal wrapper the world holds
pub mod animal;
pub mod state;

pub use animal::{Animal, Lifecycle};

/// Marker types for the phantom state parameter of `AnimalState<S>`
#[derive(Debug, Copy, Clone)]
pub struct Idle;

#[derive(Debug, Copy, Clone)]
pub struct Interacting;

#[derive(Debug, Copy, Clone)]
pub struct Collected;

/// Per-state facts shared by every animal in that state
pub trait LifecycleState {
    fn name() -> &'static str;
    /// drawn on the canvas
    fn visible() -> bool;
    /// can still be touched by the player
    fn interactive() -> bool;
}

impl LifecycleState for Idle {
    fn name() -> &'static str {
        "Idle"
    }
    fn visible() -> bool {
        true
    }
    fn interactive() -> bool {
        true
    }
}

impl LifecycleState for Interacting {
    fn name() -> &'static str {
        "Interacting"
    }
    fn visible() -> bool {
        true
    }
    fn interactive() -> bool {
        false
    }
}

impl LifecycleState for Collected {
    fn name() -> &'static str {
        "Collected"
    }
    fn visible() -> bool {
        false
    }
    fn interactive() -> bool {
        false
    }
}
