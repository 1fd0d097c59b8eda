//! Key bindings, movement intent and press-edge detection

use crate::engine::KeyState;
use std::collections::HashSet;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Interact,
    Pause,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Interact,
        Action::Pause,
    ];

    /// `KeyboardEvent.code` values bound to this action
    pub fn bindings(self) -> &'static [&'static str] {
        match self {
            Action::MoveLeft => &["ArrowLeft", "KeyA"],
            Action::MoveRight => &["ArrowRight", "KeyD"],
            Action::Jump => &["Space", "ArrowUp", "KeyW"],
            Action::Interact => &["KeyE"],
            Action::Pause => &["Escape"],
        }
    }

    pub fn is_held(self, keys: &KeyState) -> bool {
        self.bindings().iter().any(|code| keys.is_pressed(code))
    }

    /// Every action with at least one bound key held
    pub fn held(keys: &KeyState) -> HashSet<Action> {
        Action::ALL
            .into_iter()
            .filter(|action| action.is_held(keys))
            .collect()
    }
}

/// What the body should do this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    /// -1 left, 0 still, 1 right
    pub horizontal: f32,
    pub jump: bool,
}

impl Intent {
    pub fn from_keys(keys: &KeyState) -> Intent {
        // both directions at once cancel out
        let horizontal = match (Action::MoveLeft.is_held(keys), Action::MoveRight.is_held(keys)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        Intent {
            horizontal,
            jump: Action::Jump.is_held(keys),
        }
    }
}

/// Remembers the previous snapshot so presses can be told apart from holds
#[derive(Debug, Clone)]
pub struct EdgeDetector<A> {
    previous: HashSet<A>,
    current: HashSet<A>,
}

impl<A> Default for EdgeDetector<A> {
    fn default() -> Self {
        EdgeDetector {
            previous: HashSet::new(),
            current: HashSet::new(),
        }
    }
}

impl<A: Copy + Eq + Hash> EdgeDetector<A> {
    pub fn new() -> Self {
        EdgeDetector::default()
    }

    /// Advance one tick with the currently held set
    pub fn update(&mut self, held: HashSet<A>) {
        self.previous = std::mem::replace(&mut self.current, held);
    }

    /// Held now, released on the tick before
    pub fn just_pressed(&self, action: A) -> bool {
        self.current.contains(&action) && !self.previous.contains(&action)
    }

    pub fn is_held(&self, action: A) -> bool {
        self.current.contains(&action)
    }
}
