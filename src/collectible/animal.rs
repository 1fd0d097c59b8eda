use super::state::{AnimalContext, AnimalState, IsInteracting};
use crate::collectible::{self as marker, LifecycleState};
use crate::engine::{Point, Rect};
use crate::score::AnimalKind;

pub enum Event {
    Interact { ticks: u32 },
    Update,
}

/// Lifecycle as seen from outside the state machine
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Interacting { remaining: u32 },
    Collected,
}

#[derive(Debug, Copy, Clone)]
enum AnimalStateMachine {
    Idle(AnimalState<marker::Idle>),
    Interacting(AnimalState<marker::Interacting>),
    Collected(AnimalState<marker::Collected>),
}

impl From<AnimalState<marker::Idle>> for AnimalStateMachine {
    fn from(state: AnimalState<marker::Idle>) -> Self {
        AnimalStateMachine::Idle(state)
    }
}

impl From<AnimalState<marker::Interacting>> for AnimalStateMachine {
    fn from(state: AnimalState<marker::Interacting>) -> Self {
        AnimalStateMachine::Interacting(state)
    }
}

impl From<AnimalState<marker::Collected>> for AnimalStateMachine {
    fn from(state: AnimalState<marker::Collected>) -> Self {
        AnimalStateMachine::Collected(state)
    }
}

impl From<IsInteracting> for AnimalStateMachine {
    fn from(is_interacting: IsInteracting) -> Self {
        match is_interacting {
            IsInteracting::Done(collected_state) => collected_state.into(),
            IsInteracting::InProgress(interacting_state) => interacting_state.into(),
        }
    }
}

impl AnimalStateMachine {
    // consumes self so the old state can't be touched after a transition
    fn transition(self, event: Event) -> Self {
        use AnimalStateMachine::*;
        match (self, event) {
            (Idle(state), Event::Interact { ticks }) => state.interact(ticks).into(),
            (Interacting(state), Event::Update) => state.update().into(),
            // Idle and Collected don't change on Update, and only Idle
            // reacts to Interact
            _ => self,
        }
    }

    fn context(&self) -> &AnimalContext {
        use AnimalStateMachine::*;
        match self {
            Idle(state) => state.context(),
            Interacting(state) => state.context(),
            Collected(state) => state.context(),
        }
    }

    fn visible(&self) -> bool {
        use AnimalStateMachine::*;
        match self {
            Idle(_) => marker::Idle::visible(),
            Interacting(_) => marker::Interacting::visible(),
            Collected(_) => marker::Collected::visible(),
        }
    }

    fn interactive(&self) -> bool {
        use AnimalStateMachine::*;
        match self {
            Idle(_) => marker::Idle::interactive(),
            Interacting(_) => marker::Interacting::interactive(),
            Collected(_) => marker::Collected::interactive(),
        }
    }

    fn name(&self) -> &'static str {
        use AnimalStateMachine::*;
        match self {
            Idle(_) => marker::Idle::name(),
            Interacting(_) => marker::Interacting::name(),
            Collected(_) => marker::Collected::name(),
        }
    }
}

/// A collectible animal
/// - update() -> countdown of an open speech bubble
/// - interact() -> Idle to Interacting, once
#[derive(Debug, Clone)]
pub struct Animal {
    state: AnimalStateMachine,
}

impl Animal {
    pub fn new(position: Point, size: f32, kind: AnimalKind, shiny: bool) -> Self {
        Animal {
            state: AnimalState::new(position, size, kind, shiny).into(),
        }
    }

    pub fn update(&mut self) {
        self.state = self.state.transition(Event::Update);
    }

    /// Open the speech bubble, returns false if the animal was not Idle
    pub fn interact(&mut self, ticks: u32) -> bool {
        if !self.state.interactive() {
            return false;
        }
        self.state = self.state.transition(Event::Interact { ticks });
        true
    }

    /// True on exactly one tick of the bubble: when one tick remains
    pub fn score_due(&self) -> bool {
        self.lifecycle() == Lifecycle::Interacting { remaining: 1 }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self.state {
            AnimalStateMachine::Idle(_) => Lifecycle::Idle,
            AnimalStateMachine::Interacting(state) => Lifecycle::Interacting {
                remaining: state.context().timer,
            },
            AnimalStateMachine::Collected(_) => Lifecycle::Collected,
        }
    }

    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible()
    }

    pub fn is_interactive(&self) -> bool {
        self.state.interactive()
    }

    /// Within `range` of `point` on both axes, measured between top-left corners
    pub fn is_near(&self, point: Point, range: f32) -> bool {
        let position = self.position();
        (point.x - position.x).abs() < range && (point.y - position.y).abs() < range
    }

    pub fn position(&self) -> Point {
        self.state.context().position
    }

    pub fn bounding_box(&self) -> Rect {
        self.state.context().bounding_box()
    }

    pub fn kind(&self) -> AnimalKind {
        self.state.context().kind
    }

    pub fn is_shiny(&self) -> bool {
        self.state.context().shiny
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat() -> Animal {
        Animal::new(Point::new(110.0, 520.0), 32.0, AnimalKind::Cat, false)
    }

    #[test]
    fn interact_only_once() {
        let mut animal = cat();
        assert!(animal.interact(60));
        assert_eq!(animal.lifecycle(), Lifecycle::Interacting { remaining: 60 });
        assert!(!animal.interact(60));
        assert_eq!(animal.lifecycle(), Lifecycle::Interacting { remaining: 60 });
    }

    #[test]
    fn score_due_on_exactly_one_tick() {
        let mut animal = cat();
        animal.interact(60);
        let mut due_ticks = 0;
        let mut ticks = 0;
        while animal.lifecycle() != Lifecycle::Collected {
            if animal.score_due() {
                due_ticks += 1;
            }
            animal.update();
            ticks += 1;
        }
        assert_eq!(due_ticks, 1);
        assert_eq!(ticks, 60);
        assert!(!animal.is_visible());
        assert!(!animal.interact(60));
    }

    #[test]
    fn idle_animal_ignores_updates() {
        let mut animal = cat();
        animal.update();
        assert_eq!(animal.lifecycle(), Lifecycle::Idle);
        assert!(animal.is_visible());
        assert_eq!(animal.state_name(), "Idle");
    }

    #[test]
    fn proximity_uses_both_axes() {
        let animal = cat();
        assert!(animal.is_near(Point::new(100.0, 520.0), 32.0));
        assert!(!animal.is_near(Point::new(100.0, 480.0), 32.0));
        assert!(!animal.is_near(Point::new(150.0, 520.0), 32.0));
    }
}
