use crate::score::AnimalKind;
use std::collections::VecDeque;

/// Things the simulation did this tick that the audio and UI layers react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// An ordinary animal started its speech bubble
    Collect { kind: AnimalKind },
    /// A shiny animal was found, power-up armed
    RareCollect { kind: AnimalKind },
    /// Score table changed for `kind`
    Scored { kind: AnimalKind, count: u32 },
    /// A new ground segment was generated starting at `start`
    SegmentGenerated { start: f32 },
    /// The body fell off the world, everything went back to the start
    WorldReset,
}

/// FIFO the simulation appends to and the session drains once per frame
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        EventQueue::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
