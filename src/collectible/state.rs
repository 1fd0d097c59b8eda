//! Typed animal states
//!
//! `AnimalState<S>` can only change `S` through the methods below, so an
//! animal can't reach Collected without going through Interacting, and
//! nothing can send it back to Idle.
use super::{Collected, Idle, Interacting};
use crate::engine::{Point, Rect, Size};
use crate::score::AnimalKind;

pub enum IsInteracting {
    Done(AnimalState<Collected>),
    InProgress(AnimalState<Interacting>),
}

#[derive(Debug, Copy, Clone, PartialEq)]
/// Data shared by every state
pub struct AnimalContext {
    pub position: Point,
    pub size: f32,
    pub kind: AnimalKind,
    pub shiny: bool,
    /// ticks left on the speech bubble, 0 outside Interacting
    pub timer: u32,
}

impl AnimalContext {
    pub fn bounding_box(&self) -> Rect {
        Rect::new(self.position, Size::new(self.size, self.size))
    }

    fn with_timer(mut self, ticks: u32) -> Self {
        self.timer = ticks;
        self
    }

    fn count_down(mut self) -> Self {
        self.timer = self.timer.saturating_sub(1);
        self
    }
}

#[derive(Debug, Copy, Clone)]
pub struct AnimalState<S> {
    context: AnimalContext,
    // phantom state marker, only read by the type checker
    _state: S,
}

impl<S> AnimalState<S> {
    pub fn context(&self) -> &AnimalContext {
        &self.context
    }
}

impl AnimalState<Idle> {
    pub fn new(position: Point, size: f32, kind: AnimalKind, shiny: bool) -> Self {
        AnimalState {
            context: AnimalContext {
                position,
                size,
                kind,
                shiny,
                timer: 0,
            },
            _state: Idle,
        }
    }

    /// Show the speech bubble for `ticks`
    pub fn interact(self, ticks: u32) -> AnimalState<Interacting> {
        AnimalState {
            context: self.context.with_timer(ticks),
            _state: Interacting,
        }
    }
}

impl AnimalState<Interacting> {
    /// Returns an enum because the bubble can:
    /// - End      (Done)
    /// - Continue (InProgress)
    pub fn update(mut self) -> IsInteracting {
        self.context = self.context.count_down();
        if self.context.timer == 0 {
            IsInteracting::Done(self.collect())
        } else {
            IsInteracting::InProgress(self)
        }
    }

    fn collect(self) -> AnimalState<Collected> {
        AnimalState {
            context: self.context,
            _state: Collected,
        }
    }
}
