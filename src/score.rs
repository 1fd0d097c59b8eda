use rand::Rng;
use serde::{Deserialize, Serialize};

/// The animals that can be found in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimalKind {
    Cat,
    Dog,
    Bun,
    Fox,
    Pig,
    Owl,
    Bee,
    Bat,
}

impl AnimalKind {
    pub const ALL: [AnimalKind; 8] = [
        AnimalKind::Cat,
        AnimalKind::Dog,
        AnimalKind::Bun,
        AnimalKind::Fox,
        AnimalKind::Pig,
        AnimalKind::Owl,
        AnimalKind::Bee,
        AnimalKind::Bat,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AnimalKind::Cat => "Cat",
            AnimalKind::Dog => "Dog",
            AnimalKind::Bun => "Bun",
            AnimalKind::Fox => "Fox",
            AnimalKind::Pig => "Pig",
            AnimalKind::Owl => "Owl",
            AnimalKind::Bee => "Bee",
            AnimalKind::Bat => "Bat",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            AnimalKind::Cat => "#ffd166",
            AnimalKind::Dog => "#a3cef1",
            AnimalKind::Bun => "#ffb4a2",
            AnimalKind::Fox => "#ffadad",
            AnimalKind::Pig => "#fbc3bc",
            AnimalKind::Owl => "#b5ead7",
            AnimalKind::Bee => "#fff700",
            AnimalKind::Bat => "#bdb2ff",
        }
    }

    pub fn random(rng: &mut impl Rng) -> AnimalKind {
        AnimalKind::ALL[rng.gen_range(0..AnimalKind::ALL.len())]
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Collected count per animal kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    counts: [u32; AnimalKind::ALL.len()],
}

impl ScoreTable {
    pub fn new() -> Self {
        ScoreTable::default()
    }

    /// Add one to `kind`, returning the new count
    pub fn record(&mut self, kind: AnimalKind) -> u32 {
        let count = &mut self.counts[kind.index()];
        *count += 1;
        *count
    }

    pub fn count(&self, kind: AnimalKind) -> u32 {
        self.counts[kind.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn reset(&mut self) {
        self.counts = Default::default();
    }

    /// Rows in display order, zero counts included
    pub fn iter(&self) -> impl Iterator<Item = (AnimalKind, u32)> + '_ {
        AnimalKind::ALL
            .iter()
            .map(move |&kind| (kind, self.count(kind)))
    }
}
