//! Ground segments, platforms and the procedural generator that grows them
//! to the right as the body approaches the frontier.

use crate::collectible::Animal;
use crate::engine::{Point, Rect};
use crate::score::AnimalKind;
use crate::tuning::TerrainConfig;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    bounding_box: Rect,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Platform {
            bounding_box: Rect::new_from_x_y(x, y, width, height),
        }
    }

    pub fn bounding_box(&self) -> Rect {
        self.bounding_box
    }

    pub fn top(&self) -> f32 {
        self.bounding_box.y()
    }

    pub fn right(&self) -> f32 {
        self.bounding_box.right()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainSegment {
    pub start: f32,
    pub length: f32,
}

impl TerrainSegment {
    pub fn end(&self) -> f32 {
        self.start + self.length
    }
}

/// Everything one `extend` call produced
#[derive(Debug, Default)]
pub struct Extension {
    pub segments: Vec<TerrainSegment>,
    pub platforms: Vec<Platform>,
    pub collectibles: Vec<Animal>,
    pub frontier: f32,
}

impl Extension {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

pub struct TerrainGenerator<'a> {
    config: &'a TerrainConfig,
    ground_y: f32,
}

impl<'a> TerrainGenerator<'a> {
    pub fn new(config: &'a TerrainConfig, ground_y: f32) -> Self {
        TerrainGenerator { config, ground_y }
    }

    pub fn needs_extension(&self, body_right: f32, frontier: f32) -> bool {
        body_right > frontier - self.config.lookahead
    }

    /// Append segments at `frontier` until `body_right` is at least the
    /// lookahead distance away from the new frontier
    pub fn extend(&self, body_right: f32, frontier: f32, rng: &mut impl Rng) -> Extension {
        let mut extension = Extension {
            frontier,
            ..Extension::default()
        };
        while self.needs_extension(body_right, extension.frontier) {
            self.generate_segment(&mut extension, rng);
            extension.frontier += self.config.segment_length;
        }
        extension
    }

    fn generate_segment(&self, extension: &mut Extension, rng: &mut impl Rng) {
        let config = self.config;
        let start = extension.frontier;
        extension.segments.push(TerrainSegment {
            start,
            length: config.segment_length,
        });

        let animal_span = config.segment_length - 2.0 * config.animal_margin;
        for _ in 0..config.animals_per_segment {
            let x = start + config.animal_margin + rng.gen::<f32>() * animal_span;
            extension.collectibles.push(Animal::new(
                Point::new(x, config.animal_y),
                config.animal_size,
                AnimalKind::random(rng),
                false,
            ));
        }

        if rng.gen_bool(config.platform_chance) {
            let platform_span = config.segment_length - 2.0 * config.platform_margin;
            let x = start + config.platform_margin + rng.gen::<f32>() * platform_span;
            let y = config.platform_min_y + rng.gen::<f32>() * config.platform_y_jitter;
            extension.platforms.push(Platform::new(
                x,
                y,
                config.platform_width,
                config.platform_height,
            ));
            // a low step just before it so the platform can be reached
            extension.platforms.push(Platform::new(
                x - config.step_offset_x,
                self.ground_y - config.step_rise,
                config.step_width,
                config.step_height,
            ));
            extension.collectibles.push(Animal::new(
                Point::new(x + config.shiny_offset_x, y - config.animal_size),
                config.animal_size,
                AnimalKind::random(rng),
                true,
            ));
        }
    }
}

/// Generated ground and platforms, plus the frontier they reach
#[derive(Debug, Clone)]
pub struct Terrain {
    segments: Vec<TerrainSegment>,
    platforms: Vec<Platform>,
    frontier: f32,
}

impl Terrain {
    /// The hand-placed starting area and its three animals
    pub fn initial(config: &TerrainConfig) -> (Terrain, Vec<Animal>) {
        let terrain = Terrain {
            segments: vec![TerrainSegment {
                start: 0.0,
                length: config.segment_length,
            }],
            platforms: vec![Platform::new(
                400.0,
                config.platform_min_y,
                config.platform_width,
                config.platform_height,
            )],
            frontier: config.segment_length,
        };
        let animals = [
            (300.0, AnimalKind::Cat),
            (500.0, AnimalKind::Dog),
            (650.0, AnimalKind::Bun),
        ]
        .into_iter()
        .map(|(x, kind)| {
            Animal::new(
                Point::new(x, config.animal_y),
                config.animal_size,
                kind,
                false,
            )
        })
        .collect();
        (terrain, animals)
    }

    /// Take in the ground and platforms of `extension`, handing back its animals
    pub fn append(&mut self, extension: Extension) -> Vec<Animal> {
        self.segments.extend(extension.segments);
        self.platforms.extend(extension.platforms);
        self.frontier = self.frontier.max(extension.frontier);
        extension.collectibles
    }

    /// Drop platforms ending left of `cutoff` and fold the ground segments
    /// there into one, returns how many entries went
    ///
    /// Segments are contiguous, so folding keeps the drawn floor unbroken
    /// all the way back to the start.
    pub fn prune_behind(&mut self, cutoff: f32) -> usize {
        let stale = self
            .segments
            .iter()
            .take_while(|segment| segment.end() < cutoff)
            .count();
        if stale > 1 {
            let start = self.segments[0].start;
            let end = self.segments[stale - 1].end();
            self.segments.splice(
                0..stale,
                [TerrainSegment {
                    start,
                    length: end - start,
                }],
            );
        }
        let platforms = self.platforms.len();
        self.platforms.retain(|platform| platform.right() >= cutoff);
        stale.saturating_sub(1) + platforms - self.platforms.len()
    }

    pub fn segments(&self) -> &[TerrainSegment] {
        &self.segments
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn frontier(&self) -> f32 {
        self.frontier
    }
}
