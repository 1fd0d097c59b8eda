//! The simulation: one owned `World` advanced by two entry points
//! - `tick`          : the render-driven 60 Hz step
//! - `particle_tick` : the fixed-rate particle task
//!
//! ┌──────────────────────── World::tick order ─────────────────────────┐
//! │ 1. intents      → Body::integrate                                  │
//! │ 2. animals      → Animal::update (bubble countdown)                │
//! │ 3. fell too far → reset everything                                 │
//! │ 4. near frontier→ TerrainGenerator::extend                         │
//! │ 5. camera       → Camera::update                                   │
//! │ 6. platforms    → collision::resolve                               │
//! │ 7. interact edge→ Animal::interact, score on the last bubble tick  │
//! │ 8. far behind   → prune                                            │
//! └────────────────────────────────────────────────────────────────────┘
//! Collision runs after integration and generation so platforms are solid
//! on the tick they appear; interaction runs after collision so positions
//! are final.

use crate::body::Body;
use crate::camera::Camera;
use crate::collectible::{Animal, Lifecycle};
use crate::collision;
use crate::controls::{Action, EdgeDetector, Intent};
use crate::engine::KeyState;
use crate::events::{EventQueue, GameEvent};
use crate::particles::ParticleEmitter;
use crate::score::ScoreTable;
use crate::terrain::{Terrain, TerrainGenerator};
use crate::tuning::Tuning;
use rand::SeedableRng;
use rand_pcg::Pcg32;

pub struct World {
    tuning: Tuning,
    rng: Pcg32,
    body: Body,
    terrain: Terrain,
    animals: Vec<Animal>,
    particles: ParticleEmitter,
    camera: Camera,
    score: ScoreTable,
    controls: EdgeDetector<Action>,
    events: EventQueue,
    ticks: u64,
}

impl World {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let (terrain, animals) = Terrain::initial(&tuning.terrain);
        World {
            body: Body::new(&tuning.body),
            rng: Pcg32::seed_from_u64(seed),
            terrain,
            animals,
            particles: ParticleEmitter::new(),
            camera: Camera::new(),
            score: ScoreTable::new(),
            controls: EdgeDetector::new(),
            events: EventQueue::new(),
            ticks: 0,
            tuning,
        }
    }

    /// Advance one render-driven simulation step
    pub fn tick(&mut self, keys: &KeyState) {
        self.ticks += 1;

        self.body
            .integrate(Intent::from_keys(keys), &self.tuning.body);

        for animal in &mut self.animals {
            animal.update();
        }

        if self.body.position.y > self.tuning.body.fail_depth {
            log::info!("Fell off the world at x = {:.0}, resetting", self.body.position.x);
            self.reset();
            self.events.push(GameEvent::WorldReset);
        }

        self.extend_terrain();

        self.camera.update(self.body.position.x, &self.tuning.camera);

        collision::resolve(
            &mut self.body,
            self.terrain.platforms(),
            self.tuning.body.ground_y,
            &self.tuning.collision,
        );

        self.controls.update(Action::held(keys));
        self.interact(self.controls.just_pressed(Action::Interact));

        self.prune();
    }

    /// One step of the fixed-rate particle task
    pub fn particle_tick(&mut self) {
        self.particles
            .tick(&mut self.body, &self.tuning.particles, &mut self.rng);
    }

    /// Back to the starting area with an empty score table
    ///
    /// The RNG keeps running so the next world differs from the last. Held
    /// keys are remembered, a key held through the reset is not a new press.
    pub fn reset(&mut self) {
        let (terrain, animals) = Terrain::initial(&self.tuning.terrain);
        self.terrain = terrain;
        self.animals = animals;
        self.body = Body::new(&self.tuning.body);
        self.camera = Camera::new();
        self.particles.clear();
        self.score.reset();
    }

    fn extend_terrain(&mut self) {
        let generator = TerrainGenerator::new(&self.tuning.terrain, self.tuning.body.ground_y);
        let extension = generator.extend(self.body.right(), self.terrain.frontier(), &mut self.rng);
        if extension.is_empty() {
            return;
        }
        for segment in &extension.segments {
            log::debug!("Generated segment at {:.0}", segment.start);
            self.events.push(GameEvent::SegmentGenerated {
                start: segment.start,
            });
        }
        let animals = self.terrain.append(extension);
        self.animals.extend(animals);
    }

    fn interact(&mut self, pressed: bool) {
        let config = &self.tuning.collectible;
        for animal in &mut self.animals {
            if pressed
                && animal.is_interactive()
                && animal.is_near(self.body.position, config.interact_range)
                && animal.interact(config.interact_ticks)
            {
                if animal.is_shiny() {
                    self.body.arm_power_up(config.power_up_ticks);
                    self.events.push(GameEvent::RareCollect {
                        kind: animal.kind(),
                    });
                } else {
                    self.events.push(GameEvent::Collect {
                        kind: animal.kind(),
                    });
                }
            }
            // exactly once per animal: the countdown passes 1 a single time
            if animal.score_due() {
                let count = self.score.record(animal.kind());
                self.events.push(GameEvent::Scored {
                    kind: animal.kind(),
                    count,
                });
            }
        }
    }

    fn prune(&mut self) {
        let Some(distance) = self.tuning.prune_distance else {
            return;
        };
        let cutoff = self.camera.x() - distance;
        if cutoff <= 0.0 {
            return;
        }
        let terrain_removed = self.terrain.prune_behind(cutoff);
        let before = self.animals.len();
        // an open bubble still owes its score, keep it until collected
        self.animals.retain(|animal| {
            matches!(animal.lifecycle(), Lifecycle::Interacting { .. })
                || animal.bounding_box().right() >= cutoff
        });
        let animals_removed = before - self.animals.len();
        if terrain_removed + animals_removed > 0 {
            log::debug!(
                "Pruned {} terrain pieces and {} animals behind {:.0}",
                terrain_removed,
                animals_removed,
                cutoff
            );
        }
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn animals(&self) -> &[Animal] {
        &self.animals
    }

    pub fn animals_mut(&mut self) -> &mut Vec<Animal> {
        &mut self.animals
    }

    pub fn particles(&self) -> &ParticleEmitter {
        &self.particles
    }

    pub fn camera_x(&self) -> f32 {
        self.camera.x()
    }

    pub fn score(&self) -> &ScoreTable {
        &self.score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Point;
    use crate::score::AnimalKind;
    use approx::assert_relative_eq;

    fn keys(codes: &[&str]) -> KeyState {
        codes.iter().copied().collect()
    }

    /// Body standing on the ground at `x` with a single animal next to it
    fn world_with_animal(x: f32, animal: Animal) -> World {
        let mut world = World::new(Tuning::default(), 42);
        let ground_y = world.tuning().body.ground_y;
        world.body_mut().position.x = x;
        world.body_mut().land_on(ground_y);
        *world.animals_mut() = vec![animal];
        world
    }

    fn cat_at(x: f32) -> Animal {
        Animal::new(Point::new(x, 520.0), 32.0, AnimalKind::Cat, false)
    }

    #[test]
    fn tapping_interact_collects_once() {
        let mut world = world_with_animal(100.0, cat_at(110.0));

        world.tick(&keys(&["KeyE"]));
        assert_eq!(
            world.animals()[0].lifecycle(),
            Lifecycle::Interacting { remaining: 60 }
        );
        for _ in 0..70 {
            world.tick(&keys(&[]));
        }

        assert_eq!(world.animals()[0].lifecycle(), Lifecycle::Collected);
        assert_eq!(world.score().count(AnimalKind::Cat), 1);
        let events: Vec<_> = world.drain_events().collect();
        assert_eq!(
            events,
            vec![
                GameEvent::Collect {
                    kind: AnimalKind::Cat
                },
                GameEvent::Scored {
                    kind: AnimalKind::Cat,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn score_lands_before_animal_disappears() {
        let mut world = world_with_animal(100.0, cat_at(110.0));
        world.tick(&keys(&["KeyE"]));
        for _ in 0..59 {
            world.tick(&keys(&[]));
        }
        assert_eq!(world.score().count(AnimalKind::Cat), 1);
        assert!(world.animals()[0].is_visible());
        world.tick(&keys(&[]));
        assert!(!world.animals()[0].is_visible());
        assert_eq!(world.score().count(AnimalKind::Cat), 1);
    }

    #[test]
    fn holding_interact_does_not_retrigger() {
        let mut world = world_with_animal(100.0, cat_at(110.0));
        let held = keys(&["KeyE"]);
        world.tick(&held);
        world.animals_mut().push(cat_at(115.0));
        for _ in 0..10 {
            world.tick(&held);
        }
        assert_eq!(world.animals()[1].lifecycle(), Lifecycle::Idle);

        world.tick(&keys(&[]));
        world.tick(&held);
        assert_eq!(
            world.animals()[1].lifecycle(),
            Lifecycle::Interacting { remaining: 60 }
        );
    }

    #[test]
    fn out_of_range_animal_ignores_press() {
        let mut world = world_with_animal(100.0, cat_at(140.0));
        world.tick(&keys(&["KeyE"]));
        assert_eq!(world.animals()[0].lifecycle(), Lifecycle::Idle);
    }

    #[test]
    fn shiny_animal_arms_power_up() {
        let shiny = Animal::new(Point::new(110.0, 520.0), 32.0, AnimalKind::Owl, true);
        let mut world = world_with_animal(100.0, shiny);
        world.tick(&keys(&["KeyE"]));

        assert_eq!(world.body().power_up, 180);
        assert_eq!(
            world.drain_events().next(),
            Some(GameEvent::RareCollect {
                kind: AnimalKind::Owl
            })
        );

        world.particle_tick();
        assert_eq!(world.particles().len(), 2);
        assert_eq!(world.body().power_up, 179);

        world.tick(&keys(&["ArrowRight"]));
        assert_relative_eq!(world.body().velocity.x, world.tuning().body.boost_speed);
    }

    #[test]
    fn falling_off_the_world_resets_everything() {
        let mut tuning = Tuning::default();
        tuning.body.ground_y = 1000.0;
        let mut world = World::new(tuning, 42);
        world.body_mut().position.x = 100.0;
        world.body_mut().land_on(1000.0);
        *world.animals_mut() = vec![Animal::new(
            Point::new(110.0, 960.0),
            32.0,
            AnimalKind::Cat,
            false,
        )];
        world.tick(&keys(&["KeyE"]));
        for _ in 0..60 {
            world.tick(&keys(&[]));
        }
        assert_eq!(world.score().total(), 1);

        world.body_mut().position = Point::new(2000.0, 701.0);
        world.body_mut().grounded = false;
        world.tick(&keys(&[]));

        assert_eq!(world.body().position, Point::new(100.0, 500.0));
        assert_eq!(world.score().total(), 0);
        assert_eq!(world.animals().len(), 3);
        assert_eq!(world.terrain().platforms().len(), 1);
        assert_eq!(world.terrain().segments().len(), 1);
        assert_eq!(world.terrain().frontier(), 800.0);
        assert!(world.drain_events().any(|event| event == GameEvent::WorldReset));
    }

    #[test]
    fn ground_left_of_the_start_is_solid() {
        let mut world = world_with_animal(100.0, cat_at(110.0));
        world.tick(&keys(&["KeyE"]));
        for _ in 0..60 {
            world.tick(&keys(&[]));
        }

        for _ in 0..300 {
            world.tick(&keys(&["ArrowLeft"]));
        }

        assert!(world.body().position.x < 0.0);
        assert!(world.body().grounded);
        assert_eq!(world.score().total(), 1);
    }

    #[test]
    fn interact_held_through_a_reset_does_not_press() {
        let mut world = world_with_animal(100.0, cat_at(110.0));
        world.tick(&keys(&["KeyE"]));
        world.reset();

        let ground_y = world.tuning().body.ground_y;
        world.body_mut().position.x = 100.0;
        world.body_mut().land_on(ground_y);
        *world.animals_mut() = vec![cat_at(110.0)];
        world.tick(&keys(&["KeyE"]));

        assert_eq!(world.animals()[0].lifecycle(), Lifecycle::Idle);
        world.tick(&keys(&[]));
        world.tick(&keys(&["KeyE"]));
        assert!(matches!(
            world.animals()[0].lifecycle(),
            Lifecycle::Interacting { .. }
        ));
    }

    #[test]
    fn approaching_frontier_generates_one_segment() {
        let mut world = world_with_animal(359.0, cat_at(110.0));
        world.tick(&keys(&[]));
        assert_eq!(world.terrain().segments().len(), 1);

        world.body_mut().position.x = 361.0;
        world.tick(&keys(&[]));
        assert_eq!(world.terrain().segments().len(), 2);
        assert_eq!(world.terrain().frontier(), 1600.0);
        let ordinary = world.animals().iter().skip(1).filter(|a| !a.is_shiny()).count();
        assert_eq!(ordinary, 2);
        assert!(world.drain_events().any(|event| event
            == GameEvent::SegmentGenerated { start: 800.0 }));
    }

    #[test]
    fn new_platform_is_solid_on_the_tick_it_appears() {
        let mut tuning = Tuning::default();
        tuning.terrain.platform_chance = 1.0;
        // same seed as the world, so this is the first platform it generates
        let platform = TerrainGenerator::new(&tuning.terrain, tuning.body.ground_y)
            .extend(401.0, 800.0, &mut Pcg32::seed_from_u64(9))
            .platforms[0];
        let mut world = World::new(tuning, 9);

        let top = platform.top();
        let body = world.body_mut();
        body.position = Point::new(platform.bounding_box().x() + 10.0, top - 40.5);
        body.velocity.y = 0.0;
        world.tick(&keys(&[]));

        assert_eq!(world.terrain().platforms()[1], platform);
        assert!(world.body().grounded);
        assert_relative_eq!(world.body().bottom(), top);
    }

    #[test]
    fn pruning_drops_old_terrain_but_keeps_score() {
        let mut world = world_with_animal(100.0, cat_at(110.0));
        world.tick(&keys(&["KeyE"]));
        for _ in 0..60 {
            world.tick(&keys(&[]));
        }
        world.body_mut().position = Point::new(6000.0, 300.0);
        world.body_mut().grounded = false;
        for _ in 0..60 {
            world.tick(&keys(&[]));
        }
        assert!(world.body().grounded);

        let cutoff = world.camera_x() - 2400.0;
        assert!(cutoff > 800.0);
        let segments = world.terrain().segments();
        assert_eq!(segments[0].start, 0.0);
        assert!(segments
            .windows(2)
            .all(|pair| pair[0].end() == pair[1].start));
        assert!(segments[1..].iter().all(|segment| segment.end() >= cutoff));
        assert!(world
            .animals()
            .iter()
            .all(|animal| animal.bounding_box().right() >= cutoff));
        assert_eq!(world.score().count(AnimalKind::Cat), 1);
        assert!(world.terrain().frontier() - world.body().position.x >= 400.0);
    }
}
