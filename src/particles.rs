use crate::body::Body;
use crate::engine::Point;
use crate::tuning::ParticleConfig;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Point,
    pub opacity: f32,
    pub color: String,
}

/// Sparkle trail behind a powered-up body
#[derive(Debug, Clone, Default)]
pub struct ParticleEmitter {
    particles: Vec<Particle>,
}

impl ParticleEmitter {
    pub fn new() -> Self {
        ParticleEmitter::default()
    }

    /// One step of the fixed-rate particle task: spawn, then age
    pub fn tick(&mut self, body: &mut Body, config: &ParticleConfig, rng: &mut impl Rng) {
        self.spawn(body, config, rng);
        self.update(config);
    }

    /// Spend one tick of the body's power-up on `per_tick` new particles
    pub fn spawn(&mut self, body: &mut Body, config: &ParticleConfig, rng: &mut impl Rng) {
        if body.power_up == 0 {
            return;
        }
        for _ in 0..config.per_tick {
            let position = Point::new(
                body.position.x + config.offset_x + rng.gen::<f32>() * config.jitter,
                body.position.y + config.offset_y + rng.gen::<f32>() * config.jitter,
            );
            let velocity = Point::new(
                (rng.gen::<f32>() - 0.5) * 2.0 * config.max_speed_x,
                -config.min_rise - rng.gen::<f32>() * config.rise_jitter,
            );
            let color = config.palette[rng.gen_range(0..config.palette.len())].clone();
            self.particles.push(Particle {
                position,
                velocity,
                opacity: 1.0,
                color,
            });
        }
        body.power_up -= 1;
    }

    /// Move and fade every particle, dropping the invisible ones
    pub fn update(&mut self, config: &ParticleConfig) {
        for particle in &mut self.particles {
            particle.position.x += particle.velocity.x;
            particle.position.y += particle.velocity.y;
            particle.opacity -= config.fade;
        }
        self.particles.retain(|particle| particle.opacity > 0.0);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::BodyConfig;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn no_power_up_no_particles() {
        let config = ParticleConfig::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut body = Body::new(&BodyConfig::default());
        let mut emitter = ParticleEmitter::new();
        emitter.tick(&mut body, &config, &mut rng);
        assert!(emitter.is_empty());
    }

    #[test]
    fn power_up_spawns_and_spends() {
        let config = ParticleConfig::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut body = Body::new(&BodyConfig::default());
        body.arm_power_up(3);
        let mut emitter = ParticleEmitter::new();

        emitter.spawn(&mut body, &config, &mut rng);
        assert_eq!(emitter.len(), 2);
        assert_eq!(body.power_up, 2);
        for particle in emitter.particles() {
            assert!(particle.velocity.y <= -1.0 && particle.velocity.y > -2.5);
            assert!(particle.velocity.x >= -1.0 && particle.velocity.x < 1.0);
            assert!(particle.position.x >= 120.0 && particle.position.x < 130.0);
            assert!(config.palette.contains(&particle.color));
        }
    }

    #[test]
    fn particles_fade_out() {
        let config = ParticleConfig::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut body = Body::new(&BodyConfig::default());
        body.arm_power_up(1);
        let mut emitter = ParticleEmitter::new();

        emitter.tick(&mut body, &config, &mut rng);
        assert_relative_eq!(emitter.particles()[0].opacity, 0.97);
        // 1.0 / 0.03 is a little over 33 steps
        for _ in 0..40 {
            emitter.tick(&mut body, &config, &mut rng);
        }
        assert!(emitter.is_empty());
        assert_eq!(body.power_up, 0);
    }
}
