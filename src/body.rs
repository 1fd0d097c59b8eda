use crate::controls::Intent;
use crate::engine::{Point, Rect, Size};
use crate::tuning::BodyConfig;

/// The player character's physics state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Point,
    pub velocity: Point,
    pub size: Size,
    pub grounded: bool,
    /// ticks of boosted walking speed left
    pub speed_boost: u32,
    /// ticks of particle trail left, spent by the particle task
    pub power_up: u32,
}

impl Body {
    pub fn new(config: &BodyConfig) -> Self {
        Body {
            position: Point::new(config.spawn_x, config.spawn_y),
            velocity: Point::default(),
            size: Size::new(config.width, config.height),
            grounded: false,
            speed_boost: 0,
            power_up: 0,
        }
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.height
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.width
    }

    /// One tick of movement
    /// - set horizontal velocity from intent, jump when grounded
    /// - move by velocity, then accelerate by gravity
    /// - clamp onto the ground plane when the move would sink below it
    pub fn integrate(&mut self, intent: Intent, config: &BodyConfig) {
        let speed = if self.speed_boost > 0 {
            config.boost_speed
        } else {
            config.walk_speed
        };
        self.velocity.x = intent.horizontal * speed;
        if intent.jump && self.grounded {
            self.velocity.y = config.jump_velocity;
        }
        self.speed_boost = self.speed_boost.saturating_sub(1);

        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;
        self.velocity.y += config.gravity;

        if self.bottom() >= config.ground_y {
            self.land_on(config.ground_y);
        } else {
            // platforms may still catch us in collision resolution
            self.grounded = false;
        }
    }

    /// Snap the bottom edge onto `surface_y` and stop falling
    pub fn land_on(&mut self, surface_y: f32) {
        self.position.y = surface_y - self.size.height;
        self.velocity.y = 0.0;
        self.grounded = true;
    }

    /// Grant speed boost and particle trail for `ticks`
    pub fn arm_power_up(&mut self, ticks: u32) {
        self.speed_boost = ticks;
        self.power_up = ticks;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grounded_body(config: &BodyConfig) -> Body {
        let mut body = Body::new(config);
        body.land_on(config.ground_y);
        body
    }

    #[test]
    fn spawns_in_the_air() {
        let config = BodyConfig::default();
        let body = Body::new(&config);
        assert_eq!(body.position, Point::new(100.0, 500.0));
        assert!(!body.grounded);
    }

    #[test]
    fn falls_then_lands_on_ground() {
        let config = BodyConfig::default();
        let mut body = Body::new(&config);
        for _ in 0..60 {
            body.integrate(Intent::default(), &config);
        }
        assert!(body.grounded);
        assert_relative_eq!(body.bottom(), config.ground_y);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn standing_still_stays_grounded() {
        let config = BodyConfig::default();
        let mut body = grounded_body(&config);
        body.integrate(Intent::default(), &config);
        assert!(body.grounded);
        assert_relative_eq!(body.bottom(), config.ground_y);
    }

    #[test]
    fn horizontal_velocity_is_set_not_accumulated() {
        let config = BodyConfig::default();
        let mut body = grounded_body(&config);
        let right = Intent {
            horizontal: 1.0,
            jump: false,
        };
        body.integrate(right, &config);
        body.integrate(right, &config);
        assert_relative_eq!(body.velocity.x, config.walk_speed);
        assert_relative_eq!(body.position.x, config.spawn_x + 2.0 * config.walk_speed);
    }

    #[test]
    fn jump_only_when_grounded() {
        let config = BodyConfig::default();
        let jump = Intent {
            horizontal: 0.0,
            jump: true,
        };

        let mut airborne = Body::new(&config);
        airborne.integrate(jump, &config);
        assert!(airborne.velocity.y > 0.0);

        let mut body = grounded_body(&config);
        body.integrate(jump, &config);
        assert!(!body.grounded);
        assert_relative_eq!(body.velocity.y, config.jump_velocity + config.gravity);
        assert!(body.bottom() < config.ground_y);
    }

    #[test]
    fn speed_boost_runs_out() {
        let config = BodyConfig::default();
        let mut body = grounded_body(&config);
        body.arm_power_up(2);
        let right = Intent {
            horizontal: 1.0,
            jump: false,
        };

        body.integrate(right, &config);
        assert_relative_eq!(body.velocity.x, config.boost_speed);
        body.integrate(right, &config);
        assert_relative_eq!(body.velocity.x, config.boost_speed);
        body.integrate(right, &config);
        assert_relative_eq!(body.velocity.x, config.walk_speed);
        assert_eq!(body.speed_boost, 0);
        // the trail timer belongs to the particle task
        assert_eq!(body.power_up, 2);
    }

    #[test]
    fn ground_holds_left_of_the_start() {
        let config = BodyConfig::default();
        let mut body = grounded_body(&config);
        let left = Intent {
            horizontal: -1.0,
            jump: false,
        };
        for _ in 0..200 {
            body.integrate(left, &config);
            assert!(body.grounded);
        }
        assert!(body.position.x < 0.0);
        assert_relative_eq!(body.bottom(), config.ground_y);
    }

    #[test]
    fn deep_body_is_pulled_back_onto_the_ground() {
        let config = BodyConfig::default();
        let mut body = Body::new(&config);
        body.position = Point::new(300.0, config.ground_y + 10.0);
        body.integrate(Intent::default(), &config);
        assert!(body.grounded);
        assert_relative_eq!(body.bottom(), config.ground_y);
    }
}
