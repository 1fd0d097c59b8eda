//! Gameplay constants, with an optional `tuning.json` override
//!
//! Every field has a default taken from the shipped game, so a partial
//! file only overrides what it names.

use crate::browser;
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
    pub walk_speed: f32,
    pub boost_speed: f32,
    /// negative because top left is origin
    pub jump_velocity: f32,
    /// y of the ground surface
    pub ground_y: f32,
    /// falling past this y resets the world
    pub fail_depth: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        BodyConfig {
            spawn_x: 100.0,
            spawn_y: 500.0,
            width: 40.0,
            height: 40.0,
            gravity: 0.6,
            walk_speed: 2.5,
            boost_speed: 4.2,
            jump_velocity: -11.0,
            ground_y: 560.0,
            fail_depth: 700.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub segment_length: f32,
    pub lookahead: f32,
    pub animals_per_segment: usize,
    /// margin kept free at both ends of a segment when placing animals
    pub animal_margin: f32,
    pub animal_y: f32,
    pub platform_chance: f64,
    /// margin kept free at both ends of a segment when placing platforms
    pub platform_margin: f32,
    pub platform_width: f32,
    pub platform_height: f32,
    pub platform_min_y: f32,
    pub platform_y_jitter: f32,
    pub step_width: f32,
    pub step_height: f32,
    /// step platform sits this far left of the platform it leads to
    pub step_offset_x: f32,
    /// step platform top, measured up from the ground surface
    pub step_rise: f32,
    pub shiny_offset_x: f32,
    pub animal_size: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            segment_length: 800.0,
            lookahead: 400.0,
            animals_per_segment: 2,
            animal_margin: 100.0,
            animal_y: 520.0,
            platform_chance: 0.7,
            platform_margin: 200.0,
            platform_width: 120.0,
            platform_height: 16.0,
            platform_min_y: 420.0,
            platform_y_jitter: 30.0,
            step_width: 60.0,
            step_height: 12.0,
            step_offset_x: 70.0,
            step_rise: 40.0,
            shiny_offset_x: 44.0,
            animal_size: 32.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// how far below a platform top the body's bottom may already be and still land
    pub landing_tolerance: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        CollisionConfig {
            landing_tolerance: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectibleConfig {
    pub interact_range: f32,
    /// ticks the speech bubble stays up before the animal is collected
    pub interact_ticks: u32,
    /// ticks of speed boost and particle trail granted by a shiny animal
    pub power_up_ticks: u32,
}

impl Default for CollectibleConfig {
    fn default() -> Self {
        CollectibleConfig {
            interact_range: 32.0,
            interact_ticks: 60,
            power_up_ticks: 180,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub lead_offset: f32,
    /// fraction of the remaining distance covered each tick
    pub smoothing: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            lead_offset: 200.0,
            smoothing: 0.85,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub per_tick: usize,
    pub fade: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub jitter: f32,
    pub max_speed_x: f32,
    pub min_rise: f32,
    pub rise_jitter: f32,
    pub palette: Vec<String>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        ParticleConfig {
            per_tick: 2,
            fade: 0.03,
            offset_x: 20.0,
            offset_y: 30.0,
            jitter: 10.0,
            max_speed_x: 1.0,
            min_rise: 1.0,
            rise_jitter: 1.5,
            palette: ["#fffde4", "#ffd166", "#ffb6b9", "#a3cef1"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub body: BodyConfig,
    pub terrain: TerrainConfig,
    pub collision: CollisionConfig,
    pub collectible: CollectibleConfig,
    pub camera: CameraConfig,
    pub particles: ParticleConfig,
    /// entities this far behind the camera are dropped, `None` keeps everything
    pub prune_distance: Option<f32>,
    /// keep the particle task running while the game is paused
    pub particles_while_paused: bool,
    pub particle_interval_ms: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            body: BodyConfig::default(),
            terrain: TerrainConfig::default(),
            collision: CollisionConfig::default(),
            collectible: CollectibleConfig::default(),
            camera: CameraConfig::default(),
            particles: ParticleConfig::default(),
            prune_distance: Some(2400.0),
            particles_while_paused: false,
            particle_interval_ms: 16,
        }
    }
}

impl Tuning {
    const PATH: &'static str = "tuning.json";

    /// Fetch `tuning.json`, falling back to defaults when it is missing or bad
    pub async fn load() -> Tuning {
        match Self::fetch().await {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", Self::PATH);
                tuning
            }
            Err(err) => {
                log::warn!("Using default tuning : {:#}", err);
                Tuning::default()
            }
        }
    }

    async fn fetch() -> Result<Tuning> {
        let tuning: Tuning = browser::fetch_json(Self::PATH)
            .await
            .with_context(|| format!("Failed to load tuning from : {}", Self::PATH))?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<()> {
        let terrain = &self.terrain;
        ensure!(
            self.collectible.interact_ticks >= 1,
            "interact_ticks must be at least 1 or animals never score"
        );
        ensure!(self.body.gravity >= 0.0, "gravity must not be negative");
        ensure!(terrain.lookahead > 0.0, "lookahead must be positive");
        ensure!(
            terrain.segment_length > 2.0 * terrain.animal_margin
                && terrain.segment_length > 2.0 * terrain.platform_margin,
            "segment_length {} leaves no room inside its spawn margins",
            terrain.segment_length
        );
        ensure!(
            (0.0..=1.0).contains(&terrain.platform_chance),
            "platform_chance must be within [0, 1]"
        );
        ensure!(self.particles.fade > 0.0, "particle fade must be positive");
        ensure!(
            !self.particles.palette.is_empty(),
            "particle palette must not be empty"
        );
        ensure!(
            (0.0..=1.0).contains(&self.camera.smoothing),
            "camera smoothing must be within [0, 1]"
        );
        ensure!(
            self.particle_interval_ms > 0,
            "particle_interval_ms must be positive"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn zero_interact_ticks_is_rejected() {
        let mut tuning = Tuning::default();
        tuning.collectible.interact_ticks = 0;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn cramped_segment_is_rejected() {
        let mut tuning = Tuning::default();
        tuning.terrain.segment_length = 300.0;
        let err = tuning.validate().unwrap_err();
        assert!(err.to_string().contains("segment_length"));
    }

    #[test]
    fn out_of_range_chance_is_rejected() {
        let mut tuning = Tuning::default();
        tuning.terrain.platform_chance = 1.5;
        assert!(tuning.validate().is_err());
    }
}
