use crate::tuning::CameraConfig;

/// Horizontal scroll offset, eased toward a point ahead of the body
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    x: f32,
}

impl Camera {
    pub fn new() -> Self {
        Camera::default()
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn target(body_x: f32, config: &CameraConfig) -> f32 {
        (body_x - config.lead_offset).max(0.0)
    }

    /// Cover `smoothing` of the remaining distance; the lag grows with
    /// the distance so the camera catches up harder when far behind
    pub fn update(&mut self, body_x: f32, config: &CameraConfig) -> f32 {
        let target = Self::target(body_x, config);
        self.x += (target - self.x) * config.smoothing;
        self.x = self.x.max(0.0);
        self.x
    }
}
