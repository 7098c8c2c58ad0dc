use nalgebra as na;

use crate::bbox::BBox;

/// Velocity correction weight toward the newest observation.
const VEL_SMOOTHING: f32 = 0.6;
/// Box size correction weight toward the newest observation.
const SIZE_SMOOTHING: f32 = 0.5;
/// Uncertainty growth per predicted step without an observation, in pixels.
const UNCERTAINTY_STEP: f32 = 4.0;

/// Constant-velocity motion state of one track: estimated box center,
/// per-frame velocity, smoothed box size and a scalar position uncertainty
/// that grows while the track coasts unobserved.
#[derive(Debug, Clone)]
pub(crate) struct Motion {
    pos: na::Point2<f32>,
    vel: na::Vector2<f32>,
    size: na::Vector2<f32>,
    uncertainty: f32,
    last_observed: na::Point2<f32>,
}

impl Motion {
    pub fn new(bbox: &BBox) -> Self {
        let pos = bbox.center();

        Self {
            pos,
            vel: na::Vector2::zeros(),
            size: na::Vector2::new(bbox.width(), bbox.height()),
            uncertainty: 0.0,
            last_observed: pos,
        }
    }

    /// Advances the state one time step. Called exactly once per frame for
    /// every live track, before matching.
    pub fn predict(&mut self) {
        self.pos += self.vel;
        self.uncertainty += UNCERTAINTY_STEP;
    }

    /// Box expected at the current time step, used for IoU scoring.
    pub fn predicted_bbox(&self) -> BBox {
        BBox::from_center(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Corrects the state with an observed box. `steps` is the number of
    /// predicted frames since the previous observation (1 when matched on
    /// consecutive frames), so coasting gaps do not inflate the velocity.
    pub fn correct(&mut self, bbox: &BBox, steps: u32) {
        let center = bbox.center();
        let steps = steps.max(1) as f32;
        let observed_vel = (center - self.last_observed) / steps;

        self.vel = self.vel * (1.0 - VEL_SMOOTHING) + observed_vel * VEL_SMOOTHING;
        self.size = self.size * (1.0 - SIZE_SMOOTHING)
            + na::Vector2::new(bbox.width(), bbox.height()) * SIZE_SMOOTHING;
        self.pos = center;
        self.last_observed = center;
        self.uncertainty = 0.0;
    }

}
