//! Vehicle pose and per-tick integration.

use bevy::prelude::*;

/// Fraction of the speed error closed each tick.
pub const SPEED_SMOOTHING: f32 = 0.1;

/// Converts internal speed units into displayed distance per second.
pub const DISTANCE_SCALE: f32 = 20.0;

/// Pose and speed state of the simulated vehicle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VehiclePose {
    /// World position; `y` is the ride height and never changes.
    pub position: Vec3,
    /// Heading in radians, 0 points down +Z.
    pub heading: f32,
    pub speed: f32,
    pub target_speed: f32,
}

impl VehiclePose {
    /// Vehicle at the road origin, at rest.
    pub fn at_start(ride_height: f32) -> Self {
        Self {
            position: Vec3::new(0.0, ride_height, 0.0),
            ..default()
        }
    }

    /// Ground-plane projection, `x` is world X and `y` is world Z.
    pub fn ground_position(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.heading.sin(), 0.0, self.heading.cos())
    }

    /// First-order lag toward the target speed.
    pub fn smooth_speed(&mut self) {
        self.speed += (self.target_speed - self.speed) * SPEED_SMOOTHING;
    }

    /// Move along the current heading and return the distance covered.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let step = self.speed * dt * DISTANCE_SCALE;
        self.position += self.forward() * step;
        step
    }

    /// Apply a steering adjustment; the effect scales with speed.
    pub fn steer(&mut self, adjustment: f32) {
        self.heading += adjustment * self.speed;
    }

    /// Speed in displayed distance units per second.
    pub fn display_speed(&self) -> f32 {
        self.speed * DISTANCE_SCALE
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.heading.is_finite()
            && self.speed.is_finite()
            && self.target_speed.is_finite()
    }
}
