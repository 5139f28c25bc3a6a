//! Proximity sensor model.
//!
//! Three rays leave the vehicle in the ground plane (front, left, right) and
//! report the distance to the nearest obstacle footprint they hit. This is a
//! geometric query, nothing more.

use bevy::prelude::*;

use crate::procgen::obstacles::Obstacle;
use crate::simulation::kinematics::VehiclePose;

/// Clearances around the vehicle. `f32::INFINITY` means nothing was hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorReading {
    pub front: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for SensorReading {
    fn default() -> Self {
        Self::CLEAR
    }
}

impl SensorReading {
    pub const CLEAR: Self = Self {
        front: f32::INFINITY,
        left: f32::INFINITY,
        right: f32::INFINITY,
    };
}

/// Rectangular obstacle extents used for ray tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    pub half_width: f32,
    pub half_length: f32,
}

/// Which way a sensor points, relative to the vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorDirection {
    Front,
    Left,
    Right,
}

impl SensorDirection {
    pub const ALL: [SensorDirection; 3] = [Self::Front, Self::Left, Self::Right];

    /// World-space unit direction for a vehicle with the given heading.
    pub fn world_direction(self, heading: f32) -> Vec2 {
        let (sin, cos) = heading.sin_cos();
        match self {
            Self::Front => Vec2::new(sin, cos),
            Self::Left => Vec2::new(cos, -sin),
            Self::Right => Vec2::new(-cos, sin),
        }
    }
}

/// Take a full reading for the current pose.
pub fn sense(pose: &VehiclePose, obstacles: &[Obstacle], footprint: Footprint) -> SensorReading {
    let origin = pose.ground_position();
    let cast = |direction: SensorDirection| {
        cast_ray(
            origin,
            direction.world_direction(pose.heading),
            obstacles,
            footprint,
        )
    };

    SensorReading {
        front: cast(SensorDirection::Front),
        left: cast(SensorDirection::Left),
        right: cast(SensorDirection::Right),
    }
}

/// Distance along `direction` to the closest obstacle, or infinity.
pub fn cast_ray(origin: Vec2, direction: Vec2, obstacles: &[Obstacle], footprint: Footprint) -> f32 {
    obstacles
        .iter()
        .filter_map(|obstacle| ray_footprint_hit(origin, direction, obstacle, footprint))
        .fold(f32::INFINITY, f32::min)
}

/// Slab test against the obstacle rectangle in its own frame.
fn ray_footprint_hit(
    origin: Vec2,
    direction: Vec2,
    obstacle: &Obstacle,
    footprint: Footprint,
) -> Option<f32> {
    let (sin, cos) = obstacle.heading.sin_cos();
    // Inverse rotation into obstacle space: local x is lateral, local y is along.
    let to_local = |v: Vec2| Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos);
    let local_origin = to_local(origin - obstacle.position);
    let local_direction = to_local(direction);
    let half = Vec2::new(footprint.half_width, footprint.half_length);

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..2 {
        let o = local_origin[axis];
        let d = local_direction[axis];
        let h = half[axis];

        if d.abs() < f32::EPSILON {
            if o < -h || o > h {
                return None;
            }
            continue;
        }

        let t1 = (-h - o) / d;
        let t2 = (h - o) / d;
        t_near = t_near.max(t1.min(t2));
        t_far = t_far.min(t1.max(t2));
    }

    if t_near > t_far || t_far < 0.0 {
        return None;
    }
    Some(t_near.max(0.0))
}
