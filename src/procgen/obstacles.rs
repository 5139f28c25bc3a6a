//! Obstacle placement along the generated road.
//!
//! Each segment past the entry window gets an independent coin flip; winners
//! receive one obstacle shifted into the left or right lane. Overlapping
//! obstacles are allowed.

use bevy::prelude::*;
use rand::Rng;

use super::road_generator::RoadSegment;

/// Segments at the start of the road that never receive an obstacle.
pub const OBSTACLE_EXCLUSION_SEGMENTS: usize = 4;

/// Settings for obstacle placement.
#[derive(Clone, Debug)]
pub struct ObstacleConfig {
    /// Chance that a segment receives an obstacle.
    pub probability: f64,
    /// Lateral distance from the centerline to the obstacle center.
    pub lane_offset: f32,
    /// Half extent across the road (obstacle local X).
    pub half_width: f32,
    /// Half extent along the road (obstacle local Z).
    pub half_length: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            probability: 0.3,
            lane_offset: 2.0,
            half_width: 1.0,
            half_length: 2.0,
        }
    }
}

/// A static rectangular obstacle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    /// Ground-plane center, `x` is world X and `y` is world Z.
    pub position: Vec2,
    /// Heading in radians, matches the segment it was placed on.
    pub heading: f32,
    /// Index of the segment the obstacle is anchored to.
    pub segment: usize,
}

impl Obstacle {
    /// The four footprint corners in world space, counter-clockwise.
    pub fn corners(&self, half_width: f32, half_length: f32) -> [Vec2; 4] {
        let forward = Vec2::new(self.heading.sin(), self.heading.cos()) * half_length;
        let side = Vec2::new(self.heading.cos(), -self.heading.sin()) * half_width;
        [
            self.position + forward + side,
            self.position + forward - side,
            self.position - forward - side,
            self.position - forward + side,
        ]
    }
}

/// Place obstacles next to the road.
pub fn place_obstacles<R: Rng + ?Sized>(
    segments: &[RoadSegment],
    config: &ObstacleConfig,
    rng: &mut R,
) -> Vec<Obstacle> {
    let probability = if config.probability.is_nan() {
        0.0
    } else {
        config.probability.clamp(0.0, 1.0)
    };

    segments
        .iter()
        .enumerate()
        .skip(OBSTACLE_EXCLUSION_SEGMENTS)
        .filter_map(|(index, segment)| {
            if !rng.gen_bool(probability) {
                return None;
            }
            let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            Some(Obstacle {
                position: segment.position + segment.lateral() * (side * config.lane_offset),
                heading: segment.heading,
                segment: index,
            })
        })
        .collect()
}
