//! Procedural road generator.
//!
//! Builds a single winding road as an ordered list of segments. The path
//! starts at the origin heading down +Z, keeps a straight entry stretch, and
//! then drifts through gentle random turns. Segment order is path order;
//! nearest-segment search and obstacle placement rely on it.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Segments at the start of the road that are always straight.
pub const STRAIGHT_ENTRY_SEGMENTS: usize = 3;

/// Smallest road we generate; guarantees the straight entry plus one turn.
pub const MIN_SEGMENT_COUNT: usize = STRAIGHT_ENTRY_SEGMENTS + 1;

/// Configuration for road generation.
#[derive(Clone, Debug)]
pub struct RoadGenConfig {
    /// Number of segments in the road.
    pub segment_count: usize,
    /// Length of each segment in world units.
    pub segment_length: f32,
    /// Curvature is drawn uniformly from `[-max_curvature, max_curvature]`.
    pub max_curvature: f32,
}

impl Default for RoadGenConfig {
    fn default() -> Self {
        Self {
            segment_count: 20,
            segment_length: 10.0,
            max_curvature: 0.015,
        }
    }
}

/// How the simulation seeds its random source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedPolicy {
    /// Same sequence of roads every session.
    Fixed(u64),
    /// Fresh roads every session.
    Entropy,
}

impl SeedPolicy {
    pub fn rng(self) -> StdRng {
        match self {
            SeedPolicy::Fixed(seed) => StdRng::seed_from_u64(seed),
            SeedPolicy::Entropy => StdRng::from_entropy(),
        }
    }
}

/// One piece of the generated road.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoadSegment {
    /// Ground-plane position, `x` is world X and `y` is world Z.
    pub position: Vec2,
    /// Heading in radians, 0 points down +Z.
    pub heading: f32,
    /// Heading change applied after this segment.
    pub curvature: f32,
}

impl RoadSegment {
    /// Unit vector pointing to the segment's local +X side.
    pub fn lateral(&self) -> Vec2 {
        Vec2::new(self.heading.cos(), -self.heading.sin())
    }
}

/// Generate an ordered road.
pub fn generate_road<R: Rng + ?Sized>(config: &RoadGenConfig, rng: &mut R) -> Vec<RoadSegment> {
    let count = config.segment_count.max(MIN_SEGMENT_COUNT);
    let max_curvature = if config.max_curvature.is_finite() {
        config.max_curvature.abs()
    } else {
        0.0
    };

    let mut segments = Vec::with_capacity(count);
    let mut position = Vec2::ZERO;
    let mut heading = 0.0_f32;

    for index in 0..count {
        let curvature = if index < STRAIGHT_ENTRY_SEGMENTS || max_curvature == 0.0 {
            0.0
        } else {
            rng.gen_range(-max_curvature..=max_curvature)
        };

        segments.push(RoadSegment {
            position,
            heading,
            curvature,
        });

        heading += curvature;
        position += Vec2::new(heading.sin(), heading.cos()) * config.segment_length;
    }

    segments
}

/// Distance the vehicle must cover before the run ends.
pub fn road_length(segments: &[RoadSegment], segment_length: f32) -> f32 {
    segments.len() as f32 * segment_length
}
