//! Lane keeping: proportional pull toward the centerline of the nearest road
//! segment, plus a feed-forward term from that segment's curvature.

use bevy::prelude::*;

use crate::procgen::road_generator::RoadSegment;
use crate::simulation::kinematics::VehiclePose;

/// Proportional gain on lateral offset.
pub const LATERAL_GAIN: f32 = 0.5;

/// Feed-forward gain on segment curvature.
pub const CURVATURE_GAIN: f32 = 10.0;

/// Closest segment by ground-plane distance. Ties go to the lowest index.
pub fn nearest_segment(position: Vec2, segments: &[RoadSegment]) -> Option<(usize, &RoadSegment)> {
    let mut best: Option<(usize, &RoadSegment, f32)> = None;
    for (index, segment) in segments.iter().enumerate() {
        let distance = position.distance(segment.position);
        match best {
            Some((_, _, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, segment, distance)),
        }
    }
    best.map(|(index, segment, _)| (index, segment))
}

/// Signed offset from the segment centerline, positive toward the segment's
/// local +X side.
pub fn lateral_offset(position: Vec2, segment: &RoadSegment) -> f32 {
    let offset = position - segment.position;
    let (sin, cos) = segment.heading.sin_cos();
    offset.x * cos - offset.y * sin
}

/// Steering adjustment for the current pose, before speed scaling.
pub fn correct(pose: &VehiclePose, segments: &[RoadSegment]) -> Option<f32> {
    let position = pose.ground_position();
    let (_, segment) = nearest_segment(position, segments)?;
    let correction = -lateral_offset(position, segment) * LATERAL_GAIN;
    let feedforward = segment.curvature * CURVATURE_GAIN;
    Some(correction + feedforward)
}
