//! Gizmo rendering for the road, obstacles, vehicle and sensor rays.

use bevy::prelude::*;

use crate::simulation::sensors::SensorDirection;
use crate::simulation::state::SimulationState;
use crate::simulation::{SimulationConfig, SimulationSet};
use crate::ui::DebugConfig;

/// Rays that hit nothing are drawn out to this length.
const MAX_RAY_DRAW: f32 = 25.0;

/// Half width of the drawn road surface.
const ROAD_HALF_WIDTH: f32 = 3.0;

const LINE_HEIGHT: f32 = 0.05;

pub struct DebugRenderPlugin;

impl Plugin for DebugRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (render_road, render_obstacles, render_vehicle).after(SimulationSet),
        );
    }
}

fn ground(point: Vec2, height: f32) -> Vec3 {
    Vec3::new(point.x, height, point.y)
}

/// Road centerline and edges.
fn render_road(state: Res<SimulationState>, config: Res<DebugConfig>, mut gizmos: Gizmos) {
    if !config.show_road || state.road.is_empty() {
        return;
    }

    let centerline = Color::srgb(1.0, 0.85, 0.2);
    let edge = Color::srgb(0.85, 0.85, 0.85);

    gizmos.linestrip(
        state.road.iter().map(|s| ground(s.position, LINE_HEIGHT)),
        centerline,
    );
    for side in [1.0, -1.0] {
        gizmos.linestrip(
            state
                .road
                .iter()
                .map(|s| ground(s.position + s.lateral() * (side * ROAD_HALF_WIDTH), LINE_HEIGHT)),
            edge,
        );
    }
}

/// Obstacle footprints as closed outlines.
fn render_obstacles(
    state: Res<SimulationState>,
    config: Res<DebugConfig>,
    sim_config: Res<SimulationConfig>,
    mut gizmos: Gizmos,
) {
    if !config.show_obstacles {
        return;
    }

    let color = Color::srgb(0.95, 0.25, 0.2);
    let footprint = sim_config.obstacle_footprint();
    for obstacle in &state.obstacles {
        let corners = obstacle.corners(footprint.half_width, footprint.half_length);
        gizmos.linestrip(
            corners
                .iter()
                .chain(corners.first())
                .map(|c| ground(*c, 0.5)),
            color,
        );
    }
}

/// Vehicle outline, heading arrow and sensor rays.
fn render_vehicle(state: Res<SimulationState>, config: Res<DebugConfig>, mut gizmos: Gizmos) {
    let Some(pose) = state.vehicle else {
        return;
    };

    let forward = pose.forward();
    let side = Vec3::new(forward.z, 0.0, -forward.x);
    let center = pose.position;
    let body = [
        center + forward * 2.0 + side * 0.9,
        center + forward * 2.0 - side * 0.9,
        center - forward * 2.0 - side * 0.9,
        center - forward * 2.0 + side * 0.9,
        center + forward * 2.0 + side * 0.9,
    ];
    gizmos.linestrip(body, Color::srgb(0.2, 0.6, 1.0));
    gizmos.arrow(center, center + forward * 3.5, Color::srgb(0.3, 0.9, 1.0));

    if !config.show_sensor_rays {
        return;
    }

    let readings = [state.sensors.front, state.sensors.left, state.sensors.right];
    for (direction, distance) in SensorDirection::ALL.into_iter().zip(readings) {
        let dir = direction.world_direction(pose.heading);
        let (length, color) = if distance.is_finite() {
            (distance, Color::srgb(1.0, 0.3, 0.3))
        } else {
            (MAX_RAY_DRAW, Color::srgba(0.3, 1.0, 0.4, 0.5))
        };
        gizmos.line(center, center + Vec3::new(dir.x, 0.0, dir.y) * length, color);
    }
}
