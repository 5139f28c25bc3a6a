//! Chase camera that trails the simulated vehicle, plus scene lighting.

use bevy::prelude::*;

use crate::simulation::state::SimulationState;
use crate::simulation::SimulationSet;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ChaseCameraConfig>()
            .add_systems(Startup, setup_scene)
            .add_systems(Update, follow_vehicle.after(SimulationSet));
    }
}

/// Framing for the chase camera.
#[derive(Resource)]
pub struct ChaseCameraConfig {
    /// Distance behind the vehicle along its heading.
    pub distance: f32,
    /// Height above the vehicle.
    pub height: f32,
    /// How quickly the camera catches up (per second).
    pub follow_rate: f32,
}

impl Default for ChaseCameraConfig {
    fn default() -> Self {
        Self {
            distance: 14.0,
            height: 7.0,
            follow_rate: 4.0,
        }
    }
}

/// Marker for the chase camera entity.
#[derive(Component)]
pub struct ChaseCamera;

fn setup_scene(
    mut commands: Commands,
    config: Res<ChaseCameraConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, config.height, -config.distance).looking_at(Vec3::ZERO, Vec3::Y),
        ChaseCamera,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(40.0, 80.0, -20.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Ground
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(600.0, 600.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.22, 0.3, 0.2),
            perceptual_roughness: 0.95,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.01, 0.0),
    ));
}

fn follow_vehicle(
    time: Res<Time>,
    state: Res<SimulationState>,
    config: Res<ChaseCameraConfig>,
    mut cameras: Query<&mut Transform, With<ChaseCamera>>,
) {
    let Some(pose) = state.vehicle else {
        return;
    };

    let target = pose.position - pose.forward() * config.distance + Vec3::Y * config.height;
    let blend = 1.0 - (-config.follow_rate * time.delta_secs()).exp();

    for mut transform in cameras.iter_mut() {
        // Snap on a fresh run instead of sweeping across the map.
        if state.ticks <= 1 {
            transform.translation = target;
        } else {
            transform.translation = transform.translation.lerp(target, blend);
        }
        transform.look_at(pose.position + pose.forward() * 4.0, Vec3::Y);
    }
}
