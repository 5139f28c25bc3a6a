//! Drive Sandbox - lane keeping and adaptive cruise control on a procedural road
//!
//! A Bevy app that generates a winding road with random obstacles and drives
//! a vehicle along it using two simple feedback controllers.

use bevy::prelude::*;

mod camera;
mod procgen;
mod simulation;
mod ui;

fn main() {
    // Force Vulkan backend on Windows (DX12 causes crashes on some systems)
    #[cfg(target_os = "windows")]
    std::env::set_var("WGPU_BACKEND", "vulkan");
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Drive Sandbox".into(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.55, 0.7, 0.85)))
        // Simulation core
        .add_plugins(simulation::SimulationPlugin)
        // Presentation
        .add_plugins(camera::CameraPlugin)
        .add_plugins(ui::UiPlugin)
        .run();
}
