//! HUD, keyboard controls and debug visualization.

use bevy::prelude::*;

use crate::simulation::state::{RunStatus, SimulationState, StopReason};
use crate::simulation::{DriverAssist, SimulationSet, StartSimulation, StopSimulation};

pub mod debug_render;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(debug_render::DebugRenderPlugin)
            .init_resource::<DebugConfig>()
            .add_systems(Startup, setup_hud)
            .add_systems(Update, (run_controls, toggle_debug_views).before(SimulationSet))
            .add_systems(Update, (update_run_status, update_sensor_panel).after(SimulationSet));
    }
}

/// Configuration for debug visualization.
#[derive(Resource)]
pub struct DebugConfig {
    pub show_road: bool,
    pub show_obstacles: bool,
    pub show_sensor_rays: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_road: true,
            show_obstacles: true,
            show_sensor_rays: true,
        }
    }
}

/// Marker for the run status text.
#[derive(Component)]
struct RunStatusText;

/// Marker for the sensor readout text.
#[derive(Component)]
struct SensorText;

fn setup_hud(mut commands: Commands) {
    let panel_bg = Color::srgba(0.04, 0.05, 0.06, 0.85);
    let accent = Color::srgb(1.0, 0.6, 0.2);
    let text_color = Color::srgb(0.75, 0.95, 0.8);

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                left: Val::Px(10.0),
                padding: UiRect::axes(Val::Px(12.0), Val::Px(10.0)),
                row_gap: Val::Px(6.0),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(panel_bg),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("DRIVE SANDBOX"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(accent),
            ));

            parent.spawn((
                Text::new("IDLE"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(text_color),
                RunStatusText,
            ));

            parent.spawn((
                Text::new("Sensors: --"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(text_color),
                SensorText,
            ));
        });

    commands.spawn((
        Text::new("Enter: Start | Esc: Stop | L: Lane keeping | C: Cruise | 1-3: Debug layers"),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgb(0.65, 0.85, 0.7)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
    ));
}

fn run_controls(
    keys: Res<ButtonInput<KeyCode>>,
    mut assist: ResMut<DriverAssist>,
    mut starts: EventWriter<StartSimulation>,
    mut stops: EventWriter<StopSimulation>,
) {
    if keys.just_pressed(KeyCode::Enter) {
        starts.send(StartSimulation);
    }
    if keys.just_pressed(KeyCode::Escape) {
        stops.send(StopSimulation);
    }

    if keys.just_pressed(KeyCode::KeyL) {
        assist.lane_keeping = !assist.lane_keeping;
        info!("Lane keeping: {}", on_off(assist.lane_keeping));
    }
    if keys.just_pressed(KeyCode::KeyC) {
        assist.cruise_control = !assist.cruise_control;
        info!("Cruise control: {}", on_off(assist.cruise_control));
    }
}

fn toggle_debug_views(keys: Res<ButtonInput<KeyCode>>, mut config: ResMut<DebugConfig>) {
    if keys.just_pressed(KeyCode::Digit1) {
        config.show_road = !config.show_road;
    }
    if keys.just_pressed(KeyCode::Digit2) {
        config.show_obstacles = !config.show_obstacles;
    }
    if keys.just_pressed(KeyCode::Digit3) {
        config.show_sensor_rays = !config.show_sensor_rays;
    }
}

fn update_run_status(
    state: Res<SimulationState>,
    assist: Res<DriverAssist>,
    mut query: Query<&mut Text, With<RunStatusText>>,
) {
    let status = match (state.status, state.last_stop) {
        (RunStatus::Idle, _) => "IDLE",
        (RunStatus::Running, _) => "RUNNING",
        (RunStatus::Stopped, Some(StopReason::RoadEnd)) => "FINISHED",
        (RunStatus::Stopped, _) => "STOPPED",
    };

    for mut text in &mut query {
        **text = format!(
            "{} | Speed: {:.1} | Distance: {:.0} / {:.0}\nLane keeping: {} | Cruise: {}",
            status,
            state.display_speed(),
            state.distance,
            state.road_length,
            on_off(assist.lane_keeping),
            on_off(assist.cruise_control)
        );
    }
}

fn update_sensor_panel(state: Res<SimulationState>, mut query: Query<&mut Text, With<SensorText>>) {
    let reading = state.sensors;
    for mut text in &mut query {
        **text = format!(
            "Front: {} | Left: {} | Right: {}",
            format_clearance(reading.front),
            format_clearance(reading.left),
            format_clearance(reading.right)
        );
    }
}

fn format_clearance(distance: f32) -> String {
    if distance.is_finite() {
        format!("{distance:.1}")
    } else {
        "clear".to_string()
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "ON"
    } else {
        "OFF"
    }
}
