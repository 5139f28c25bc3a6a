//! Driving simulation: sensors, controllers, kinematics and the run loop.
//!
//! One tick runs per `Update` frame using the frame delta. The tick system is
//! the only writer of [`SimulationState`]; presentation systems run after
//! [`SimulationSet`] and only read it.

use bevy::prelude::*;

use crate::procgen::obstacles::ObstacleConfig;
use crate::procgen::road_generator::{RoadGenConfig, SeedPolicy};

pub mod cruise_control;
pub mod kinematics;
pub mod lane_keeping;
pub mod sensors;
pub mod state;

use sensors::Footprint;
use state::{SimulationState, StopReason, TickOutcome};

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationConfig>()
            .init_resource::<DriverAssist>()
            .init_resource::<SimulationState>()
            .add_event::<StartSimulation>()
            .add_event::<StopSimulation>()
            .add_systems(
                Update,
                (handle_run_commands, simulation_tick)
                    .chain()
                    .in_set(SimulationSet),
            );
    }
}

/// Systems that write simulation state. Readers should run after this set.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationSet;

/// Configuration for a run.
#[derive(Resource, Clone)]
pub struct SimulationConfig {
    pub road: RoadGenConfig,
    pub obstacles: ObstacleConfig,
    /// Cruise speed in internal units.
    pub base_speed: f32,
    /// Height of the vehicle body above the road.
    pub ride_height: f32,
    /// Seeds the random source once, when the state is created.
    pub seed: SeedPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            road: RoadGenConfig::default(),
            obstacles: ObstacleConfig::default(),
            base_speed: 0.3,
            ride_height: 0.5,
            seed: SeedPolicy::Fixed(42),
        }
    }
}

impl SimulationConfig {
    pub fn obstacle_footprint(&self) -> Footprint {
        Footprint {
            half_width: self.obstacles.half_width,
            half_length: self.obstacles.half_length,
        }
    }
}

/// Driver assistance toggles.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriverAssist {
    pub lane_keeping: bool,
    pub cruise_control: bool,
}

impl Default for DriverAssist {
    fn default() -> Self {
        Self {
            lane_keeping: true,
            cruise_control: true,
        }
    }
}

/// Regenerate the road and start a new run, even if one is in progress.
#[derive(Event)]
pub struct StartSimulation;

/// Halt the current run.
#[derive(Event)]
pub struct StopSimulation;

fn handle_run_commands(
    mut starts: EventReader<StartSimulation>,
    mut stops: EventReader<StopSimulation>,
    config: Res<SimulationConfig>,
    mut state: ResMut<SimulationState>,
) {
    // Several starts in one frame still only need one regeneration.
    if starts.read().count() > 0 {
        state.start(&config);
        info!(
            "Run {} started: {} segments, {} obstacles, road length {:.0}",
            state.epoch,
            state.road.len(),
            state.obstacles.len(),
            state.road_length
        );
    }

    if stops.read().count() > 0 && state.stop() {
        log_run_summary(&state, StopReason::Requested);
    }
}

fn simulation_tick(
    time: Res<Time>,
    config: Res<SimulationConfig>,
    assist: Res<DriverAssist>,
    mut state: ResMut<SimulationState>,
) {
    if !state.is_running() {
        return;
    }

    if state.tick(time.delta_secs(), *assist, &config) == TickOutcome::Finished {
        log_run_summary(&state, StopReason::RoadEnd);
    }
}

fn log_run_summary(state: &SimulationState, reason: StopReason) {
    let cause = match reason {
        StopReason::RoadEnd => "reached end of road",
        StopReason::Requested => "stopped by user",
    };
    info!(
        "Run {} {}: {:.1} / {:.0} after {} ticks",
        state.epoch, cause, state.distance, state.road_length, state.ticks
    );
}
