//! The single owned simulation state and its run lifecycle.
//!
//! `SimulationState` holds everything produced by one generation epoch (road,
//! obstacles, vehicle, sensor reading) and is only written by [`SimulationState::start`],
//! [`SimulationState::stop`] and [`SimulationState::tick`]. Starting always
//! regenerates; there is no resume.

use bevy::prelude::*;
use rand::rngs::StdRng;

use super::cruise_control::regulate;
use super::kinematics::VehiclePose;
use super::lane_keeping::correct;
use super::sensors::{sense, SensorReading};
use super::{DriverAssist, SimulationConfig};
use crate::procgen::obstacles::{place_obstacles, Obstacle};
use crate::procgen::road_generator::{generate_road, road_length, RoadSegment, SeedPolicy};

/// Lifecycle of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunStatus {
    /// Nothing started yet.
    #[default]
    Idle,
    Running,
    Stopped,
}

/// Why the last run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Travelled further than the road is long.
    RoadEnd,
    /// Stopped by the user.
    Requested,
}

/// Result of a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do: not running, no road, or unusable input.
    Skipped,
    Advanced,
    /// This tick carried the vehicle past the end of the road.
    Finished,
}

/// Everything belonging to the current run, owned by the tick system.
#[derive(Resource)]
pub struct SimulationState {
    pub status: RunStatus,
    pub road: Vec<RoadSegment>,
    pub obstacles: Vec<Obstacle>,
    pub vehicle: Option<VehiclePose>,
    pub sensors: SensorReading,
    /// Distance covered this run, in display units.
    pub distance: f32,
    /// Distance at which the run ends.
    pub road_length: f32,
    /// Bumped on every regeneration.
    pub epoch: u64,
    /// Ticks integrated this run.
    pub ticks: u64,
    pub last_stop: Option<StopReason>,
    rng: StdRng,
}

impl FromWorld for SimulationState {
    fn from_world(world: &mut World) -> Self {
        let seed = world
            .get_resource::<SimulationConfig>()
            .map(|config| config.seed)
            .unwrap_or(SeedPolicy::Entropy);
        Self::new(seed)
    }
}

impl SimulationState {
    pub fn new(seed: SeedPolicy) -> Self {
        Self {
            status: RunStatus::Idle,
            road: Vec::new(),
            obstacles: Vec::new(),
            vehicle: None,
            sensors: SensorReading::CLEAR,
            distance: 0.0,
            road_length: 0.0,
            epoch: 0,
            ticks: 0,
            last_stop: None,
            rng: seed.rng(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// Regenerate the road and obstacles, reset the vehicle, and run.
    pub fn start(&mut self, config: &SimulationConfig) {
        let road = generate_road(&config.road, &mut self.rng);
        let obstacles = place_obstacles(&road, &config.obstacles, &mut self.rng);

        let mut vehicle = VehiclePose::at_start(config.ride_height);
        vehicle.target_speed = config.base_speed;

        let length = road_length(&road, config.road.segment_length);
        self.road_length = if length.is_finite() { length.max(0.0) } else { 0.0 };
        self.sensors = sense(&vehicle, &obstacles, config.obstacle_footprint());
        self.road = road;
        self.obstacles = obstacles;
        self.vehicle = Some(vehicle);
        self.distance = 0.0;
        self.ticks = 0;
        self.epoch += 1;
        self.last_stop = None;
        self.status = RunStatus::Running;
    }

    /// Halt the current run. Returns false if nothing was running.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.status = RunStatus::Stopped;
        self.last_stop = Some(StopReason::Requested);
        true
    }

    /// Advance the run by `dt` seconds of real time.
    pub fn tick(&mut self, dt: f32, assist: DriverAssist, config: &SimulationConfig) -> TickOutcome {
        if !self.is_running() || !dt.is_finite() || dt < 0.0 || self.road.is_empty() {
            return TickOutcome::Skipped;
        }
        let Some(mut pose) = self.vehicle else {
            return TickOutcome::Skipped;
        };

        pose.target_speed = if assist.cruise_control {
            regulate(self.sensors.front, config.base_speed)
        } else {
            config.base_speed
        };
        pose.smooth_speed();
        let step = pose.advance(dt);

        if assist.lane_keeping {
            if let Some(adjustment) = correct(&pose, &self.road) {
                pose.steer(adjustment);
            }
        }

        if !pose.is_finite() || !step.is_finite() {
            debug!("Discarding degenerate tick (dt = {dt})");
            return TickOutcome::Skipped;
        }

        self.sensors = sense(&pose, &self.obstacles, config.obstacle_footprint());
        self.vehicle = Some(pose);
        self.distance += step;
        self.ticks += 1;

        if self.distance > self.road_length {
            self.status = RunStatus::Stopped;
            self.last_stop = Some(StopReason::RoadEnd);
            return TickOutcome::Finished;
        }
        TickOutcome::Advanced
    }

    /// Current speed in display units per second, zero before the first run.
    pub fn display_speed(&self) -> f32 {
        self.vehicle.map_or(0.0, |pose| pose.display_speed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procgen::obstacles::ObstacleConfig;
    use crate::procgen::road_generator::RoadGenConfig;

    fn config() -> SimulationConfig {
        SimulationConfig {
            seed: SeedPolicy::Fixed(9),
            ..default()
        }
    }

    fn no_obstacles() -> SimulationConfig {
        SimulationConfig {
            obstacles: ObstacleConfig {
                probability: 0.0,
                ..default()
            },
            ..config()
        }
    }

    fn running(config: &SimulationConfig) -> SimulationState {
        let mut state = SimulationState::new(config.seed);
        state.start(config);
        state
    }

    #[test]
    fn ticking_before_start_is_harmless() {
        let config = config();
        let mut state = SimulationState::new(config.seed);
        for _ in 0..10 {
            assert_eq!(
                state.tick(0.016, DriverAssist::default(), &config),
                TickOutcome::Skipped
            );
        }
        assert_eq!(state.status, RunStatus::Idle);
        assert!(state.vehicle.is_none());
        assert_eq!(state.distance, 0.0);
        assert_eq!(state.display_speed(), 0.0);
    }

    #[test]
    fn start_builds_a_fresh_epoch() {
        let config = config();
        let state = running(&config);
        assert_eq!(state.status, RunStatus::Running);
        assert_eq!(state.epoch, 1);
        assert_eq!(state.road.len(), config.road.segment_count);
        assert_eq!(state.road_length, 200.0);
        let vehicle = state.vehicle.unwrap();
        assert_eq!(vehicle.speed, 0.0);
        assert_eq!(vehicle.target_speed, config.base_speed);
        assert_eq!(vehicle.position.y, config.ride_height);
    }

    #[test]
    fn restart_while_running_regenerates_and_resets() {
        let config = config();
        let mut state = running(&config);
        for _ in 0..30 {
            state.tick(0.05, DriverAssist::default(), &config);
        }
        let first_road = state.road.clone();
        assert!(state.distance > 0.0);
        assert!(state.vehicle.unwrap().speed > 0.0);

        // Leave an obstacle right in front of the vehicle from this epoch.
        let pose = state.vehicle.unwrap();
        let ahead = Vec2::new(pose.heading.sin(), pose.heading.cos());
        let planted = Obstacle {
            position: pose.ground_position() + ahead * 6.0,
            heading: pose.heading,
            segment: 0,
        };
        state.obstacles.push(planted);
        state.sensors = sense(&pose, &state.obstacles, config.obstacle_footprint());
        assert!(state.sensors.front.is_finite());

        let mut replay = state.rng.clone();
        state.start(&config);
        assert_eq!(state.status, RunStatus::Running);
        assert_eq!(state.epoch, 2);
        assert_eq!(state.distance, 0.0);
        assert_eq!(state.ticks, 0);
        assert_ne!(state.road, first_road);

        let expected_road = generate_road(&config.road, &mut replay);
        let expected_obstacles = place_obstacles(&expected_road, &config.obstacles, &mut replay);
        assert_eq!(state.road, expected_road);
        assert_eq!(state.obstacles, expected_obstacles);
        assert!(!state.obstacles.contains(&planted));

        let vehicle = state.vehicle.unwrap();
        assert_eq!(vehicle.speed, 0.0);
        assert_eq!(vehicle.heading, 0.0);
        assert_eq!(vehicle.ground_position(), Vec2::ZERO);
        assert_eq!(
            state.sensors,
            sense(&vehicle, &state.obstacles, config.obstacle_footprint())
        );
    }

    #[test]
    fn tick_follows_control_order() {
        let config = no_obstacles();
        let mut state = running(&config);
        let outcome = state.tick(0.05, DriverAssist::default(), &config);
        assert_eq!(outcome, TickOutcome::Advanced);

        let pose = state.vehicle.unwrap();
        // One smoothing step from rest toward 0.3.
        assert!((pose.speed - 0.03).abs() < 1e-6);
        let step = 0.03 * 0.05 * 20.0;
        assert!((state.distance - step).abs() < 1e-6);
        assert!((pose.position.z - step).abs() < 1e-6);
        // Straight entry, on the centerline: no steering.
        assert_eq!(pose.heading, 0.0);
        assert_eq!(state.sensors, SensorReading::CLEAR);
    }

    #[test]
    fn converged_tick_moves_expected_distance() {
        let config = no_obstacles();
        let mut state = running(&config);
        if let Some(pose) = state.vehicle.as_mut() {
            pose.speed = 0.3;
        }
        state.tick(0.05, DriverAssist::default(), &config);
        let pose = state.vehicle.unwrap();
        assert!((state.distance - 0.3).abs() < 1e-5);
        assert!((pose.position.z - 0.3).abs() < 1e-5);
    }

    #[test]
    fn stops_only_once_road_length_is_exceeded() {
        let config = no_obstacles();
        let mut state = running(&config);
        let assist = DriverAssist::default();

        let mut finished_at = None;
        for _ in 0..100_000 {
            let before = state.distance;
            match state.tick(0.05, assist, &config) {
                TickOutcome::Advanced => assert!(state.distance <= state.road_length),
                TickOutcome::Finished => {
                    assert!(before <= state.road_length);
                    assert!(state.distance > state.road_length);
                    finished_at = Some(state.ticks);
                    break;
                }
                TickOutcome::Skipped => panic!("skipped while running"),
            }
        }
        assert!(finished_at.is_some());
        assert_eq!(state.status, RunStatus::Stopped);
        assert_eq!(state.last_stop, Some(StopReason::RoadEnd));

        let frozen = state.distance;
        assert_eq!(state.tick(0.05, assist, &config), TickOutcome::Skipped);
        assert_eq!(state.distance, frozen);
    }

    #[test]
    fn explicit_stop_halts_and_start_regenerates() {
        let config = config();
        let mut state = running(&config);
        state.tick(0.05, DriverAssist::default(), &config);
        assert!(state.stop());
        assert!(!state.stop());
        assert_eq!(state.last_stop, Some(StopReason::Requested));

        let position = state.vehicle.unwrap().position;
        state.tick(0.05, DriverAssist::default(), &config);
        assert_eq!(state.vehicle.unwrap().position, position);

        state.start(&config);
        assert!(state.is_running());
        assert_eq!(state.distance, 0.0);
    }

    #[test]
    fn cruise_control_slows_for_obstacle_ahead() {
        let config = no_obstacles();
        let mut state = running(&config);
        state.obstacles = vec![Obstacle {
            position: Vec2::new(0.0, 7.0),
            heading: 0.0,
            segment: 1,
        }];
        state.sensors = sense(
            &state.vehicle.unwrap(),
            &state.obstacles,
            config.obstacle_footprint(),
        );
        assert!((state.sensors.front - 5.0).abs() < 1e-5);

        state.tick(0.0, DriverAssist::default(), &config);
        assert!((state.vehicle.unwrap().target_speed - 0.15).abs() < 1e-6);

        let without_cruise = DriverAssist {
            cruise_control: false,
            ..default()
        };
        state.tick(0.0, without_cruise, &config);
        assert_eq!(state.vehicle.unwrap().target_speed, config.base_speed);
    }

    #[test]
    fn lane_keeping_toggle_controls_steering() {
        let config = no_obstacles();
        let off = DriverAssist {
            lane_keeping: false,
            ..default()
        };

        let mut state = running(&config);
        if let Some(pose) = state.vehicle.as_mut() {
            pose.position.x = 1.0;
            pose.speed = 0.3;
        }
        state.tick(0.05, off, &config);
        assert_eq!(state.vehicle.unwrap().heading, 0.0);

        state.tick(0.05, DriverAssist::default(), &config);
        assert!(state.vehicle.unwrap().heading < 0.0);
    }

    #[test]
    fn bad_frame_time_is_ignored() {
        let config = config();
        let mut state = running(&config);
        for dt in [f32::NAN, f32::INFINITY, -0.1] {
            assert_eq!(
                state.tick(dt, DriverAssist::default(), &config),
                TickOutcome::Skipped
            );
        }
        assert_eq!(state.ticks, 0);
        assert!(state.vehicle.unwrap().is_finite());
    }

    #[test]
    fn empty_road_is_a_no_op() {
        let config = config();
        let mut state = running(&config);
        state.road.clear();
        assert_eq!(
            state.tick(0.05, DriverAssist::default(), &config),
            TickOutcome::Skipped
        );
    }

    #[test]
    fn lane_keeping_stays_near_the_road() {
        let config = SimulationConfig {
            road: RoadGenConfig::default(),
            ..no_obstacles()
        };
        let mut state = running(&config);
        while state.tick(1.0 / 60.0, DriverAssist::default(), &config) == TickOutcome::Advanced {}
        let pose = state.vehicle.unwrap();
        let (_, nearest) =
            crate::simulation::lane_keeping::nearest_segment(pose.ground_position(), &state.road)
                .unwrap();
        assert!(pose.ground_position().distance(nearest.position) < config.road.segment_length * 2.0);
    }
}
