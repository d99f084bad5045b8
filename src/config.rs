//! Configuration constants and tunables for the flying game.

use crate::error::ConfigError;
use macroquad::math::Vec3;

// World layout
pub const GRID_ROWS: u32 = 20;
pub const GRID_COLS: u32 = 20;
pub const CELL_SPACING: f32 = 10.0; // World units between cell centres
pub const SAFE_ZONE_HALF_WIDTH: f32 = 10.0; // No trees or coins inside this square around spawn
pub const TREE_PROBABILITY: f64 = 0.4;
pub const COIN_PROBABILITY: f64 = 0.2; // Only rolled when the cell did not get a tree
pub const GOAL_OFFSET_MIN: f32 = 30.0;
pub const GOAL_OFFSET_RANGE: f32 = 60.0; // Goal lands on whole units in [30, 89] on both axes

// Playfield
pub const PLAYFIELD_SIZE: f32 = 200.0;
pub const WALL_HEIGHT: f32 = 10.0;
pub const WALL_THICKNESS: f32 = 2.0;

// Flight model. Rates are per second; at 60 ticks/s they equal
// 0.2 units/tick, 0.002 units/tick², 0.03 rad/tick and 0.1 units/tick.
pub const TICK_RATE: u32 = 60;
pub const MAX_SPEED: f32 = 12.0;
pub const ACCELERATION: f32 = 7.2;
pub const YAW_RATE: f32 = 1.8;
pub const CLIMB_RATE: f32 = 6.0;
pub const MIN_ALTITUDE: f32 = 1.0;
pub const MAX_ALTITUDE: f32 = 8.0;
pub const SPAWN_POSITION: Vec3 = Vec3::new(0.0, 2.0, 0.0);

// Radar
pub const RADAR_SIZE: f32 = 200.0; // Square canvas, pixels
pub const RADAR_SCALE: f32 = 0.6; // Pixels per world unit
pub const RADAR_MARGIN: f32 = 10.0;

// Rendering configuration
pub const WINDOW_WIDTH: i32 = 1024;
pub const WINDOW_HEIGHT: i32 = 768;
pub const CAMERA_DISTANCE: f32 = 10.0;
pub const CAMERA_HEIGHT: f32 = 5.0;
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const NOTICE_DURATION: f32 = 2.5; // Seconds an event banner stays up
pub const MAX_FRAME_TIME: f32 = 0.25; // Longest frame fed into the tick accumulator

/// Grid and spawn probabilities used for every level.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldLayout {
    pub rows: u32,
    pub cols: u32,
    pub spacing: f32,
    pub safe_radius: f32,
    pub tree_probability: f64,
    pub coin_probability: f64,
}

impl Default for WorldLayout {
    fn default() -> Self {
        WorldLayout {
            rows: GRID_ROWS,
            cols: GRID_COLS,
            spacing: CELL_SPACING,
            safe_radius: SAFE_ZONE_HALF_WIDTH,
            tree_probability: TREE_PROBABILITY,
            coin_probability: COIN_PROBABILITY,
        }
    }
}

impl WorldLayout {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if !(self.spacing > 0.0) {
            return Err(ConfigError::InvalidSpacing(self.spacing));
        }
        if !(self.safe_radius >= 0.0) {
            return Err(ConfigError::InvalidSafeRadius(self.safe_radius));
        }
        for (name, value) in [
            ("tree", self.tree_probability),
            ("coin", self.coin_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }
        Ok(())
    }
}

/// Rates and limits for the flight model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightParams {
    pub max_speed: f32,
    pub acceleration: f32,
    pub yaw_rate: f32,
    pub climb_rate: f32,
    pub min_altitude: f32,
    pub max_altitude: f32,
}

impl Default for FlightParams {
    fn default() -> Self {
        FlightParams {
            max_speed: MAX_SPEED,
            acceleration: ACCELERATION,
            yaw_rate: YAW_RATE,
            climb_rate: CLIMB_RATE,
            min_altitude: MIN_ALTITUDE,
            max_altitude: MAX_ALTITUDE,
        }
    }
}

impl FlightParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("max_speed", self.max_speed),
            ("acceleration", self.acceleration),
            ("yaw_rate", self.yaw_rate),
            ("climb_rate", self.climb_rate),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::InvalidRate { name, value });
            }
        }
        if !(self.min_altitude <= self.max_altitude) {
            return Err(ConfigError::InvalidAltitudeBand {
                min: self.min_altitude,
                max: self.max_altitude,
            });
        }
        Ok(())
    }
}

/// Everything a session needs to start.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub layout: WorldLayout,
    pub flight: FlightParams,
    /// Fixed seed for reproducible layouts; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub tick_rate: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::new(WorldLayout::default(), FlightParams::default(), None)
    }
}

impl GameConfig {
    pub fn new(layout: WorldLayout, flight: FlightParams, seed: Option<u64>) -> Self {
        GameConfig {
            layout,
            flight,
            seed,
            tick_rate: TICK_RATE,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        self.layout.validate()?;
        self.flight.validate()
    }

    /// Seconds simulated by one tick.
    pub fn tick_duration(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}
