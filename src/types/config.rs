//! Configuration structures for the elevator dispatch simulator
//!
//! This module contains the scenario configuration and its validation
//! logic. Configuration is plain serde-able data so an embedding host (CLI,
//! batch runner, RL harness) can construct or deserialize it however it
//! likes; this crate only validates and consumes it.

use crate::dispatch::StrategyKind;
use crate::traffic::TrafficProfile;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Simulation tuning constants
pub mod defaults {
    /// Default tick length in seconds of simulated time
    pub const TICK_SECONDS: f64 = 0.1;

    /// Default horizon after which no new passengers are generated (one day)
    pub const ARRIVAL_HORIZON_SECONDS: f64 = 86_400.0;

    /// Default capacity weight of a generated passenger
    pub const PASSENGER_WEIGHT: u32 = 1;
}

/// Errors produced by configuration validation
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    /// A building needs at least two floors to move anyone anywhere
    #[error("building must have at least 2 floors, got {0}")]
    TooFewFloors(usize),

    /// At least one elevator car is required
    #[error("building must have at least 1 elevator car")]
    NoCars,

    /// A car parameter is out of range
    #[error("invalid car configuration: {0}")]
    InvalidCar(String),

    /// The generated passenger weight cannot fit in any car
    #[error("passenger weight {weight} exceeds car capacity {capacity}")]
    PassengerTooHeavy {
        /// Configured weight of a generated passenger
        weight: u32,
        /// Configured capacity of a car
        capacity: u32,
    },

    /// The tick length must be a positive number of seconds
    #[error("tick length must be positive, got {0}")]
    NonPositiveTick(f64),

    /// The arrival horizon cannot be negative
    #[error("arrival horizon must be non-negative, got {0}")]
    NegativeHorizon(f64),

    /// At least one dispatch strategy must be configured
    #[error("at least one dispatch strategy must be configured")]
    NoStrategies,

    /// The traffic profile failed its own validation
    #[error("invalid traffic profile: {0}")]
    InvalidTraffic(String),
}

/// Physical parameters of one elevator car
///
/// All durations are seconds of simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarConfig {
    /// Total capacity in passenger weight units
    pub capacity: u32,
    /// Time to travel one floor while moving
    pub floor_time: f64,
    /// Dwell time of an unscheduled or scheduled stop
    pub stop_time: f64,
    /// Extra delay when accelerating out of a stop
    pub start_time: f64,
    /// Time the doors stay open on top of the stop dwell
    pub door_time: f64,
}

impl Default for CarConfig {
    fn default() -> Self {
        Self { capacity: 8, floor_time: 1.5, stop_time: 2.6, start_time: 0.0, door_time: 1.0 }
    }
}

impl CarConfig {
    /// Validate the car parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.capacity == 0 {
            return Err(ConfigValidationError::InvalidCar("capacity must be at least 1".into()));
        }
        if !(self.floor_time > 0.0) {
            return Err(ConfigValidationError::InvalidCar(format!(
                "floor_time must be positive, got {}",
                self.floor_time
            )));
        }
        for (name, value) in
            [("stop_time", self.stop_time), ("start_time", self.start_time), ("door_time", self.door_time)]
        {
            if !(value >= 0.0) {
                return Err(ConfigValidationError::InvalidCar(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Complete scenario configuration for one simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of elevator cars in the bank
    pub num_cars: usize,
    /// Shared physical parameters of every car
    pub car: CarConfig,
    /// Resident count per floor, index 0 being the lobby
    pub residents: Vec<u32>,
    /// Time-of-day traffic table shared by all floors
    pub traffic: TrafficProfile,
    /// Seed for the simulation's random source; `None` draws from entropy
    pub seed: Option<u64>,
    /// Simulated time after which no new passengers are generated
    pub arrival_horizon: f64,
    /// Tick length used by `advance_one_step` and `run_to_completion`
    pub tick: f64,
    /// Capacity weight of each generated passenger
    pub passenger_weight: u32,
    /// Dispatch strategies available to the switchable composite,
    /// in switch-index order; index 0 is active at start
    pub strategies: Vec<StrategyKind>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_cars: 2,
            car: CarConfig::default(),
            residents: vec![0, 50, 50, 50, 50, 50],
            traffic: TrafficProfile::default(),
            seed: None,
            arrival_horizon: defaults::ARRIVAL_HORIZON_SECONDS,
            tick: defaults::TICK_SECONDS,
            passenger_weight: defaults::PASSENGER_WEIGHT,
            strategies: vec![StrategyKind::CollectiveControl],
        }
    }
}

impl SimulationConfig {
    /// Number of floors implied by the resident table
    pub fn num_floors(&self) -> usize {
        self.residents.len()
    }

    /// Validate the whole scenario, failing fast on the first problem
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.residents.len() < 2 {
            return Err(ConfigValidationError::TooFewFloors(self.residents.len()));
        }
        if self.num_cars == 0 {
            return Err(ConfigValidationError::NoCars);
        }
        self.car.validate()?;
        if self.passenger_weight == 0 || self.passenger_weight > self.car.capacity {
            return Err(ConfigValidationError::PassengerTooHeavy {
                weight: self.passenger_weight,
                capacity: self.car.capacity,
            });
        }
        if !(self.tick > 0.0) {
            return Err(ConfigValidationError::NonPositiveTick(self.tick));
        }
        if !(self.arrival_horizon >= 0.0) {
            return Err(ConfigValidationError::NegativeHorizon(self.arrival_horizon));
        }
        if self.strategies.is_empty() {
            return Err(ConfigValidationError::NoStrategies);
        }
        self.traffic
            .validate()
            .map_err(|e| ConfigValidationError::InvalidTraffic(e.to_string()))?;
        Ok(())
    }
}
