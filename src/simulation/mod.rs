//! Simulation orchestration: clock, simulator, statistics, errors, logging
//!
//! This module contains everything that composes the physical model into a
//! runnable simulation: the virtual clock, the tick-loop simulator, the
//! statistics aggregation consumed by scoring and export, the error types,
//! and the tracing subscriber setup for embedding hosts.

pub mod clock;
pub mod error;
pub mod logging;
pub mod simulator;
pub mod statistics;

pub use clock::{Clock, SimTime, DAY_SECONDS};
pub use error::{SimulationError, SimulationResult};
pub use logging::LoggingConfig;
pub use simulator::{Simulator, TripRecord};
pub use statistics::{
    SimulationStats, StatsInterval, StatsSummary, HOUR_SECONDS, LONG_WAIT_THRESHOLD_SECONDS,
};
