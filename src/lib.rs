//! Elevator Dispatch Simulator
//!
//! A discrete-event simulation engine for evaluating elevator group-control
//! policies under reproducible passenger traffic. A building of floors and
//! elevator cars is driven through an accelerated virtual day; passengers
//! arrive according to a time-of-day traffic profile, a pluggable dispatch
//! strategy decides which car serves which hall call, and wait/ride-time
//! statistics score the outcome.
//!
//! # Overview
//!
//! Everything advances in fixed virtual ticks with a deterministic phase
//! order: floors match pickups and roll their stochastic arrival process,
//! cars advance their motion and door state machines, and the active
//! strategy makes its dispatch decisions against the post-motion state.
//! A single seeded random source feeds every stochastic decision, so an
//! identical seed, scenario, and strategy reproduce an identical event
//! trace — the property that makes strategy comparisons meaningful.
//!
//! ## Quick start
//!
//! ```rust
//! use elevator_dispatch_simulator::{
//!     SimulationConfig, Simulator, StrategyKind, TrafficProfile,
//! };
//!
//! let config = SimulationConfig {
//!     num_cars: 2,
//!     residents: vec![0, 40, 40, 40, 40, 40],
//!     traffic: TrafficProfile::uniform(6.0, 0.5, 0.4),
//!     seed: Some(42),
//!     arrival_horizon: 600.0,
//!     strategies: vec![StrategyKind::CollectiveControl, StrategyKind::ThreePassage],
//!     ..Default::default()
//! };
//!
//! let mut simulator = Simulator::new(config)?;
//! simulator.run_to_completion()?;
//!
//! let run = simulator.stats().run();
//! println!("avg wait {:.1}s over {} trips", run.average_wait_time(), run.served);
//! # Ok::<(), elevator_dispatch_simulator::SimulationError>(())
//! ```
//!
//! ## Module organization
//!
//! - [`types`]: identifiers, shared enums, and scenario configuration
//! - [`traffic`]: time-of-day traffic table and weighted sampling
//! - [`passenger`]: passenger trip records
//! - [`building`]: floor, car, and building state machines
//! - [`dispatch`]: hall calls, the strategy contract, and the strategies
//! - [`simulation`]: clock, simulator, statistics, errors, and logging
//!
//! ## External collaborators
//!
//! Run-time policy selectors observe [`SimulationStats::poll_interval`]
//! and the read-only hall queue, and command
//! [`Simulator::switch_strategy`]; exporters read the full
//! [`StatsInterval`] field set and the trip log. The engine never calls
//! out to either.

#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod building;
pub mod dispatch;
pub mod passenger;
pub mod simulation;
pub mod traffic;
pub mod types;

// Core types and identifiers
pub use types::{
    defaults, CarConfig, CarId, ConfigValidationError, Direction, FloorId, PassengerId,
    SimulationConfig, TripKind,
};

// Traffic model
pub use traffic::{TrafficInterval, TrafficProfile, TrafficProfileError, WeightedSampler};

// Passenger records
pub use passenger::Passenger;

// Building state machines
pub use building::{Building, CarState, ElevatorCar, Floor};

// Dispatch strategies and control
pub use dispatch::{
    CollectiveControl, ControlSystem, DispatchContext, HallCall, LongestQueueFirst, Passage,
    RoundRobin, SchedulingAlgorithm, StrategyKind, SwitchableStrategy, ThreePassage, Zoning,
};

// Simulation orchestration
pub use simulation::{
    Clock, LoggingConfig, SimTime, SimulationError, SimulationResult, SimulationStats, Simulator,
    StatsInterval, StatsSummary, TripRecord, LONG_WAIT_THRESHOLD_SECONDS,
};
