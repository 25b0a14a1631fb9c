//! Core types, identifiers, and configuration
//!
//! This module contains the foundational types used throughout the
//! simulator: typed identifiers, shared enumerations, and the scenario
//! configuration with its validation logic.

pub mod config;
pub mod enums;
pub mod identifiers;

pub use config::{defaults, CarConfig, ConfigValidationError, SimulationConfig};
pub use enums::{Direction, TripKind};
pub use identifiers::{CarId, FloorId, PassengerId};
