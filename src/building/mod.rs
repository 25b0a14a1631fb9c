//! Building, floor, and elevator car state machines
//!
//! The building owns everything physical in the simulation: the floors with
//! their hall queues and arrival processes, and the cars with their
//! manifests and motion state.

pub mod building;
pub mod car;
pub mod floor;

pub use building::{Building, CarPhaseOutcome, FloorPhaseOutcome};
pub use car::{CarState, CarTickOutcome, ElevatorCar};
pub use floor::Floor;
