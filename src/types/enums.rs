//! Core enumerations shared across the simulation
//!
//! Travel direction and trip classification are used by floors, cars,
//! dispatch strategies, and the statistics aggregator alike, so they live
//! here rather than in any one component module.

use crate::types::FloorId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of travel for a car or a hall call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward higher floor indices
    Up,
    /// Toward lower floor indices
    Down,
}

impl Direction {
    /// Direction of a trip from `from` to `to`
    ///
    /// The two floors must differ; passenger construction already rejects
    /// equal arrival and destination floors.
    pub fn of_travel(from: FloorId, to: FloorId) -> Direction {
        if to.is_above(from) {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// The opposite direction
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Signed floor increment for one step of travel in this direction
    pub fn step(self) -> isize {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Classification of a completed trip relative to the lobby
///
/// Used by the statistics aggregator to break served passengers into the
/// three canonical traffic components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TripKind {
    /// Trip starting at the lobby (incoming traffic)
    Up,
    /// Trip ending at the lobby (outgoing traffic)
    Down,
    /// Trip between two non-lobby floors
    Interfloor,
}

impl TripKind {
    /// Classify a trip given its endpoints and the building's lobby floor
    pub fn classify(arrival: FloorId, destination: FloorId, lobby: FloorId) -> TripKind {
        if arrival == lobby {
            TripKind::Up
        } else if destination == lobby {
            TripKind::Down
        } else {
            TripKind::Interfloor
        }
    }
}

impl fmt::Display for TripKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripKind::Up => write!(f, "up"),
            TripKind::Down => write!(f, "down"),
            TripKind::Interfloor => write!(f, "interfloor"),
        }
    }
}
