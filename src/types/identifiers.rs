//! Identifier types for the elevator dispatch simulator
//!
//! This module contains the typed identifiers for passengers, elevator cars,
//! and floors used throughout the simulation system. Identifiers are
//! sequential integers assigned by the simulation itself so that a fixed
//! seed reproduces an identical identifier sequence run after run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a passenger within one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassengerId(pub u64);

impl fmt::Display for PassengerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PAX_{:06}", self.0)
    }
}

/// Identifier for an elevator car (its index in the building's car bank)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarId(pub usize);

impl CarId {
    /// Index of this car in the building's car bank
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CAR_{}", self.0)
    }
}

/// Identifier for a floor (its index from the lobby upward, lobby = 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloorId(pub usize);

impl FloorId {
    /// Index of this floor in the building, counted from the lobby
    pub fn index(self) -> usize {
        self.0
    }

    /// Number of floors between this floor and `other`
    pub fn distance_to(self, other: FloorId) -> usize {
        self.0.abs_diff(other.0)
    }

    /// Whether this floor lies above `other`
    pub fn is_above(self, other: FloorId) -> bool {
        self.0 > other.0
    }

    /// Whether this floor lies below `other`
    pub fn is_below(self, other: FloorId) -> bool {
        self.0 < other.0
    }
}

impl fmt::Display for FloorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FLR_{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert_eq!(PassengerId(7).to_string(), "PAX_000007");
        assert_eq!(CarId(2).to_string(), "CAR_2");
        assert_eq!(FloorId(11).to_string(), "FLR_11");
    }

    #[test]
    fn test_floor_geometry_helpers() {
        let lobby = FloorId(0);
        let fifth = FloorId(5);

        assert_eq!(lobby.distance_to(fifth), 5);
        assert_eq!(fifth.distance_to(lobby), 5);
        assert!(fifth.is_above(lobby));
        assert!(lobby.is_below(fifth));
        assert!(!lobby.is_above(lobby));
    }

    #[test]
    fn test_serde_transparency() {
        let id = PassengerId(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let back: PassengerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_ordering_follows_index() {
        assert!(FloorId(1) < FloorId(4));
        assert!(CarId(0) < CarId(1));
        assert!(PassengerId(9) < PassengerId(10));
    }
}
