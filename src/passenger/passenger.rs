//! Passenger trip records
//!
//! A passenger is created by a floor's arrival process and is immutable
//! afterwards except for its two lifecycle timestamps, each of which is set
//! exactly once: boarding when a car claims it, exit when it is delivered.

use crate::simulation::{SimTime, SimulationError, SimulationResult};
use crate::types::{Direction, FloorId, PassengerId, TripKind};
use serde::{Deserialize, Serialize};

/// One passenger's trip through the building
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    id: PassengerId,
    arrival_floor: FloorId,
    destination_floor: FloorId,
    weight: u32,
    arrived_at: SimTime,
    boarded_at: Option<SimTime>,
    exited_at: Option<SimTime>,
}

impl Passenger {
    /// Create a passenger waiting at `arrival_floor` for `destination_floor`
    ///
    /// Fails when the two floors coincide or the capacity weight is zero;
    /// both are data errors in whatever generated the trip.
    pub fn new(
        id: PassengerId,
        arrival_floor: FloorId,
        destination_floor: FloorId,
        weight: u32,
        arrived_at: SimTime,
    ) -> SimulationResult<Self> {
        if arrival_floor == destination_floor {
            return Err(SimulationError::PassengerError(format!(
                "{id} arrives and departs at the same floor {arrival_floor}"
            )));
        }
        if weight == 0 {
            return Err(SimulationError::PassengerError(format!(
                "{id} must occupy at least one capacity unit"
            )));
        }
        Ok(Self {
            id,
            arrival_floor,
            destination_floor,
            weight,
            arrived_at,
            boarded_at: None,
            exited_at: None,
        })
    }

    /// This passenger's identifier
    pub fn id(&self) -> PassengerId {
        self.id
    }

    /// Floor where the passenger registered its hall call
    pub fn arrival_floor(&self) -> FloorId {
        self.arrival_floor
    }

    /// Floor the passenger wants to reach
    pub fn destination_floor(&self) -> FloorId {
        self.destination_floor
    }

    /// Capacity units this passenger occupies in a car
    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Simulated time at which the passenger appeared
    pub fn arrived_at(&self) -> SimTime {
        self.arrived_at
    }

    /// Simulated time at which the passenger boarded, if it has
    pub fn boarded_at(&self) -> Option<SimTime> {
        self.boarded_at
    }

    /// Simulated time at which the passenger exited, if it has
    pub fn exited_at(&self) -> Option<SimTime> {
        self.exited_at
    }

    /// Direction of service this passenger's hall call requires
    pub fn direction(&self) -> Direction {
        Direction::of_travel(self.arrival_floor, self.destination_floor)
    }

    /// Trip classification relative to the building's lobby
    pub fn trip_kind(&self, lobby: FloorId) -> TripKind {
        TripKind::classify(self.arrival_floor, self.destination_floor, lobby)
    }

    /// Record the boarding timestamp; set exactly once
    pub fn record_boarding(&mut self, now: SimTime) -> SimulationResult<()> {
        if self.boarded_at.is_some() {
            return Err(SimulationError::PassengerError(format!(
                "{} boarded twice",
                self.id
            )));
        }
        self.boarded_at = Some(now.max(self.arrived_at));
        Ok(())
    }

    /// Record the exit timestamp; set exactly once, after boarding
    pub fn record_exit(&mut self, now: SimTime) -> SimulationResult<()> {
        let boarded = self.boarded_at.ok_or_else(|| {
            SimulationError::PassengerError(format!("{} exited without boarding", self.id))
        })?;
        if self.exited_at.is_some() {
            return Err(SimulationError::PassengerError(format!(
                "{} exited twice",
                self.id
            )));
        }
        self.exited_at = Some(now.max(boarded));
        Ok(())
    }

    /// Seconds spent waiting at the floor, once boarded
    pub fn wait_time(&self) -> Option<SimTime> {
        self.boarded_at.map(|t| t - self.arrived_at)
    }

    /// Seconds spent inside the car, once exited
    pub fn ride_time(&self) -> Option<SimTime> {
        match (self.boarded_at, self.exited_at) {
            (Some(boarded), Some(exited)) => Some(exited - boarded),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passenger() -> Passenger {
        Passenger::new(PassengerId(1), FloorId(0), FloorId(3), 1, 10.0).unwrap()
    }

    #[test]
    fn test_same_floor_trip_rejected() {
        let result = Passenger::new(PassengerId(1), FloorId(2), FloorId(2), 1, 0.0);
        assert!(matches!(result, Err(SimulationError::PassengerError(_))));
    }

    #[test]
    fn test_zero_weight_rejected() {
        let result = Passenger::new(PassengerId(1), FloorId(0), FloorId(1), 0, 0.0);
        assert!(matches!(result, Err(SimulationError::PassengerError(_))));
    }

    #[test]
    fn test_direction_follows_floors() {
        let up = passenger();
        assert_eq!(up.direction(), Direction::Up);

        let down = Passenger::new(PassengerId(2), FloorId(4), FloorId(1), 1, 0.0).unwrap();
        assert_eq!(down.direction(), Direction::Down);
    }

    #[test]
    fn test_lifecycle_timestamps_set_once() {
        let mut p = passenger();
        assert!(p.wait_time().is_none());

        p.record_boarding(12.5).unwrap();
        assert_eq!(p.wait_time(), Some(2.5));
        assert!(p.record_boarding(13.0).is_err());

        p.record_exit(20.0).unwrap();
        assert_eq!(p.ride_time(), Some(7.5));
        assert!(p.record_exit(21.0).is_err());
    }

    #[test]
    fn test_exit_requires_boarding() {
        let mut p = passenger();
        assert!(p.record_exit(15.0).is_err());
    }

    #[test]
    fn test_timestamps_never_run_backwards() {
        let mut p = passenger();
        // Clamped to the arrival time rather than producing a negative wait.
        p.record_boarding(5.0).unwrap();
        assert_eq!(p.boarded_at(), Some(10.0));
        assert_eq!(p.wait_time(), Some(0.0));

        p.record_exit(8.0).unwrap();
        assert_eq!(p.ride_time(), Some(0.0));
    }

    #[test]
    fn test_trip_kinds() {
        let lobby = FloorId(0);
        assert_eq!(passenger().trip_kind(lobby), TripKind::Up);

        let down = Passenger::new(PassengerId(2), FloorId(3), FloorId(0), 1, 0.0).unwrap();
        assert_eq!(down.trip_kind(lobby), TripKind::Down);

        let inter = Passenger::new(PassengerId(3), FloorId(2), FloorId(4), 1, 0.0).unwrap();
        assert_eq!(inter.trip_kind(lobby), TripKind::Interfloor);
    }
}
