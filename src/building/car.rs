//! Elevator car state machine
//!
//! A car is either idle, moving one floor at a time toward a destination,
//! or dwelling at a stop with its doors open. The state is an explicit
//! tagged union with the relevant timer inside each variant, so a car can
//! never be simultaneously moving and holding its doors open.
//!
//! Boarding extends the destination to the furthest call in the current
//! direction of travel; exits happen the moment the car reaches a boarded
//! passenger's floor.

use crate::passenger::Passenger;
use crate::simulation::{SimTime, SimulationError, SimulationResult};
use crate::types::{CarConfig, CarId, Direction, FloorId};
use serde::Serialize;
use tracing::{debug, warn};

/// Motion and door state of a car, timers included
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CarState {
    /// No destination, doors closed, available for dispatch
    Idle,
    /// Advancing one floor per `floor_time` toward the destination
    Moving {
        /// Current direction of travel
        direction: Direction,
        /// Seconds until the next floor boundary
        next_floor_in: SimTime,
        /// Whether a strategy forced an unscheduled stop at that boundary
        stop_at_next: bool,
    },
    /// Doors open, dwelling at the current floor
    Stopped {
        /// Seconds until the doors close and motion may resume
        door_time_left: SimTime,
    },
}

/// What happened inside one car tick
#[derive(Debug, Default)]
pub struct CarTickOutcome {
    /// Passengers delivered this tick, exit timestamps already recorded
    pub exited: Vec<Passenger>,
    /// Whether the car finished its work and returned to idle
    pub became_idle: bool,
}

/// One elevator car and its passenger manifest
#[derive(Debug)]
pub struct ElevatorCar {
    id: CarId,
    config: CarConfig,
    start_floor: FloorId,
    floor: FloorId,
    destination: Option<FloorId>,
    state: CarState,
    manifest: Vec<Passenger>,
    load: u32,
}

impl ElevatorCar {
    /// Create a car parked idle at `start_floor`
    pub fn new(id: CarId, config: CarConfig, start_floor: FloorId) -> Self {
        Self {
            id,
            config,
            start_floor,
            floor: start_floor,
            destination: None,
            state: CarState::Idle,
            manifest: Vec::new(),
            load: 0,
        }
    }

    /// This car's identifier
    pub fn id(&self) -> CarId {
        self.id
    }

    /// The car's physical parameters
    pub fn config(&self) -> &CarConfig {
        &self.config
    }

    /// Current discrete floor position
    pub fn floor(&self) -> FloorId {
        self.floor
    }

    /// Committed destination, if any
    pub fn destination(&self) -> Option<FloorId> {
        self.destination
    }

    /// Current motion/door state
    pub fn state(&self) -> CarState {
        self.state
    }

    /// Boarded passengers in boarding order
    pub fn manifest(&self) -> &[Passenger] {
        &self.manifest
    }

    /// Capacity units currently occupied
    pub fn load(&self) -> u32 {
        self.load
    }

    /// Whether the car is idle
    pub fn is_idle(&self) -> bool {
        matches!(self.state, CarState::Idle)
    }

    /// Whether the car is dwelling with its doors open
    pub fn is_stopped(&self) -> bool {
        matches!(self.state, CarState::Stopped { .. })
    }

    /// Whether the car is in motion
    pub fn is_moving(&self) -> bool {
        matches!(self.state, CarState::Moving { .. })
    }

    /// Current direction of service
    ///
    /// While moving this is the direction of motion; while stopped
    /// mid-route it points toward the remaining destination; an idle car or
    /// one dwelling at its final destination has no direction and may serve
    /// a call either way.
    pub fn direction(&self) -> Option<Direction> {
        if let CarState::Moving { direction, .. } = self.state {
            return Some(direction);
        }
        self.destination.map(|dest| Direction::of_travel(self.floor, dest))
    }

    /// The floor boundary the car will reach next, if it is moving
    pub fn next_floor(&self) -> Option<FloorId> {
        if let CarState::Moving { direction, .. } = self.state {
            let next = self.floor.index() as isize + direction.step();
            if next >= 0 {
                return Some(FloorId(next as usize));
            }
        }
        None
    }

    /// Whether the car is at `floor` with its doors able to open for pickup
    pub fn is_available_at(&self, floor: FloorId) -> bool {
        self.floor == floor && !self.is_moving()
    }

    /// Whether adding `weight` capacity units still fits
    pub fn can_board(&self, weight: u32) -> bool {
        self.load + weight <= self.config.capacity
    }

    /// Whether the car's direction of service admits a call in `direction`
    pub fn accepts_direction(&self, direction: Direction) -> bool {
        self.direction().map_or(true, |d| d == direction)
    }

    /// Send an idle car toward `target`
    ///
    /// Dispatching a car to its own floor is a no-op: the normal floor
    /// matching pass will board the caller. Dispatching a busy car is
    /// ignored with a warning; strategies are expected to select idle cars.
    pub fn dispatch_to(&mut self, target: FloorId) {
        if target == self.floor {
            return;
        }
        if !self.is_idle() {
            warn!(car = %self.id, state = ?self.state, "ignoring dispatch of a busy car");
            return;
        }
        let direction = Direction::of_travel(self.floor, target);
        self.destination = Some(target);
        self.state = CarState::Moving {
            direction,
            next_floor_in: self.config.start_time + self.config.floor_time,
            stop_at_next: false,
        };
        debug!(car = %self.id, from = %self.floor, to = %target, %direction, "car dispatched");
    }

    /// Force an unscheduled stop at the next floor boundary
    ///
    /// Has no effect unless the car is moving.
    pub fn stop_at_next_floor(&mut self) {
        if let CarState::Moving { stop_at_next, .. } = &mut self.state {
            *stop_at_next = true;
        }
    }

    /// Take a passenger aboard
    ///
    /// The caller must have recorded the boarding timestamp and verified
    /// capacity and direction. The destination is extended to the furthest
    /// call in the direction of travel; boarding an idle car opens a
    /// zero-length stop so that other passengers at the floor can co-board
    /// in the same matching pass before the car departs.
    pub fn board(&mut self, passenger: Passenger) -> SimulationResult<()> {
        if !self.can_board(passenger.weight()) {
            return Err(SimulationError::DispatchError(format!(
                "{} cannot board {}: load {} + {} exceeds capacity {}",
                self.id,
                passenger.id(),
                self.load,
                passenger.weight(),
                self.config.capacity
            )));
        }
        if self.is_moving() {
            return Err(SimulationError::DispatchError(format!(
                "{} cannot board {} while moving",
                self.id,
                passenger.id()
            )));
        }

        let target = passenger.destination_floor();
        let destination = match (self.direction(), self.destination) {
            (Some(Direction::Up), Some(dest)) => dest.max(target),
            (Some(Direction::Down), Some(dest)) => dest.min(target),
            _ => target,
        };
        self.destination = Some(destination);
        if self.is_idle() {
            self.state = CarState::Stopped { door_time_left: 0.0 };
        }

        debug!(
            car = %self.id,
            passenger = %passenger.id(),
            destination = %destination,
            "passenger boarded"
        );
        self.load += passenger.weight();
        self.manifest.push(passenger);
        Ok(())
    }

    /// Advance the car's state machine by `dt` seconds starting at `now`
    ///
    /// Several floor boundaries or dwell expirations may occur within one
    /// large step; exits are timestamped at the exact sub-tick instant the
    /// car reaches the passenger's floor.
    pub fn tick(&mut self, now: SimTime, dt: SimTime) -> SimulationResult<CarTickOutcome> {
        let mut outcome = CarTickOutcome::default();
        let mut budget = dt;
        let mut elapsed = 0.0;

        loop {
            match self.state {
                CarState::Idle => break,

                CarState::Stopped { door_time_left } => {
                    if door_time_left > budget {
                        self.state = CarState::Stopped { door_time_left: door_time_left - budget };
                        break;
                    }
                    budget -= door_time_left;
                    elapsed += door_time_left;

                    if self.destination.is_none() && !self.manifest.is_empty() {
                        // Should be unreachable: the destination always covers
                        // the furthest manifest call. Recover instead of
                        // stranding the passengers.
                        let recovered = self.furthest_manifest_destination();
                        warn!(car = %self.id, destination = %recovered, "rebuilt destination from manifest");
                        self.destination = Some(recovered);
                    }

                    match self.destination {
                        Some(dest) => {
                            let direction = Direction::of_travel(self.floor, dest);
                            self.state = CarState::Moving {
                                direction,
                                next_floor_in: self.config.start_time + self.config.floor_time,
                                stop_at_next: false,
                            };
                        }
                        None => {
                            self.state = CarState::Idle;
                            outcome.became_idle = true;
                            debug!(car = %self.id, floor = %self.floor, "car idle");
                            break;
                        }
                    }
                }

                CarState::Moving { direction, next_floor_in, stop_at_next } => {
                    if next_floor_in > budget {
                        self.state = CarState::Moving {
                            direction,
                            next_floor_in: next_floor_in - budget,
                            stop_at_next,
                        };
                        break;
                    }
                    budget -= next_floor_in;
                    elapsed += next_floor_in;

                    let next = self.floor.index() as isize + direction.step();
                    if next < 0 {
                        warn!(car = %self.id, "car reached the terminal floor; forcing a stop");
                        self.state = CarState::Stopped {
                            door_time_left: self.config.stop_time + self.config.door_time,
                        };
                        continue;
                    }
                    self.floor = FloorId(next as usize);

                    let mut stopping = stop_at_next;
                    let arrival_time = now + elapsed;
                    let mut index = 0;
                    while index < self.manifest.len() {
                        if self.manifest[index].destination_floor() == self.floor {
                            let mut passenger = self.manifest.remove(index);
                            passenger.record_exit(arrival_time)?;
                            self.load -= passenger.weight();
                            debug!(
                                car = %self.id,
                                passenger = %passenger.id(),
                                floor = %self.floor,
                                "passenger exited"
                            );
                            outcome.exited.push(passenger);
                            stopping = true;
                        } else {
                            index += 1;
                        }
                    }
                    // Reaching the destination clears it; a car dwelling at
                    // its final stop has no direction and may serve a call
                    // either way.
                    if self.destination == Some(self.floor) {
                        stopping = true;
                        self.destination = None;
                    }

                    self.state = if stopping {
                        CarState::Stopped {
                            door_time_left: self.config.stop_time + self.config.door_time,
                        }
                    } else {
                        CarState::Moving {
                            direction,
                            next_floor_in: self.config.floor_time,
                            stop_at_next: false,
                        }
                    };
                }
            }
        }

        Ok(outcome)
    }

    /// Restore the car to its construction state
    pub fn reset(&mut self) {
        self.floor = self.start_floor;
        self.destination = None;
        self.state = CarState::Idle;
        self.manifest.clear();
        self.load = 0;
    }

    fn furthest_manifest_destination(&self) -> FloorId {
        self.manifest
            .iter()
            .map(Passenger::destination_floor)
            .max_by_key(|dest| dest.distance_to(self.floor))
            .unwrap_or(self.floor)
    }
}
