//! Building: the fixed bank of floors and cars
//!
//! The building exclusively owns its floors and elevator cars. Its shape is
//! fixed at construction (and validated there — fewer than two floors is a
//! configuration error); the contents mutate every tick. The building also
//! drives the first two tick phases: all floors, then all cars.

use crate::building::{CarTickOutcome, ElevatorCar, Floor};
use crate::dispatch::HallCall;
use crate::passenger::Passenger;
use crate::simulation::{SimTime, SimulationResult};
use crate::traffic::TrafficProfile;
use crate::types::{CarConfig, CarId, ConfigValidationError, FloorId, PassengerId};
use rand::Rng;
use tracing::{info, instrument};

/// Result of the floor phase of one tick
#[derive(Debug, Default)]
pub struct FloorPhaseOutcome {
    /// Passengers that boarded a car this tick, with the claiming car
    pub boarded: Vec<(PassengerId, CarId)>,
    /// Hall calls for passengers generated this tick
    pub new_calls: Vec<HallCall>,
}

/// Result of the car phase of one tick
#[derive(Debug, Default)]
pub struct CarPhaseOutcome {
    /// Passengers delivered this tick, exit timestamps recorded,
    /// paired with the delivering car
    pub exited: Vec<(Passenger, CarId)>,
    /// Cars that finished their work and returned to idle this tick
    pub became_idle: Vec<CarId>,
}

/// The simulated building: floors, cars, and the resident table
#[derive(Debug)]
pub struct Building {
    floors: Vec<Floor>,
    cars: Vec<ElevatorCar>,
    residents: Vec<u32>,
    lobby: FloorId,
    next_passenger: u64,
}

impl Building {
    /// Construct a building, failing fast on an invalid shape
    #[instrument(skip(car, residents), fields(num_floors = residents.len()))]
    pub fn new(
        num_cars: usize,
        car: CarConfig,
        residents: Vec<u32>,
    ) -> SimulationResult<Self> {
        if residents.len() < 2 {
            return Err(ConfigValidationError::TooFewFloors(residents.len()).into());
        }
        if num_cars == 0 {
            return Err(ConfigValidationError::NoCars.into());
        }
        car.validate()?;

        let lobby = FloorId(0);
        let floors = residents
            .iter()
            .enumerate()
            .map(|(index, &count)| Floor::new(FloorId(index), count))
            .collect();
        let cars = (0..num_cars)
            .map(|index| ElevatorCar::new(CarId(index), car, lobby))
            .collect();

        info!(
            num_floors = residents.len(),
            num_cars,
            total_residents = residents.iter().map(|&r| u64::from(r)).sum::<u64>(),
            "building constructed"
        );
        Ok(Self { floors, cars, residents, lobby, next_passenger: 0 })
    }

    /// The floors, lobby first
    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    /// The elevator cars in index order
    pub fn cars(&self) -> &[ElevatorCar] {
        &self.cars
    }

    /// One floor by identifier
    pub fn floor(&self, id: FloorId) -> &Floor {
        &self.floors[id.index()]
    }

    /// One car by identifier
    pub fn car(&self, id: CarId) -> &ElevatorCar {
        &self.cars[id.index()]
    }

    /// Number of floors
    pub fn num_floors(&self) -> usize {
        self.floors.len()
    }

    /// Number of cars
    pub fn num_cars(&self) -> usize {
        self.cars.len()
    }

    /// The lobby floor
    pub fn lobby(&self) -> FloorId {
        self.lobby
    }

    /// Resident counts per floor
    pub fn residents(&self) -> &[u32] {
        &self.residents
    }

    /// Total residents across all floors
    pub fn total_residents(&self) -> u64 {
        self.residents.iter().map(|&r| u64::from(r)).sum()
    }

    /// Passengers waiting at any floor
    pub fn waiting_count(&self) -> usize {
        self.floors.iter().map(Floor::waiting_count).sum()
    }

    /// Passengers riding in any car
    pub fn aboard_count(&self) -> usize {
        self.cars.iter().map(|car| car.manifest().len()).sum()
    }

    /// Whether no passenger is waiting or aboard anywhere
    pub fn is_drained(&self) -> bool {
        self.waiting_count() == 0 && self.aboard_count() == 0
    }

    /// Enqueue an externally created passenger at its arrival floor
    ///
    /// Allocates the passenger identifier from the building's sequence so
    /// injected and generated passengers share one identifier space.
    pub fn inject_passenger(
        &mut self,
        arrival: FloorId,
        destination: FloorId,
        weight: u32,
        now: SimTime,
    ) -> SimulationResult<HallCall> {
        let id = PassengerId(self.next_passenger);
        let passenger = Passenger::new(id, arrival, destination, weight, now)?;
        self.next_passenger += 1;
        Ok(self.floors[arrival.index()].push_passenger(passenger))
    }

    /// Phase 1 of a tick: every floor matches pickups, then rolls arrivals
    #[allow(clippy::too_many_arguments)]
    pub fn update_floors<R: Rng + ?Sized>(
        &mut self,
        profile: &TrafficProfile,
        now: SimTime,
        dt: SimTime,
        horizon: SimTime,
        passenger_weight: u32,
        rng: &mut R,
    ) -> SimulationResult<FloorPhaseOutcome> {
        let mut outcome = FloorPhaseOutcome::default();
        for floor in &mut self.floors {
            outcome.boarded.extend(floor.match_waiting(&mut self.cars, now)?);
            outcome.new_calls.extend(floor.roll_arrivals(
                profile,
                &self.residents,
                self.lobby,
                now,
                dt,
                horizon,
                passenger_weight,
                &mut self.next_passenger,
                rng,
            )?);
        }
        Ok(outcome)
    }

    /// Phase 2 of a tick: every car advances its state machine
    pub fn update_cars(&mut self, now: SimTime, dt: SimTime) -> SimulationResult<CarPhaseOutcome> {
        let mut outcome = CarPhaseOutcome::default();
        for car in &mut self.cars {
            let CarTickOutcome { exited, became_idle } = car.tick(now, dt)?;
            let car_id = car.id();
            outcome.exited.extend(exited.into_iter().map(|p| (p, car_id)));
            if became_idle {
                outcome.became_idle.push(car_id);
            }
        }
        Ok(outcome)
    }

    /// Mutable cars together with read-only floors, for the strategy phase
    pub fn split_dispatch_mut(&mut self) -> (&mut [ElevatorCar], &[Floor]) {
        (&mut self.cars, &self.floors)
    }

    /// Restore the building to its construction state
    pub fn reset(&mut self) {
        for floor in &mut self.floors {
            floor.reset();
        }
        for car in &mut self.cars {
            car.reset();
        }
        self.next_passenger = 0;
    }
}
