//! Simulator: the composition root and tick loop
//!
//! Composes the clock, the building, the control system, the statistics
//! aggregator, and the seeded random source, and drives them through the
//! fixed per-tick phase order: floor pickups and arrivals, car motion,
//! idle events, then the strategy's decision pass — after which the clock
//! steps. Identical configuration, strategy, and seed reproduce an
//! identical trip log and identical statistics.

use crate::building::Building;
use crate::dispatch::{ControlSystem, SwitchableStrategy};
use crate::passenger::Passenger;
use crate::simulation::{
    Clock, SimTime, SimulationError, SimulationResult, SimulationStats, StatsInterval,
};
use crate::types::{CarId, FloorId, PassengerId, SimulationConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Grace period past the arrival horizon before a run that refuses to
/// drain is aborted
const DRAIN_GRACE_SECONDS: f64 = 86_400.0;

/// One completed trip, the unit of the reproducible event trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    /// The passenger
    pub passenger: PassengerId,
    /// Floor the trip started at
    pub arrival_floor: FloorId,
    /// Floor the trip ended at
    pub destination_floor: FloorId,
    /// Capacity units the passenger occupied
    pub weight: u32,
    /// Car that delivered the passenger
    pub car: CarId,
    /// When the passenger appeared
    pub arrived_at: SimTime,
    /// When the passenger boarded
    pub boarded_at: SimTime,
    /// When the passenger exited
    pub exited_at: SimTime,
}

impl TripRecord {
    fn new(passenger: &Passenger, car: CarId) -> Self {
        Self {
            passenger: passenger.id(),
            arrival_floor: passenger.arrival_floor(),
            destination_floor: passenger.destination_floor(),
            weight: passenger.weight(),
            car,
            arrived_at: passenger.arrived_at(),
            boarded_at: passenger.boarded_at().unwrap_or_default(),
            exited_at: passenger.exited_at().unwrap_or_default(),
        }
    }
}

/// The complete simulation
#[derive(Debug)]
pub struct Simulator {
    config: SimulationConfig,
    clock: Clock,
    building: Building,
    control: ControlSystem,
    stats: SimulationStats,
    rng: StdRng,
    trip_log: Vec<TripRecord>,
}

impl Simulator {
    /// Build a simulator from a validated scenario configuration
    #[instrument(skip(config), fields(num_floors = config.num_floors(), num_cars = config.num_cars))]
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;
        let building = Building::new(config.num_cars, config.car, config.residents.clone())?;
        let strategies = config
            .strategies
            .iter()
            .map(|kind| kind.build(config.num_floors(), config.num_cars, building.lobby()))
            .collect::<SimulationResult<Vec<_>>>()?;
        let control = ControlSystem::new(SwitchableStrategy::new(strategies)?);
        let stats = SimulationStats::new(config.num_cars);
        let rng = Self::rng_from(config.seed);

        info!(
            strategy = control.active_strategy_name(),
            seed = ?config.seed,
            "simulator ready"
        );
        Ok(Self {
            config,
            clock: Clock::new(),
            building,
            control,
            stats,
            rng,
            trip_log: Vec::new(),
        })
    }

    /// The scenario configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The simulated clock
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// The building
    pub fn building(&self) -> &Building {
        &self.building
    }

    /// The control system
    pub fn control_system(&self) -> &ControlSystem {
        &self.control
    }

    /// The statistics aggregator
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Completed trips in completion order: the reproducible event trace
    pub fn trip_log(&self) -> &[TripRecord] {
        &self.trip_log
    }

    /// Advance the simulation by `dt` seconds of virtual time
    ///
    /// Phase order within the tick is fixed: every floor matches pickups
    /// and rolls arrivals, every car advances, idle events are delivered,
    /// and the strategy runs its decision pass against post-motion state.
    pub fn step(&mut self, dt: SimTime) -> SimulationResult<()> {
        if !(dt > 0.0) {
            return Err(SimulationError::TimeError(format!(
                "step requires a positive dt, got {dt}"
            )));
        }
        let now = self.clock.now();

        let floor_phase = self.building.update_floors(
            &self.config.traffic,
            now,
            dt,
            self.config.arrival_horizon,
            self.config.passenger_weight,
            &mut self.rng,
        )?;
        for (passenger, _car) in &floor_phase.boarded {
            self.control.hall_call_handled(*passenger);
        }
        for call in floor_phase.new_calls {
            self.stats.record_generated(call.registered_at);
            self.control.handle_hall_call(call, self.building.cars());
        }

        let car_phase = self.building.update_cars(now, dt)?;
        for (passenger, car) in car_phase.exited {
            self.stats.record_served(&passenger, car, self.building.lobby());
            self.trip_log.push(TripRecord::new(&passenger, car));
        }
        for car in car_phase.became_idle {
            self.control.elevator_idle(car, &mut self.building, now);
        }
        self.control.update(&mut self.building, now);

        self.clock.step(dt);
        Ok(())
    }

    /// Whether arrivals are exhausted and every passenger has been served
    pub fn is_finished(&self) -> bool {
        self.clock.now() >= self.config.arrival_horizon
            && self.building.is_drained()
            && self.control.pending_calls() == 0
    }

    /// Advance one configured tick; `false` once the run is finished
    pub fn advance_one_step(&mut self) -> SimulationResult<bool> {
        if self.is_finished() {
            return Ok(false);
        }
        self.step(self.config.tick)?;
        Ok(true)
    }

    /// Run until arrivals are exhausted and the building drains
    ///
    /// Aborts with a time error if the building has not drained a full day
    /// past the arrival horizon, which indicates stuck dispatch rather
    /// than heavy traffic.
    pub fn run_to_completion(&mut self) -> SimulationResult<()> {
        let cutoff = self.config.arrival_horizon + DRAIN_GRACE_SECONDS;
        while self.advance_one_step()? {
            if self.clock.now() > cutoff {
                return Err(SimulationError::TimeError(format!(
                    "building failed to drain by {} ({} waiting, {} aboard)",
                    self.clock.format_elapsed(),
                    self.building.waiting_count(),
                    self.building.aboard_count(),
                )));
            }
        }
        info!(
            elapsed = %self.clock.format_elapsed(),
            served = self.stats.run().served,
            "run complete"
        );
        Ok(())
    }

    /// Restore the simulation to time zero
    ///
    /// A `seed` reseeds the random source; otherwise the configured seed
    /// (or entropy) is used again. The active strategy selection survives
    /// the reset; its private state does not.
    pub fn reset(&mut self, seed: Option<u64>) {
        self.building.reset();
        self.control.reset(self.building.cars());
        self.stats.reset();
        self.clock.reset();
        self.trip_log.clear();
        self.rng = Self::rng_from(seed.or(self.config.seed));
        debug!(seed = ?seed, "simulator reset");
    }

    /// Create a passenger at `arrival` headed for `destination` right now
    ///
    /// The test and collaborator surface for driving deterministic
    /// scenarios without the stochastic arrival process.
    pub fn inject_passenger(
        &mut self,
        arrival: FloorId,
        destination: FloorId,
        weight: u32,
    ) -> SimulationResult<PassengerId> {
        let floors = self.building.num_floors();
        if arrival.index() >= floors || destination.index() >= floors {
            return Err(SimulationError::PassengerError(format!(
                "floors {arrival} -> {destination} outside a {floors}-floor building"
            )));
        }
        let call = self.building.inject_passenger(arrival, destination, weight, self.clock.now())?;
        self.stats.record_generated(call.registered_at);
        self.control.handle_hall_call(call, self.building.cars());
        Ok(call.passenger)
    }

    /// Switch the active dispatch strategy by its configured index
    pub fn switch_strategy(&mut self, index: usize) -> SimulationResult<bool> {
        self.control.switch_strategy(index, self.building.cars())
    }

    /// Finish the poll interval and start a new one at the current time
    pub fn reset_poll_interval(&mut self) -> StatsInterval {
        self.stats.reset_poll_interval(self.clock.now())
    }

    fn rng_from(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
