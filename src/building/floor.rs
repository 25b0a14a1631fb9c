//! Floor state: hall queue and arrival generation
//!
//! Each floor owns the FIFO queue of passengers waiting in its hallway and
//! the stochastic process that creates them. Per tick a floor first tries
//! to match waiting passengers against cars standing at the floor, then
//! rolls its arrival countdown against the current traffic interval.

use crate::building::ElevatorCar;
use crate::dispatch::HallCall;
use crate::passenger::Passenger;
use crate::simulation::{SimTime, SimulationResult};
use crate::traffic::{TrafficProfile, WeightedSampler};
use crate::types::{CarId, FloorId, PassengerId};
use rand::Rng;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// One floor of the building
#[derive(Debug)]
pub struct Floor {
    id: FloorId,
    residents: u32,
    queue: VecDeque<Passenger>,
    /// Expected arrivals per second under the current traffic interval
    arrival_rate: f64,
    /// Countdown to the next stochastic arrival; `None` until a rate exists
    next_arrival_in: Option<SimTime>,
    destination_sampler: WeightedSampler<FloorId>,
    current_interval: Option<usize>,
}

impl Floor {
    /// Create a floor housing `residents` people
    pub fn new(id: FloorId, residents: u32) -> Self {
        Self {
            id,
            residents,
            queue: VecDeque::new(),
            arrival_rate: 0.0,
            next_arrival_in: None,
            destination_sampler: WeightedSampler::new(),
            current_interval: None,
        }
    }

    /// This floor's identifier
    pub fn id(&self) -> FloorId {
        self.id
    }

    /// Residents living on this floor (the floor's arrival-rate weight)
    pub fn residents(&self) -> u32 {
        self.residents
    }

    /// Passengers currently waiting, in arrival order
    pub fn waiting(&self) -> impl Iterator<Item = &Passenger> {
        self.queue.iter()
    }

    /// Number of passengers currently waiting
    pub fn waiting_count(&self) -> usize {
        self.queue.len()
    }

    /// Whether anyone is waiting here
    pub fn has_waiting(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Expected arrivals per second under the current traffic interval
    pub fn arrival_rate(&self) -> f64 {
        self.arrival_rate
    }

    /// Enqueue an externally created passenger and produce its hall call
    ///
    /// Used by the simulator's injection interface; the stochastic arrival
    /// process goes through the same path internally.
    pub fn push_passenger(&mut self, passenger: Passenger) -> HallCall {
        let call = HallCall::new(&passenger);
        trace!(floor = %self.id, passenger = %passenger.id(), "hall call registered");
        self.queue.push_back(passenger);
        call
    }

    /// Match waiting passengers against cars standing at this floor
    ///
    /// A car qualifies when it is at this floor with doors able to open,
    /// has spare capacity, and its direction of service is unset or matches
    /// the passenger's. The pass iterates over a snapshot of the queue
    /// taken up front, so boarding never mutates a collection mid-iteration.
    /// Returns the `(passenger, car)` pairs that boarded.
    pub fn match_waiting(
        &mut self,
        cars: &mut [ElevatorCar],
        now: SimTime,
    ) -> SimulationResult<Vec<(PassengerId, CarId)>> {
        if self.queue.is_empty() {
            return Ok(Vec::new());
        }

        let snapshot: Vec<PassengerId> = self.queue.iter().map(Passenger::id).collect();
        let mut boarded = Vec::new();

        for passenger_id in snapshot {
            let Some(position) = self.queue.iter().position(|p| p.id() == passenger_id) else {
                continue;
            };
            let direction = self.queue[position].direction();
            let weight = self.queue[position].weight();

            let Some(car) = cars.iter_mut().find(|car| {
                car.is_available_at(self.id)
                    && car.can_board(weight)
                    && car.accepts_direction(direction)
            }) else {
                continue;
            };

            let Some(mut passenger) = self.queue.remove(position) else {
                continue;
            };
            passenger.record_boarding(now)?;
            let car_id = car.id();
            car.board(passenger)?;
            boarded.push((passenger_id, car_id));
        }

        if !boarded.is_empty() {
            debug!(floor = %self.id, count = boarded.len(), "passengers boarded");
        }
        Ok(boarded)
    }

    /// Roll the stochastic arrival process forward by `dt`
    ///
    /// Re-derives the arrival rate and destination distribution whenever
    /// the traffic interval has rolled over, then decrements the countdown;
    /// every expiry creates one passenger whose destination is drawn from
    /// the floor's sampler and whose next gap is exponentially distributed
    /// with the current rate. Generation ceases once `now` passes
    /// `horizon`.
    #[allow(clippy::too_many_arguments)]
    pub fn roll_arrivals<R: Rng + ?Sized>(
        &mut self,
        profile: &TrafficProfile,
        residents: &[u32],
        lobby: FloorId,
        now: SimTime,
        dt: SimTime,
        horizon: SimTime,
        passenger_weight: u32,
        next_passenger: &mut u64,
        rng: &mut R,
    ) -> SimulationResult<Vec<HallCall>> {
        if now >= horizon {
            return Ok(Vec::new());
        }

        self.refresh_interval(profile, residents, lobby, now);
        if self.arrival_rate <= 0.0 {
            return Ok(Vec::new());
        }
        let mut countdown = match self.next_arrival_in {
            Some(value) => value,
            None => Self::exponential_gap(self.arrival_rate, rng),
        };

        let mut calls = Vec::new();
        countdown -= dt;
        while countdown <= 0.0 {
            let destination = *self.destination_sampler.sample(rng)?;
            let id = PassengerId(*next_passenger);
            *next_passenger += 1;
            let passenger = Passenger::new(id, self.id, destination, passenger_weight, now)?;
            debug!(
                floor = %self.id,
                passenger = %id,
                destination = %destination,
                "passenger arrived"
            );
            calls.push(self.push_passenger(passenger));
            countdown += Self::exponential_gap(self.arrival_rate, rng);
        }
        self.next_arrival_in = Some(countdown);
        Ok(calls)
    }

    /// Forget queued passengers and the arrival state
    pub fn reset(&mut self) {
        self.queue.clear();
        self.arrival_rate = 0.0;
        self.next_arrival_in = None;
        self.destination_sampler.clear();
        self.current_interval = None;
    }

    fn refresh_interval(
        &mut self,
        profile: &TrafficProfile,
        residents: &[u32],
        lobby: FloorId,
        now: SimTime,
    ) {
        let index = profile.interval_index(now);
        if self.current_interval == Some(index) {
            return;
        }
        self.current_interval = Some(index);
        self.arrival_rate =
            profile.average_arrivals_per_second(now, residents, self.id.index(), lobby.index());

        self.destination_sampler.clear();
        for to in 0..residents.len() {
            if to == self.id.index() {
                continue;
            }
            let probability = profile.destination_probability(
                now,
                residents,
                self.id.index(),
                to,
                lobby.index(),
            );
            self.destination_sampler.register(probability, FloorId(to));
        }
        trace!(
            floor = %self.id,
            interval = index,
            rate_per_second = self.arrival_rate,
            "traffic interval rolled over"
        );
    }

    fn exponential_gap<R: Rng + ?Sized>(rate: f64, rng: &mut R) -> SimTime {
        let draw: f64 = rng.gen();
        -(1.0 - draw).ln() / rate
    }
}
