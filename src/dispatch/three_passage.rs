//! Three-passage dispatch
//!
//! Every call is classified against every car by how favorably the car is
//! positioned: a car already sweeping toward the call in the call's
//! direction reaches it in its first passage (P1); a car that must reverse
//! once serves it in its second (P2); a car that has already passed the
//! floor in the call's direction needs a full sweep and reversal (P3).
//! A car standing at the call floor needs no passage at all. Calls are
//! assigned at arrival time to the car with the best classification and
//! parked in that car's private queue.

use crate::building::ElevatorCar;
use crate::dispatch::{DispatchContext, HallCall, SchedulingAlgorithm};
use crate::types::Direction;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// How favorably a car is positioned relative to a hall call; lower is
/// better
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Passage {
    /// Stationary at the call floor: no travel needed
    AtFloor,
    /// Reached while already sweeping in the call's direction
    P1,
    /// Reached after one reversal
    P2,
    /// Passed already in the call's direction: full sweep plus reversal
    P3,
}

/// Three-passage strategy with private per-car call queues
#[derive(Debug)]
pub struct ThreePassage {
    queues: Vec<VecDeque<HallCall>>,
    num_floors: usize,
}

impl ThreePassage {
    /// Create the strategy for a bank of `num_cars` cars in a building of
    /// `num_floors` floors
    pub fn new(num_cars: usize, num_floors: usize) -> Self {
        Self { queues: vec![VecDeque::new(); num_cars], num_floors }
    }

    /// Classify how the car is positioned relative to the call
    pub fn classify(car: &ElevatorCar, call: &HallCall) -> Passage {
        if car.is_available_at(call.floor) {
            return Passage::AtFloor;
        }
        let Some(direction) = car.direction() else {
            // Idle away from the call floor: a direct first-passage trip.
            return Passage::P1;
        };

        let ahead = match direction {
            Direction::Up => call.floor.is_above(car.floor()),
            Direction::Down => call.floor.is_below(car.floor()),
        };
        if call.direction == direction && ahead {
            Passage::P1
        } else if call.direction != direction {
            Passage::P2
        } else {
            Passage::P3
        }
    }

    /// Heuristic estimate of the stop time a car accumulates before
    /// reaching `call.floor`
    ///
    /// Counts the mandatory stops between the car and the call (committed
    /// car calls plus same-direction hall calls already assigned to the
    /// car) and adds a pro-rated extra-stop term: the chance of one more
    /// unplanned stop is modeled as `exp(-n/f)` with `n` the car's
    /// same-direction assigned calls and `f` the floors remaining in the
    /// current sweep direction. Used as a scoring diagnostic during
    /// assignment; the passage classification alone decides it.
    pub fn estimate_stop_time(&self, car_index: usize, car: &ElevatorCar, call: &HallCall) -> f64 {
        if car.floor() == call.floor {
            return 0.0;
        }
        let travel = Direction::of_travel(car.floor(), call.floor);
        let between = |floor: crate::types::FloorId| {
            (floor.is_above(car.floor()) && floor.is_below(call.floor))
                || (floor.is_below(car.floor()) && floor.is_above(call.floor))
        };

        let car_calls = car
            .manifest()
            .iter()
            .filter(|p| between(p.destination_floor()))
            .count();
        let hall_calls = self.queues[car_index]
            .iter()
            .filter(|c| c.direction == travel && between(c.floor))
            .count();
        let mandatory = (car_calls + hall_calls) as f64;

        let same_direction = self.queues[car_index]
            .iter()
            .filter(|c| c.direction == travel)
            .count();
        let floors_remaining = match travel {
            Direction::Up => self.num_floors.saturating_sub(car.floor().index() + 1),
            Direction::Down => car.floor().index(),
        };
        let extra_stop_probability = if floors_remaining == 0 {
            0.0
        } else {
            (-(same_direction as f64) / floors_remaining as f64).exp()
        };

        let config = car.config();
        let dwell = config.stop_time + config.door_time + config.start_time;
        (mandatory + extra_stop_probability) * dwell
    }
}

impl SchedulingAlgorithm for ThreePassage {
    fn name(&self) -> &'static str {
        "three-passage"
    }

    fn on_passenger_arrived(&mut self, call: &HallCall, cars: &[ElevatorCar]) {
        let mut best: Option<(Passage, usize)> = None;
        for (index, car) in cars.iter().enumerate() {
            let passage = Self::classify(car, call);
            if best.map_or(true, |(best_passage, _)| passage < best_passage) {
                best = Some((passage, index));
            }
        }
        let Some((passage, index)) = best else {
            return;
        };
        debug!(
            car = index,
            passenger = %call.passenger,
            ?passage,
            stop_time_score = self.estimate_stop_time(index, &cars[index], call),
            "three-passage assignment"
        );
        self.queues[index].push_back(*call);
    }

    fn on_update(&mut self, ctx: &mut DispatchContext<'_>) {
        // Drop calls whose passengers a car has already claimed.
        for queue in &mut self.queues {
            queue.retain(|call| {
                ctx.hall_queue.iter().any(|pending| pending.passenger == call.passenger)
            });
        }

        for (index, car) in ctx.cars.iter_mut().enumerate() {
            if car.is_moving() {
                let Some(boundary) = car.next_floor() else {
                    continue;
                };
                let first_passage_here = self.queues[index].iter().any(|call| {
                    call.floor == boundary && Self::classify(car, call) == Passage::P1
                });
                if first_passage_here {
                    trace!(car = %car.id(), floor = %boundary, "three-passage stop");
                    car.stop_at_next_floor();
                }
            } else if car.is_idle() {
                if let Some(call) = self.queues[index].pop_front() {
                    if call.floor != car.floor() {
                        trace!(car = %car.id(), floor = %call.floor, "three-passage dispatch");
                        car.dispatch_to(call.floor);
                    }
                }
            }
        }
    }

    fn on_activated(&mut self, hall_queue: &VecDeque<HallCall>, cars: &[ElevatorCar]) {
        for queue in &mut self.queues {
            queue.clear();
        }
        for call in hall_queue {
            self.on_passenger_arrived(call, cars);
        }
        debug!(pending = hall_queue.len(), "three-passage queues rebuilt");
    }
}
