//! Longest-queue-first dispatch
//!
//! Calls are served in order of how crowded their origin floor is. For each
//! call the strategy ranks candidate cars: a car that can be stopped at the
//! call floor on its way past always beats one that would have to be
//! dispatched from idle, and within a category the nearest car wins, ties
//! going to the lowest car index. Exactly one car acts per call per tick.

use crate::building::ElevatorCar;
use crate::dispatch::{DispatchContext, HallCall, SchedulingAlgorithm};
use tracing::trace;

/// Candidate category for serving one call; stop candidates outrank
/// dispatch candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    /// Moving past the call floor in the right direction next boundary
    Stop,
    /// Idle somewhere else, free to be sent over
    Dispatch,
}

/// Longest-queue-first strategy
#[derive(Debug, Default)]
pub struct LongestQueueFirst;

impl LongestQueueFirst {
    /// Create the strategy
    pub fn new() -> Self {
        Self
    }

    fn classify(car: &ElevatorCar, call: &HallCall) -> Option<Candidate> {
        if !car.can_board(call.weight) {
            return None;
        }
        if car.is_moving()
            && car.direction() == Some(call.direction)
            && car.next_floor() == Some(call.floor)
        {
            return Some(Candidate::Stop);
        }
        if car.is_idle() && car.floor() != call.floor {
            return Some(Candidate::Dispatch);
        }
        None
    }
}

impl SchedulingAlgorithm for LongestQueueFirst {
    fn name(&self) -> &'static str {
        "longest-queue-first"
    }

    fn on_update(&mut self, ctx: &mut DispatchContext<'_>) {
        let DispatchContext { cars, floors, hall_queue, .. } = ctx;

        // Stable sort keeps FIFO order between equally crowded floors.
        let mut calls: Vec<HallCall> = hall_queue.iter().copied().collect();
        calls.sort_by_key(|call| {
            std::cmp::Reverse(floors.get(call.floor.index()).map_or(0, |f| f.waiting_count()))
        });

        for call in calls {
            let mut best: Option<(Candidate, usize, usize)> = None;
            for (index, car) in cars.iter().enumerate() {
                let Some(candidate) = Self::classify(car, &call) else {
                    continue;
                };
                let distance = car.floor().distance_to(call.floor);
                let beats = match best {
                    None => true,
                    Some((best_candidate, best_distance, _)) => {
                        (candidate == Candidate::Stop && best_candidate == Candidate::Dispatch)
                            || (candidate == best_candidate && distance < best_distance)
                    }
                };
                if beats {
                    best = Some((candidate, distance, index));
                }
            }

            let Some((candidate, _, index)) = best else {
                continue;
            };
            match candidate {
                Candidate::Stop => {
                    trace!(car = %cars[index].id(), floor = %call.floor, "lqf stop");
                    cars[index].stop_at_next_floor();
                }
                Candidate::Dispatch => {
                    trace!(car = %cars[index].id(), floor = %call.floor, "lqf dispatch");
                    cars[index].dispatch_to(call.floor);
                }
            }
        }
    }
}
