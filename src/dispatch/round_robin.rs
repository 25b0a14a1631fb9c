//! Round-robin dispatch
//!
//! Calls are assigned at arrival time, not at service time: each new call
//! goes into the next car's private FIFO in strict rotation. During the
//! update pass every idle car serves the head of its own queue. The
//! up-peak variant additionally sends an idle car with nothing assigned
//! back to the lobby, where the bulk of up-peak demand originates.
//!
//! Private queues are rebuilt from the shared hall queue whenever this
//! strategy becomes active, since assignments made by a predecessor
//! strategy mean nothing here.

use crate::building::ElevatorCar;
use crate::dispatch::{DispatchContext, HallCall, SchedulingAlgorithm};
use crate::types::{CarId, FloorId};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Round-robin call assignment with optional up-peak parking
#[derive(Debug)]
pub struct RoundRobin {
    counter: usize,
    queues: Vec<VecDeque<HallCall>>,
    park_at: Option<FloorId>,
}

impl RoundRobin {
    /// Plain round-robin over `num_cars` cars
    pub fn new(num_cars: usize) -> Self {
        Self { counter: 0, queues: vec![VecDeque::new(); num_cars], park_at: None }
    }

    /// Up-peak variant: idle cars with an empty queue return to the lobby
    pub fn up_peak(num_cars: usize, lobby: FloorId) -> Self {
        Self { park_at: Some(lobby), ..Self::new(num_cars) }
    }

    /// Calls currently assigned to each car, in assignment order
    pub fn assigned(&self, car: CarId) -> &VecDeque<HallCall> {
        &self.queues[car.index()]
    }

    fn assign(&mut self, call: HallCall) {
        let target = self.counter;
        self.counter = (self.counter + 1) % self.queues.len();
        trace!(car = target, passenger = %call.passenger, "round-robin assignment");
        self.queues[target].push_back(call);
    }
}

impl SchedulingAlgorithm for RoundRobin {
    fn name(&self) -> &'static str {
        if self.park_at.is_some() {
            "up-peak-round-robin"
        } else {
            "round-robin"
        }
    }

    fn on_passenger_arrived(&mut self, call: &HallCall, _cars: &[ElevatorCar]) {
        self.assign(*call);
    }

    fn on_update(&mut self, ctx: &mut DispatchContext<'_>) {
        for (index, car) in ctx.cars.iter_mut().enumerate() {
            if !car.is_idle() {
                continue;
            }

            let mut dispatched = false;
            while let Some(call) = self.queues[index].pop_front() {
                // Stale entry: the passenger already boarded elsewhere.
                if !ctx.hall_queue.iter().any(|c| c.passenger == call.passenger) {
                    continue;
                }
                // At the call floor already: the floor matching pass boards.
                if call.floor != car.floor() {
                    car.dispatch_to(call.floor);
                }
                dispatched = true;
                break;
            }

            if !dispatched {
                if let Some(lobby) = self.park_at {
                    if car.floor() != lobby {
                        trace!(car = %car.id(), "up-peak parking at the lobby");
                        car.dispatch_to(lobby);
                    }
                }
            }
        }
    }

    fn on_activated(&mut self, hall_queue: &VecDeque<HallCall>, _cars: &[ElevatorCar]) {
        for queue in &mut self.queues {
            queue.clear();
        }
        self.counter = 0;
        for call in hall_queue {
            self.assign(*call);
        }
        debug!(pending = hall_queue.len(), "round-robin queues rebuilt");
    }
}
