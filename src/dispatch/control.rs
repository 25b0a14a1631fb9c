//! Control system: the shared hall-call queue plus event routing
//!
//! The control system makes no dispatch decisions itself. It owns the
//! global pending hall-call FIFO and the active strategy, forwards floor
//! arrivals and car idle events to the strategy, and retires a call the
//! moment a car claims its passenger — which is what guarantees a queued
//! passenger is claimed by at most one car.

use crate::building::{Building, ElevatorCar};
use crate::dispatch::{DispatchContext, HallCall, SchedulingAlgorithm, SwitchableStrategy};
use crate::simulation::{SimTime, SimulationResult};
use crate::types::{CarId, PassengerId};
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

/// Hall-call routing between the building and the active strategy
#[derive(Debug)]
pub struct ControlSystem {
    hall_queue: VecDeque<HallCall>,
    strategy: SwitchableStrategy,
}

impl ControlSystem {
    /// Create a control system driving the given strategy composite
    pub fn new(strategy: SwitchableStrategy) -> Self {
        Self { hall_queue: VecDeque::new(), strategy }
    }

    /// Read-only view of the pending hall-call queue, oldest first
    ///
    /// A call stays in this queue from registration until a car claims the
    /// passenger, so the queue is exactly the set of unassigned passengers.
    pub fn hall_queue(&self) -> &VecDeque<HallCall> {
        &self.hall_queue
    }

    /// Number of pending hall calls
    pub fn pending_calls(&self) -> usize {
        self.hall_queue.len()
    }

    /// The strategy composite
    pub fn strategy(&self) -> &SwitchableStrategy {
        &self.strategy
    }

    /// Name of the active strategy
    pub fn active_strategy_name(&self) -> &'static str {
        self.strategy.active_name()
    }

    /// Register a new hall call and notify the strategy
    pub fn handle_hall_call(&mut self, call: HallCall, cars: &[ElevatorCar]) {
        trace!(passenger = %call.passenger, floor = %call.floor, "hall call pending");
        self.hall_queue.push_back(call);
        self.strategy.on_passenger_arrived(&call, cars);
    }

    /// Retire a hall call because a car claimed its passenger
    pub fn hall_call_handled(&mut self, passenger: PassengerId) {
        match self.hall_queue.iter().position(|call| call.passenger == passenger) {
            Some(position) => {
                self.hall_queue.remove(position);
                trace!(passenger = %passenger, "hall call handled");
            }
            None => {
                warn!(passenger = %passenger, "handled a call that was not pending");
            }
        }
    }

    /// Forward a car idle event to the strategy
    pub fn elevator_idle(&mut self, car: CarId, building: &mut Building, now: SimTime) {
        let (cars, floors) = building.split_dispatch_mut();
        let mut ctx = DispatchContext { cars, floors, hall_queue: &self.hall_queue, now };
        self.strategy.on_idle(car, &mut ctx);
    }

    /// Run the strategy's per-tick decision pass
    pub fn update(&mut self, building: &mut Building, now: SimTime) {
        let (cars, floors) = building.split_dispatch_mut();
        let mut ctx = DispatchContext { cars, floors, hall_queue: &self.hall_queue, now };
        self.strategy.on_update(&mut ctx);
    }

    /// Switch the active strategy by index
    ///
    /// Returns whether the active strategy actually changed. The incoming
    /// strategy rebuilds its private queues from the shared hall queue, so
    /// no pending passenger is lost or duplicated by the switch.
    pub fn switch_strategy(
        &mut self,
        index: usize,
        cars: &[ElevatorCar],
    ) -> SimulationResult<bool> {
        self.strategy.switch_to(index, &self.hall_queue, cars)
    }

    /// Drop all pending calls and reset the active strategy's private state
    pub fn reset(&mut self, cars: &[ElevatorCar]) {
        self.hall_queue.clear();
        self.strategy.on_activated(&self.hall_queue, cars);
        debug!("control system reset");
    }
}
