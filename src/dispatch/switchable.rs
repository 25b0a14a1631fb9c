//! Switchable strategy composite
//!
//! Holds an ordered list of concrete strategies and delegates the whole
//! strategy contract to the active one. Switching invalidates whatever
//! private per-car state the previous strategy built up, so an actual
//! change triggers the incoming strategy's `on_activated` rebuild against
//! the shared hall queue — the single source of truth for unassigned
//! passengers. This is the interface a run-time policy selector (for
//! example a learning agent) drives.

use crate::building::ElevatorCar;
use crate::dispatch::{DispatchContext, HallCall, SchedulingAlgorithm};
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::CarId;
use std::collections::VecDeque;
use tracing::info;

/// Composite strategy with an active index
#[derive(Debug)]
pub struct SwitchableStrategy {
    strategies: Vec<Box<dyn SchedulingAlgorithm>>,
    active: usize,
}

impl SwitchableStrategy {
    /// Compose the given strategies; index 0 starts active
    pub fn new(strategies: Vec<Box<dyn SchedulingAlgorithm>>) -> SimulationResult<Self> {
        if strategies.is_empty() {
            return Err(SimulationError::DispatchError(
                "a switchable strategy needs at least one inner strategy".into(),
            ));
        }
        Ok(Self { strategies, active: 0 })
    }

    /// Wrap a single strategy
    pub fn single(strategy: Box<dyn SchedulingAlgorithm>) -> Self {
        Self { strategies: vec![strategy], active: 0 }
    }

    /// Number of composed strategies
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether the composite is empty (it never is after construction)
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Index of the active strategy
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Name of the active strategy
    pub fn active_name(&self) -> &'static str {
        self.strategies[self.active].name()
    }

    /// Make the strategy at `index` active
    ///
    /// Returns whether the active strategy actually changed. On a change
    /// the incoming strategy rebuilds its private state from `hall_queue`;
    /// switching to the already-active index is a no-op.
    pub fn switch_to(
        &mut self,
        index: usize,
        hall_queue: &VecDeque<HallCall>,
        cars: &[ElevatorCar],
    ) -> SimulationResult<bool> {
        if index >= self.strategies.len() {
            return Err(SimulationError::DispatchError(format!(
                "strategy index {index} out of range (have {})",
                self.strategies.len()
            )));
        }
        if index == self.active {
            return Ok(false);
        }
        self.active = index;
        info!(strategy = self.active_name(), pending = hall_queue.len(), "strategy switched");
        self.strategies[self.active].on_activated(hall_queue, cars);
        Ok(true)
    }
}

impl SchedulingAlgorithm for SwitchableStrategy {
    fn name(&self) -> &'static str {
        self.strategies[self.active].name()
    }

    fn on_passenger_arrived(&mut self, call: &HallCall, cars: &[ElevatorCar]) {
        self.strategies[self.active].on_passenger_arrived(call, cars);
    }

    fn on_update(&mut self, ctx: &mut DispatchContext<'_>) {
        self.strategies[self.active].on_update(ctx);
    }

    fn on_idle(&mut self, car: CarId, ctx: &mut DispatchContext<'_>) {
        self.strategies[self.active].on_idle(car, ctx);
    }

    fn on_activated(&mut self, hall_queue: &VecDeque<HallCall>, cars: &[ElevatorCar]) {
        self.strategies[self.active].on_activated(hall_queue, cars);
    }
}
