//! Group-control dispatch: hall calls, the strategy contract, and the
//! five concrete scheduling strategies
//!
//! The control system owns the shared hall-call queue and routes events to
//! the active [`SchedulingAlgorithm`]. Strategies never own passengers:
//! they see copyable [`HallCall`] records and command cars through a
//! [`DispatchContext`]. The hall queue holds a call from the moment its
//! floor registers it until a car claims the passenger, which makes it the
//! single source of truth for "still unassigned" when strategies are
//! switched mid-run.

pub mod collective;
pub mod control;
pub mod longest_queue;
pub mod round_robin;
pub mod switchable;
pub mod three_passage;
pub mod zoning;

pub use collective::CollectiveControl;
pub use control::ControlSystem;
pub use longest_queue::LongestQueueFirst;
pub use round_robin::RoundRobin;
pub use switchable::SwitchableStrategy;
pub use three_passage::{Passage, ThreePassage};
pub use zoning::Zoning;

use crate::building::{ElevatorCar, Floor};
use crate::passenger::Passenger;
use crate::simulation::{SimTime, SimulationResult};
use crate::types::{CarId, Direction, FloorId, PassengerId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A pending pickup request: one waiting passenger, seen from the
/// dispatcher's side
///
/// Calls are plain copyable records; the passenger itself stays owned by
/// its floor's queue until a car boards it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HallCall {
    /// The waiting passenger
    pub passenger: PassengerId,
    /// Floor the pickup is requested at
    pub floor: FloorId,
    /// Direction of service the passenger needs
    pub direction: Direction,
    /// Capacity units the passenger will occupy
    pub weight: u32,
    /// Simulated time the call was registered
    pub registered_at: SimTime,
}

impl HallCall {
    /// Build the call record for a waiting passenger
    pub fn new(passenger: &Passenger) -> Self {
        Self {
            passenger: passenger.id(),
            floor: passenger.arrival_floor(),
            direction: passenger.direction(),
            weight: passenger.weight(),
            registered_at: passenger.arrived_at(),
        }
    }
}

/// Everything a strategy may read and command during its update
#[derive(Debug)]
pub struct DispatchContext<'a> {
    /// The car bank; strategies command cars through this
    pub cars: &'a mut [ElevatorCar],
    /// Read-only floor state (queue lengths for heuristics)
    pub floors: &'a [Floor],
    /// The shared pending hall-call queue, oldest first
    pub hall_queue: &'a VecDeque<HallCall>,
    /// Current simulated time
    pub now: SimTime,
}

impl DispatchContext<'_> {
    /// Whether a passenger is still waiting for a car
    pub fn is_pending(&self, passenger: PassengerId) -> bool {
        self.hall_queue.iter().any(|call| call.passenger == passenger)
    }
}

/// The dispatch strategy contract
///
/// `on_update` runs once per tick after car motion, so a strategy always
/// sees post-motion car state. `on_activated` is invoked when a
/// [`SwitchableStrategy`] makes this strategy active; implementations with
/// private per-car queues must rebuild them from the shared hall queue
/// there, since anything assigned before the switch is stale.
pub trait SchedulingAlgorithm: std::fmt::Debug {
    /// Human-readable strategy name for logs and statistics
    fn name(&self) -> &'static str;

    /// A new hall call was registered
    fn on_passenger_arrived(&mut self, call: &HallCall, cars: &[ElevatorCar]) {
        let _ = (call, cars);
    }

    /// Per-tick decision pass, after all car motion
    fn on_update(&mut self, ctx: &mut DispatchContext<'_>);

    /// A car finished its work and went idle this tick
    fn on_idle(&mut self, car: CarId, ctx: &mut DispatchContext<'_>) {
        let _ = (car, ctx);
    }

    /// This strategy became the active one; rebuild private state from the
    /// shared hall queue
    fn on_activated(&mut self, hall_queue: &VecDeque<HallCall>, cars: &[ElevatorCar]) {
        let _ = (hall_queue, cars);
    }
}

/// Configuration-level selector for a dispatch strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyKind {
    /// Baseline collective control
    CollectiveControl,
    /// Longest-queue-first candidate selection
    LongestQueueFirst,
    /// Round-robin call assignment
    RoundRobin,
    /// Round-robin with idle cars parked at the lobby
    UpPeakRoundRobin,
    /// Three-passage classification
    ThreePassage,
    /// Zoned floor/car partitioning
    Zoning {
        /// Number of contiguous zones to partition the building into
        num_zones: usize,
    },
}

impl StrategyKind {
    /// Build the strategy for a building of the given shape
    pub fn build(
        self,
        num_floors: usize,
        num_cars: usize,
        lobby: FloorId,
    ) -> SimulationResult<Box<dyn SchedulingAlgorithm>> {
        Ok(match self {
            StrategyKind::CollectiveControl => Box::new(CollectiveControl::new()),
            StrategyKind::LongestQueueFirst => Box::new(LongestQueueFirst::new()),
            StrategyKind::RoundRobin => Box::new(RoundRobin::new(num_cars)),
            StrategyKind::UpPeakRoundRobin => Box::new(RoundRobin::up_peak(num_cars, lobby)),
            StrategyKind::ThreePassage => Box::new(ThreePassage::new(num_cars, num_floors)),
            StrategyKind::Zoning { num_zones } => {
                Box::new(Zoning::new(num_floors, num_cars, num_zones)?)
            }
        })
    }
}
