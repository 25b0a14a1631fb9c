//! Collective control: the baseline dispatch strategy
//!
//! Every pending call is broadcast: any idle car anywhere is sent toward
//! it, and any car already moving the call's way is stopped at the call
//! floor when that floor is its next boundary. Simple, greedy, and the
//! yardstick the other strategies are measured against.

use crate::dispatch::{DispatchContext, SchedulingAlgorithm};
use tracing::trace;

/// Baseline strategy: dispatch everything, stop whenever passing by
#[derive(Debug, Default)]
pub struct CollectiveControl;

impl CollectiveControl {
    /// Create the baseline strategy
    pub fn new() -> Self {
        Self
    }
}

impl SchedulingAlgorithm for CollectiveControl {
    fn name(&self) -> &'static str {
        "collective-control"
    }

    fn on_update(&mut self, ctx: &mut DispatchContext<'_>) {
        let DispatchContext { cars, hall_queue, .. } = ctx;
        for call in hall_queue.iter() {
            for car in cars.iter_mut() {
                if car.is_idle() && car.floor() != call.floor {
                    trace!(car = %car.id(), floor = %call.floor, "collective dispatch");
                    car.dispatch_to(call.floor);
                } else if car.direction() == Some(call.direction)
                    && car.next_floor() == Some(call.floor)
                {
                    trace!(car = %car.id(), floor = %call.floor, "collective stop");
                    car.stop_at_next_floor();
                }
            }
        }
    }
}
