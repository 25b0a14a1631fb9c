//! Zoned dispatch
//!
//! The building is cut into contiguous, non-overlapping floor zones and the
//! car bank into matching index ranges; a call is only ever served by the
//! cars of the zone containing its arrival floor. Idle cars seek pending
//! work inside their zone or park at the zone's middle floor.

use crate::dispatch::{DispatchContext, SchedulingAlgorithm};
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{CarId, FloorId};
use tracing::{trace, warn};

/// One contiguous zone: a floor range and the cars that serve it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    /// First floor of the zone
    pub floor_start: usize,
    /// One past the last floor of the zone
    pub floor_end: usize,
    /// First car index serving the zone
    pub car_start: usize,
    /// One past the last car index serving the zone
    pub car_end: usize,
}

impl Zone {
    /// Whether the zone's floor range covers `floor`
    pub fn covers_floor(&self, floor: FloorId) -> bool {
        (self.floor_start..self.floor_end).contains(&floor.index())
    }

    /// Whether the zone's car range covers `car`
    pub fn covers_car(&self, car: CarId) -> bool {
        (self.car_start..self.car_end).contains(&car.index())
    }

    /// The parking floor at the middle of the zone
    pub fn middle_floor(&self) -> FloorId {
        FloorId(self.floor_start + (self.floor_end - self.floor_start) / 2)
    }
}

/// Zoning strategy: partitioned floors, partitioned cars
#[derive(Debug)]
pub struct Zoning {
    zones: Vec<Zone>,
}

impl Zoning {
    /// Partition `num_floors` floors and `num_cars` cars into `num_zones`
    /// contiguous zones
    ///
    /// Remainder floors spill one at a time into the earliest zones, so 10
    /// floors over 3 zones gives sizes {4, 3, 3}. Cars are split by the
    /// index range `[zone * cars_per_zone, (zone + 1) * cars_per_zone)`;
    /// with a non-divisible car count the trailing remainder cars serve no
    /// zone, which is reported once at construction.
    pub fn new(num_floors: usize, num_cars: usize, num_zones: usize) -> SimulationResult<Self> {
        if num_zones == 0 || num_zones > num_floors {
            return Err(SimulationError::DispatchError(format!(
                "cannot split {num_floors} floors into {num_zones} zones"
            )));
        }
        let cars_per_zone = num_cars / num_zones;
        if cars_per_zone == 0 {
            return Err(SimulationError::DispatchError(format!(
                "{num_cars} cars cannot serve {num_zones} zones"
            )));
        }
        if num_cars % num_zones != 0 {
            warn!(
                unassigned = num_cars % num_zones,
                "car count does not divide evenly; trailing cars serve no zone"
            );
        }

        let floors_per_zone = num_floors / num_zones;
        let mut spillover = num_floors % num_zones;
        let mut floor_start = 0;
        let mut zones = Vec::with_capacity(num_zones);
        for index in 0..num_zones {
            let mut size = floors_per_zone;
            if spillover > 0 {
                size += 1;
                spillover -= 1;
            }
            zones.push(Zone {
                floor_start,
                floor_end: floor_start + size,
                car_start: index * cars_per_zone,
                car_end: (index + 1) * cars_per_zone,
            });
            floor_start += size;
        }
        Ok(Self { zones })
    }

    /// The zone partition
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Zone containing the given floor
    pub fn zone_of_floor(&self, floor: FloorId) -> &Zone {
        self.zones
            .iter()
            .find(|zone| zone.covers_floor(floor))
            .expect("zones cover every floor")
    }

    /// Zone served by the given car, if the car is assigned to one
    pub fn zone_of_car(&self, car: CarId) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.covers_car(car))
    }
}

impl SchedulingAlgorithm for Zoning {
    fn name(&self) -> &'static str {
        "zoning"
    }

    fn on_update(&mut self, ctx: &mut DispatchContext<'_>) {
        let DispatchContext { cars, hall_queue, .. } = ctx;

        for call in hall_queue.iter() {
            let zone = self.zone_of_floor(call.floor);
            let zone_end = zone.car_end.min(cars.len());
            let zone_cars = &mut cars[zone.car_start..zone_end];

            // A car about to pass the call floor beats waking an idle one.
            if let Some(car) = zone_cars
                .iter_mut()
                .find(|car| car.next_floor() == Some(call.floor))
            {
                trace!(car = %car.id(), floor = %call.floor, "zoning stop");
                car.stop_at_next_floor();
                continue;
            }
            if let Some(car) = zone_cars
                .iter_mut()
                .find(|car| car.is_idle() && car.can_board(call.weight) && car.floor() != call.floor)
            {
                trace!(car = %car.id(), floor = %call.floor, "zoning dispatch");
                car.dispatch_to(call.floor);
            }
        }
    }

    fn on_idle(&mut self, car: CarId, ctx: &mut DispatchContext<'_>) {
        let Some(zone) = self.zone_of_car(car).copied() else {
            return;
        };
        let position = ctx.cars[car.index()].floor();

        let pending: Vec<usize> = (zone.floor_start..zone.floor_end)
            .filter(|&floor| ctx.floors[floor].has_waiting())
            .collect();

        let target = match (pending.first().copied(), pending.last().copied()) {
            (None, _) | (_, None) => zone.middle_floor(),
            (Some(lowest), Some(highest)) => {
                if position.index() < zone.floor_start {
                    // Below the zone: the farthest pending call lies upward.
                    FloorId(highest)
                } else if position.index() >= zone.floor_end {
                    // Above the zone: the farthest pending call lies downward.
                    FloorId(lowest)
                } else {
                    FloorId(highest)
                }
            }
        };

        if target != position {
            trace!(car = %car, floor = %target, "zoning idle movement");
            ctx.cars[car.index()].dispatch_to(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::{ElevatorCar, Floor};
    use crate::dispatch::HallCall;
    use crate::passenger::Passenger;
    use crate::types::{CarConfig, PassengerId};
    use std::collections::VecDeque;

    fn call(id: u64, from: usize, to: usize) -> HallCall {
        HallCall::new(&Passenger::new(PassengerId(id), FloorId(from), FloorId(to), 1, 0.0).unwrap())
    }

    fn cars_at(positions: &[usize]) -> Vec<ElevatorCar> {
        positions
            .iter()
            .enumerate()
            .map(|(i, &floor)| ElevatorCar::new(CarId(i), CarConfig::default(), FloorId(floor)))
            .collect()
    }

    fn floors(count: usize) -> Vec<Floor> {
        (0..count).map(|i| Floor::new(FloorId(i), 0)).collect()
    }

    #[test]
    fn test_ten_floors_three_zones_split_4_3_3() {
        let zoning = Zoning::new(10, 3, 3).unwrap();
        let sizes: Vec<usize> =
            zoning.zones().iter().map(|z| z.floor_end - z.floor_start).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
    }

    #[test]
    fn test_zones_cover_every_floor_exactly_once() {
        for (num_floors, num_zones) in [(10, 3), (7, 2), (12, 5), (6, 6)] {
            let zoning = Zoning::new(num_floors, num_zones, num_zones).unwrap();
            let mut covered = vec![0usize; num_floors];
            for zone in zoning.zones() {
                for floor in zone.floor_start..zone.floor_end {
                    covered[floor] += 1;
                }
            }
            assert!(
                covered.iter().all(|&c| c == 1),
                "{num_floors} floors / {num_zones} zones covered as {covered:?}"
            );
        }
    }

    #[test]
    fn test_cars_partition_by_index_range() {
        let zoning = Zoning::new(9, 6, 3).unwrap();
        assert!(zoning.zones()[0].covers_car(CarId(0)));
        assert!(zoning.zones()[0].covers_car(CarId(1)));
        assert!(zoning.zones()[1].covers_car(CarId(2)));
        assert!(zoning.zones()[2].covers_car(CarId(5)));
        assert_eq!(zoning.zone_of_car(CarId(3)), Some(&zoning.zones()[1]));
    }

    #[test]
    fn test_degenerate_partitions_rejected() {
        assert!(Zoning::new(10, 3, 0).is_err());
        assert!(Zoning::new(3, 3, 5).is_err());
        assert!(Zoning::new(10, 2, 3).is_err(), "2 cars cannot serve 3 zones");
    }

    #[test]
    fn test_calls_are_served_only_by_their_zone() {
        let mut zoning = Zoning::new(6, 2, 2).unwrap();
        // Car 0 serves floors 0..3, car 1 serves floors 3..6.
        let mut bank = cars_at(&[0, 3]);
        let f = floors(6);
        let mut queue = VecDeque::new();
        queue.push_back(call(1, 4, 5));

        let mut ctx =
            DispatchContext { cars: &mut bank, floors: &f, hall_queue: &queue, now: 0.0 };
        zoning.on_update(&mut ctx);

        assert!(bank[0].is_idle(), "out-of-zone car must not react");
        assert_eq!(bank[1].destination(), Some(FloorId(4)));
    }

    #[test]
    fn test_passing_zone_car_is_stopped() {
        let mut zoning = Zoning::new(6, 2, 2).unwrap();
        let mut bank = cars_at(&[0, 3]);
        bank[1].dispatch_to(FloorId(5));
        bank[1].tick(0.0, 1.5).unwrap();
        assert_eq!(bank[1].next_floor(), Some(FloorId(5)));

        let f = floors(6);
        let mut queue = VecDeque::new();
        queue.push_back(call(1, 5, 3));
        let mut ctx =
            DispatchContext { cars: &mut bank, floors: &f, hall_queue: &queue, now: 0.0 };
        zoning.on_update(&mut ctx);

        assert!(matches!(
            bank[1].state(),
            crate::building::CarState::Moving { stop_at_next: true, .. }
        ));
    }

    #[test]
    fn test_idle_car_parks_at_the_zone_middle() {
        let mut zoning = Zoning::new(9, 3, 3).unwrap();
        let mut bank = cars_at(&[0, 0, 0]);
        let f = floors(9);
        let queue = VecDeque::new();

        let mut ctx =
            DispatchContext { cars: &mut bank, floors: &f, hall_queue: &queue, now: 0.0 };
        // Car 2 serves zone 2 (floors 6..9); its middle is floor 7.
        zoning.on_idle(CarId(2), &mut ctx);
        assert_eq!(bank[2].destination(), Some(FloorId(7)));
    }

    #[test]
    fn test_idle_car_outside_zone_seeks_the_farthest_pending_call() {
        let mut zoning = Zoning::new(9, 3, 3).unwrap();
        let mut bank = cars_at(&[0, 0, 0]);
        let mut f = floors(9);
        f[6].push_passenger(Passenger::new(PassengerId(1), FloorId(6), FloorId(0), 1, 0.0).unwrap());
        f[8].push_passenger(Passenger::new(PassengerId(2), FloorId(8), FloorId(0), 1, 0.0).unwrap());

        let queue = VecDeque::new();
        let mut ctx =
            DispatchContext { cars: &mut bank, floors: &f, hall_queue: &queue, now: 0.0 };
        // Car 2 idles at floor 0, below its zone 6..9: go to the farthest
        // pending floor in the away direction, floor 8.
        zoning.on_idle(CarId(2), &mut ctx);
        assert_eq!(bank[2].destination(), Some(FloorId(8)));
    }

    #[test]
    fn test_idle_car_inside_zone_prefers_the_highest_pending_floor() {
        let mut zoning = Zoning::new(9, 3, 3).unwrap();
        let mut bank = cars_at(&[0, 0, 7]);
        let mut f = floors(9);
        f[6].push_passenger(Passenger::new(PassengerId(1), FloorId(6), FloorId(0), 1, 0.0).unwrap());
        f[8].push_passenger(Passenger::new(PassengerId(2), FloorId(8), FloorId(0), 1, 0.0).unwrap());

        let queue = VecDeque::new();
        let mut ctx =
            DispatchContext { cars: &mut bank, floors: &f, hall_queue: &queue, now: 0.0 };
        zoning.on_idle(CarId(2), &mut ctx);
        assert_eq!(bank[2].destination(), Some(FloorId(8)));
    }
}
