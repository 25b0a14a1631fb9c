//! Statistics collection and reporting
//!
//! A [`StatsInterval`] is one bucket of counters and time sums; the
//! [`SimulationStats`] aggregator fans every passenger event into the
//! whole-run bucket, the current hourly bucket, and a resettable poll
//! bucket that an external policy selector can sample between decisions.
//!
//! Every derived average returns `0.0` when its served count is zero;
//! callers never see `NaN`.

use crate::passenger::Passenger;
use crate::simulation::SimTime;
use crate::types::{CarId, FloorId, TripKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Waits longer than this many seconds count as long waits
pub const LONG_WAIT_THRESHOLD_SECONDS: f64 = 60.0;

/// Seconds per reporting hour
pub const HOUR_SECONDS: f64 = 3_600.0;

/// Counters and time sums accumulated over one run or sub-interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsInterval {
    /// Position of this interval in its sequence (0 for a whole run)
    pub index: usize,
    /// Simulated time at which the interval started
    pub started_at: SimTime,
    /// Passengers generated
    pub generated: u64,
    /// Passengers delivered to their destination
    pub served: u64,
    /// Served trips that started at the lobby
    pub up_trips: u64,
    /// Served trips that ended at the lobby
    pub down_trips: u64,
    /// Served trips between two non-lobby floors
    pub interfloor_trips: u64,
    /// Sum of wait times over served passengers
    pub wait_time_sum: f64,
    /// Sum of squared wait times over served passengers
    pub wait_time_squared_sum: f64,
    /// Sum of ride times over served passengers
    pub ride_time_sum: f64,
    /// Sum of squared ride times over served passengers
    pub ride_time_squared_sum: f64,
    /// Served passengers who waited longer than the long-wait threshold
    pub long_waits: u64,
    /// Served count per car, indexed by car id
    pub served_per_car: Vec<u64>,
}

impl StatsInterval {
    /// Create an empty interval anchored at `started_at`
    pub fn new(index: usize, started_at: SimTime, num_cars: usize) -> Self {
        Self {
            index,
            started_at,
            generated: 0,
            served: 0,
            up_trips: 0,
            down_trips: 0,
            interfloor_trips: 0,
            wait_time_sum: 0.0,
            wait_time_squared_sum: 0.0,
            ride_time_sum: 0.0,
            ride_time_squared_sum: 0.0,
            long_waits: 0,
            served_per_car: vec![0; num_cars],
        }
    }

    /// Count one generated passenger
    pub fn record_generated(&mut self) {
        self.generated += 1;
    }

    /// Count one served passenger delivered by `car`
    ///
    /// The passenger must carry both lifecycle timestamps; a passenger
    /// without them contributes zero time, which only happens if the
    /// engine is broken.
    pub fn record_served(&mut self, passenger: &Passenger, car: CarId, lobby: FloorId) {
        let wait = passenger.wait_time().unwrap_or(0.0);
        let ride = passenger.ride_time().unwrap_or(0.0);
        debug_assert!(passenger.exited_at().is_some(), "served passenger must have exited");

        self.served += 1;
        match passenger.trip_kind(lobby) {
            TripKind::Up => self.up_trips += 1,
            TripKind::Down => self.down_trips += 1,
            TripKind::Interfloor => self.interfloor_trips += 1,
        }
        self.wait_time_sum += wait;
        self.wait_time_squared_sum += wait * wait;
        self.ride_time_sum += ride;
        self.ride_time_squared_sum += ride * ride;
        if wait > LONG_WAIT_THRESHOLD_SECONDS {
            self.long_waits += 1;
        }
        if let Some(count) = self.served_per_car.get_mut(car.index()) {
            *count += 1;
        }
    }

    /// Mean wait time over served passengers; `0.0` when none were served
    pub fn average_wait_time(&self) -> f64 {
        if self.served == 0 {
            0.0
        } else {
            self.wait_time_sum / self.served as f64
        }
    }

    /// Mean squared wait time over served passengers; `0.0` when none
    pub fn average_squared_wait_time(&self) -> f64 {
        if self.served == 0 {
            0.0
        } else {
            self.wait_time_squared_sum / self.served as f64
        }
    }

    /// Mean ride time over served passengers; `0.0` when none were served
    pub fn average_ride_time(&self) -> f64 {
        if self.served == 0 {
            0.0
        } else {
            self.ride_time_sum / self.served as f64
        }
    }

    /// Mean squared ride time over served passengers; `0.0` when none
    pub fn average_squared_ride_time(&self) -> f64 {
        if self.served == 0 {
            0.0
        } else {
            self.ride_time_squared_sum / self.served as f64
        }
    }

    /// Share of served passengers who waited over the threshold, as a
    /// percentage; `0.0` when none were served
    pub fn percentage_over_threshold(&self) -> f64 {
        if self.served == 0 {
            0.0
        } else {
            (self.long_waits as f64 / self.served as f64) * 100.0
        }
    }

    /// Element-wise mean of several intervals, for Monte-Carlo reporting
    pub fn average(intervals: &[StatsInterval]) -> StatsSummary {
        let runs = intervals.len();
        if runs == 0 {
            return StatsSummary::default();
        }
        let n = runs as f64;
        let mean = |f: &dyn Fn(&StatsInterval) -> f64| {
            intervals.iter().map(|i| f(i)).sum::<f64>() / n
        };
        StatsSummary {
            runs,
            generated: mean(&|i| i.generated as f64),
            served: mean(&|i| i.served as f64),
            up_trips: mean(&|i| i.up_trips as f64),
            down_trips: mean(&|i| i.down_trips as f64),
            interfloor_trips: mean(&|i| i.interfloor_trips as f64),
            average_wait_time: mean(&StatsInterval::average_wait_time),
            average_squared_wait_time: mean(&StatsInterval::average_squared_wait_time),
            average_ride_time: mean(&StatsInterval::average_ride_time),
            percentage_over_threshold: mean(&StatsInterval::percentage_over_threshold),
        }
    }

    /// Hour-by-hour averages across several runs' hourly interval lists
    ///
    /// Entry `h` of the result averages interval `h` over every run long
    /// enough to have one.
    pub fn average_hours(runs: &[Vec<StatsInterval>]) -> Vec<StatsSummary> {
        let hours = runs.iter().map(Vec::len).max().unwrap_or(0);
        (0..hours)
            .map(|hour| {
                let slice: Vec<StatsInterval> = runs
                    .iter()
                    .filter_map(|run| run.get(hour).cloned())
                    .collect();
                StatsInterval::average(&slice)
            })
            .collect()
    }
}

impl fmt::Display for StatsInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "interval {}: {} generated, {} served ({} up / {} down / {} interfloor), \
             avg wait {:.2}s, avg ride {:.2}s, {:.1}% over {}s",
            self.index,
            self.generated,
            self.served,
            self.up_trips,
            self.down_trips,
            self.interfloor_trips,
            self.average_wait_time(),
            self.average_ride_time(),
            self.percentage_over_threshold(),
            LONG_WAIT_THRESHOLD_SECONDS,
        )
    }
}

/// Element-wise mean of a set of intervals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Number of intervals averaged
    pub runs: usize,
    /// Mean generated count
    pub generated: f64,
    /// Mean served count
    pub served: f64,
    /// Mean up-trip count
    pub up_trips: f64,
    /// Mean down-trip count
    pub down_trips: f64,
    /// Mean interfloor-trip count
    pub interfloor_trips: f64,
    /// Mean of the per-interval average wait times
    pub average_wait_time: f64,
    /// Mean of the per-interval average squared wait times
    pub average_squared_wait_time: f64,
    /// Mean of the per-interval average ride times
    pub average_ride_time: f64,
    /// Mean of the per-interval long-wait percentages
    pub percentage_over_threshold: f64,
}

/// Run-wide statistics aggregator
///
/// Fans every event into the whole-run interval, the hourly interval
/// covering the event time, and the poll interval.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationStats {
    run: StatsInterval,
    hourly: Vec<StatsInterval>,
    poll: StatsInterval,
    num_cars: usize,
}

impl SimulationStats {
    /// Create an empty aggregator for a bank of `num_cars` cars
    pub fn new(num_cars: usize) -> Self {
        Self {
            run: StatsInterval::new(0, 0.0, num_cars),
            hourly: Vec::new(),
            poll: StatsInterval::new(0, 0.0, num_cars),
            num_cars,
        }
    }

    /// The whole-run interval
    pub fn run(&self) -> &StatsInterval {
        &self.run
    }

    /// Hourly intervals in order; hours without events may be missing from
    /// the tail
    pub fn hourly(&self) -> &[StatsInterval] {
        &self.hourly
    }

    /// The interval accumulated since the last poll reset
    pub fn poll_interval(&self) -> &StatsInterval {
        &self.poll
    }

    /// Start a fresh poll interval at `now`, returning the finished one
    pub fn reset_poll_interval(&mut self, now: SimTime) -> StatsInterval {
        let next = StatsInterval::new(self.poll.index + 1, now, self.num_cars);
        std::mem::replace(&mut self.poll, next)
    }

    /// Record one generated passenger at `now`
    pub fn record_generated(&mut self, now: SimTime) {
        self.run.record_generated();
        self.hour_at(now).record_generated();
        self.poll.record_generated();
    }

    /// Record one served passenger delivered by `car`
    pub fn record_served(&mut self, passenger: &Passenger, car: CarId, lobby: FloorId) {
        let exited = passenger.exited_at().unwrap_or(0.0);
        self.run.record_served(passenger, car, lobby);
        self.hour_at(exited).record_served(passenger, car, lobby);
        self.poll.record_served(passenger, car, lobby);
    }

    /// Forget everything and start over
    pub fn reset(&mut self) {
        *self = Self::new(self.num_cars);
    }

    fn hour_at(&mut self, now: SimTime) -> &mut StatsInterval {
        let hour = (now / HOUR_SECONDS) as usize;
        while self.hourly.len() <= hour {
            let index = self.hourly.len();
            self.hourly.push(StatsInterval::new(index, index as f64 * HOUR_SECONDS, self.num_cars));
        }
        &mut self.hourly[hour]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PassengerId;

    fn served_passenger(id: u64, from: usize, to: usize, wait: f64, ride: f64) -> Passenger {
        let mut p =
            Passenger::new(PassengerId(id), FloorId(from), FloorId(to), 1, 0.0).unwrap();
        p.record_boarding(wait).unwrap();
        p.record_exit(wait + ride).unwrap();
        p
    }

    #[test]
    fn test_empty_interval_averages_are_zero() {
        let interval = StatsInterval::new(0, 0.0, 2);
        assert_eq!(interval.average_wait_time(), 0.0);
        assert_eq!(interval.average_squared_wait_time(), 0.0);
        assert_eq!(interval.average_ride_time(), 0.0);
        assert_eq!(interval.percentage_over_threshold(), 0.0);
    }

    #[test]
    fn test_served_accumulates_sums_and_squares() {
        let mut interval = StatsInterval::new(0, 0.0, 2);
        let lobby = FloorId(0);
        interval.record_served(&served_passenger(1, 0, 3, 10.0, 4.5), CarId(0), lobby);
        interval.record_served(&served_passenger(2, 3, 0, 20.0, 6.0), CarId(1), lobby);

        assert_eq!(interval.served, 2);
        assert_eq!(interval.up_trips, 1);
        assert_eq!(interval.down_trips, 1);
        assert_eq!(interval.average_wait_time(), 15.0);
        assert_eq!(interval.average_squared_wait_time(), (100.0 + 400.0) / 2.0);
        assert_eq!(interval.average_ride_time(), 5.25);
        assert_eq!(interval.served_per_car, vec![1, 1]);
    }

    #[test]
    fn test_long_wait_threshold() {
        let mut interval = StatsInterval::new(0, 0.0, 1);
        let lobby = FloorId(0);
        interval.record_served(&served_passenger(1, 0, 3, 59.0, 1.0), CarId(0), lobby);
        interval.record_served(&served_passenger(2, 0, 3, 61.0, 1.0), CarId(0), lobby);
        interval.record_served(&served_passenger(3, 0, 3, 120.0, 1.0), CarId(0), lobby);

        assert_eq!(interval.long_waits, 2);
        assert!((interval.percentage_over_threshold() - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_element_wise_average() {
        let lobby = FloorId(0);
        let mut a = StatsInterval::new(0, 0.0, 1);
        a.record_generated();
        a.record_generated();
        a.record_served(&served_passenger(1, 0, 3, 10.0, 4.0), CarId(0), lobby);
        let mut b = StatsInterval::new(0, 0.0, 1);
        b.record_generated();
        b.record_served(&served_passenger(2, 0, 3, 30.0, 6.0), CarId(0), lobby);

        let summary = StatsInterval::average(&[a, b]);
        assert_eq!(summary.runs, 2);
        assert_eq!(summary.generated, 1.5);
        assert_eq!(summary.served, 1.0);
        assert_eq!(summary.average_wait_time, 20.0);
        assert_eq!(summary.average_ride_time, 5.0);
    }

    #[test]
    fn test_average_of_nothing_is_empty() {
        let summary = StatsInterval::average(&[]);
        assert_eq!(summary.runs, 0);
        assert_eq!(summary.average_wait_time, 0.0);
    }

    #[test]
    fn test_hourly_averaging_across_runs() {
        let lobby = FloorId(0);
        let make_run = |wait: f64| {
            let mut hour0 = StatsInterval::new(0, 0.0, 1);
            hour0.record_served(&served_passenger(1, 0, 3, wait, 2.0), CarId(0), lobby);
            vec![hour0]
        };
        let summaries = StatsInterval::average_hours(&[make_run(10.0), make_run(20.0)]);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].average_wait_time, 15.0);
    }

    #[test]
    fn test_aggregator_fans_out_to_run_hour_and_poll() {
        let mut stats = SimulationStats::new(1);
        let lobby = FloorId(0);

        stats.record_generated(100.0);
        let mut p = Passenger::new(PassengerId(1), FloorId(0), FloorId(2), 1, 100.0).unwrap();
        p.record_boarding(110.0).unwrap();
        p.record_exit(115.0).unwrap();
        stats.record_served(&p, CarId(0), lobby);

        assert_eq!(stats.run().generated, 1);
        assert_eq!(stats.run().served, 1);
        assert_eq!(stats.hourly().len(), 1);
        assert_eq!(stats.hourly()[0].served, 1);
        assert_eq!(stats.poll_interval().served, 1);
    }

    #[test]
    fn test_events_land_in_the_right_hour() {
        let mut stats = SimulationStats::new(1);
        stats.record_generated(30.0);
        stats.record_generated(2.5 * HOUR_SECONDS);

        assert_eq!(stats.hourly().len(), 3);
        assert_eq!(stats.hourly()[0].generated, 1);
        assert_eq!(stats.hourly()[1].generated, 0);
        assert_eq!(stats.hourly()[2].generated, 1);
        assert_eq!(stats.hourly()[2].started_at, 2.0 * HOUR_SECONDS);
    }

    #[test]
    fn test_poll_interval_reset_returns_the_finished_bucket() {
        let mut stats = SimulationStats::new(1);
        stats.record_generated(10.0);

        let finished = stats.reset_poll_interval(20.0);
        assert_eq!(finished.generated, 1);
        assert_eq!(stats.poll_interval().generated, 0);
        assert_eq!(stats.poll_interval().started_at, 20.0);
        assert_eq!(stats.poll_interval().index, 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut stats = SimulationStats::new(2);
        stats.record_generated(10.0);
        stats.reset();
        assert_eq!(stats.run().generated, 0);
        assert!(stats.hourly().is_empty());
        assert_eq!(stats.poll_interval().generated, 0);
    }
}
