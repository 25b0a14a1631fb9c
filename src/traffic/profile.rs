//! Time-of-day traffic model
//!
//! This module contains the repeating table of fixed-length intervals that
//! drives passenger generation. Each interval carries an arrival-rate ratio
//! and an up/down split; the interfloor share is whatever remains. The
//! profile answers two questions for a floor: how many passengers arrive
//! per unit time right now, and where an arriving passenger wants to go.

use crate::simulation::SimTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default interval length: ten minutes of simulated time
pub const DEFAULT_INTERVAL_LENGTH_SECONDS: f64 = 600.0;

/// Errors produced by traffic profile validation
#[derive(Debug, Error)]
pub enum TrafficProfileError {
    /// The interval table cannot be empty
    #[error("traffic profile needs at least one interval")]
    Empty,

    /// Interval length must be positive
    #[error("interval length must be positive, got {0}")]
    NonPositiveLength(f64),

    /// A rate or ratio is out of range
    #[error("interval {index}: {reason}")]
    InvalidInterval {
        /// Index of the offending interval
        index: usize,
        /// What was wrong with it
        reason: String,
    },
}

/// One fixed-length time-of-day bucket of the traffic table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficInterval {
    /// Arrivals per resident per hour during this interval
    pub arrival_ratio: f64,
    /// Share of arrivals traveling up from the lobby
    pub up_rate: f64,
    /// Share of arrivals traveling down to the lobby
    pub down_rate: f64,
}

impl TrafficInterval {
    /// Create an interval from its ratio and directional split
    pub fn new(arrival_ratio: f64, up_rate: f64, down_rate: f64) -> Self {
        Self { arrival_ratio, up_rate, down_rate }
    }

    /// Share of arrivals traveling between two non-lobby floors
    ///
    /// Defined as `1 - up_rate - down_rate`; validation guarantees the
    /// difference is non-negative.
    pub fn interfloor_rate(&self) -> f64 {
        (1.0 - self.up_rate - self.down_rate).max(0.0)
    }

    fn validate(&self, index: usize) -> Result<(), TrafficProfileError> {
        let fail = |reason: String| TrafficProfileError::InvalidInterval { index, reason };
        if !(self.arrival_ratio >= 0.0) {
            return Err(fail(format!("arrival_ratio must be non-negative, got {}", self.arrival_ratio)));
        }
        for (name, rate) in [("up_rate", self.up_rate), ("down_rate", self.down_rate)] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(fail(format!("{name} must be within [0, 1], got {rate}")));
            }
        }
        if self.up_rate + self.down_rate > 1.0 + 1e-9 {
            return Err(fail(format!(
                "up_rate + down_rate must not exceed 1, got {}",
                self.up_rate + self.down_rate
            )));
        }
        Ok(())
    }
}

/// Repeating day of fixed-length traffic intervals, shared by all floors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficProfile {
    interval_length: f64,
    intervals: Vec<TrafficInterval>,
}

impl TrafficProfile {
    /// Create a profile from an interval length (seconds) and table
    pub fn new(interval_length: f64, intervals: Vec<TrafficInterval>) -> Self {
        Self { interval_length, intervals }
    }

    /// Profile with a single interval, i.e. time-invariant traffic
    pub fn uniform(arrival_ratio: f64, up_rate: f64, down_rate: f64) -> Self {
        Self::new(
            DEFAULT_INTERVAL_LENGTH_SECONDS,
            vec![TrafficInterval::new(arrival_ratio, up_rate, down_rate)],
        )
    }

    /// Validate the interval table
    pub fn validate(&self) -> Result<(), TrafficProfileError> {
        if !(self.interval_length > 0.0) {
            return Err(TrafficProfileError::NonPositiveLength(self.interval_length));
        }
        if self.intervals.is_empty() {
            return Err(TrafficProfileError::Empty);
        }
        for (index, interval) in self.intervals.iter().enumerate() {
            interval.validate(index)?;
        }
        Ok(())
    }

    /// Length of each interval in seconds of simulated time
    pub fn interval_length(&self) -> f64 {
        self.interval_length
    }

    /// Number of intervals in the repeating day
    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    /// Index of the interval covering the given simulated time
    pub fn interval_index(&self, now: SimTime) -> usize {
        (now / self.interval_length) as usize % self.intervals.len()
    }

    /// The interval covering the given simulated time
    pub fn interval_at(&self, now: SimTime) -> &TrafficInterval {
        &self.intervals[self.interval_index(now)]
    }

    /// Expected passenger arrivals per second at `floor` during the interval
    /// covering `now`
    ///
    /// The lobby sources the up-traffic of the whole resident population;
    /// every other floor sources down and interfloor traffic in proportion
    /// to its own residents. `arrival_ratio` is expressed per resident per
    /// hour, so the result is scaled to per second.
    pub fn average_arrivals_per_second(
        &self,
        now: SimTime,
        residents: &[u32],
        floor: usize,
        lobby: usize,
    ) -> f64 {
        let interval = self.interval_at(now);
        let total: f64 = residents.iter().map(|&r| f64::from(r)).sum();
        if total == 0.0 {
            return 0.0;
        }

        let per_hour = if floor == lobby {
            total * interval.arrival_ratio * interval.up_rate
        } else {
            let share = interval.down_rate + interval.interfloor_rate();
            interval.arrival_ratio * share * f64::from(residents[floor])
        };
        per_hour / 3600.0
    }

    /// Probability that a passenger arriving at `from` is headed to `to`
    /// during the interval covering `now`
    ///
    /// For a fixed `from`, the probabilities over all other floors sum to 1:
    /// lobby arrivals spread over the upper floors by resident share; other
    /// arrivals put `up_rate + down_rate` mass on the lobby and spread the
    /// interfloor remainder over the remaining floors by resident share.
    pub fn destination_probability(
        &self,
        now: SimTime,
        residents: &[u32],
        from: usize,
        to: usize,
        lobby: usize,
    ) -> f64 {
        if from == to {
            return 0.0;
        }
        let interval = self.interval_at(now);
        let total: f64 = residents.iter().map(|&r| f64::from(r)).sum();

        if from == lobby {
            let above = total - f64::from(residents[lobby]);
            if above == 0.0 {
                return 0.0;
            }
            return f64::from(residents[to]) / above;
        }

        let lobby_mass = interval.up_rate + interval.down_rate;
        let others = total - f64::from(residents[from]) - f64::from(residents[lobby]);
        if to == lobby {
            // With no third floor to absorb interfloor mass, the lobby
            // takes the whole distribution.
            if others == 0.0 {
                return 1.0;
            }
            return lobby_mass;
        }
        if others == 0.0 {
            return 0.0;
        }
        interval.interfloor_rate() * f64::from(residents[to]) / others
    }
}

impl Default for TrafficProfile {
    /// Time-invariant profile: one arrival per resident per hour, split
    /// 45% up, 45% down, 10% interfloor
    fn default() -> Self {
        Self::uniform(1.0, 0.45, 0.45)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residents() -> Vec<u32> {
        vec![0, 30, 50, 20]
    }

    #[test]
    fn test_interval_indexing_wraps_the_day() {
        let profile = TrafficProfile::new(
            600.0,
            vec![
                TrafficInterval::new(1.0, 0.8, 0.1),
                TrafficInterval::new(0.5, 0.2, 0.6),
            ],
        );
        assert_eq!(profile.interval_index(0.0), 0);
        assert_eq!(profile.interval_index(599.9), 0);
        assert_eq!(profile.interval_index(600.0), 1);
        assert_eq!(profile.interval_index(1200.0), 0);
        assert_eq!(profile.interval_index(1800.0), 1);
    }

    #[test]
    fn test_interfloor_rate_is_the_remainder() {
        let interval = TrafficInterval::new(1.0, 0.45, 0.45);
        assert!((interval.interfloor_rate() - 0.1).abs() < 1e-12);

        let saturated = TrafficInterval::new(1.0, 0.6, 0.4);
        assert!((saturated.interfloor_rate() - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_validation_rejects_oversubscribed_rates() {
        let profile =
            TrafficProfile::new(600.0, vec![TrafficInterval::new(1.0, 0.7, 0.5)]);
        assert!(matches!(
            profile.validate(),
            Err(TrafficProfileError::InvalidInterval { index: 0, .. })
        ));
    }

    #[test]
    fn test_validation_rejects_empty_and_bad_length() {
        assert!(matches!(
            TrafficProfile::new(600.0, Vec::new()).validate(),
            Err(TrafficProfileError::Empty)
        ));
        let zero_length =
            TrafficProfile::new(0.0, vec![TrafficInterval::new(1.0, 0.4, 0.4)]);
        assert!(matches!(
            zero_length.validate(),
            Err(TrafficProfileError::NonPositiveLength(_))
        ));
    }

    #[test]
    fn test_lobby_arrival_rate_scales_with_population() {
        let profile = TrafficProfile::uniform(1.0, 0.5, 0.3);
        let residents = residents();
        // 100 residents * 1.0/hr * 0.5 up = 50 arrivals/hr at the lobby.
        let rate = profile.average_arrivals_per_second(0.0, &residents, 0, 0);
        assert!((rate - 50.0 / 3600.0).abs() < 1e-12);
    }

    #[test]
    fn test_upper_floor_arrival_rate_uses_floor_share() {
        let profile = TrafficProfile::uniform(1.0, 0.5, 0.3);
        let residents = residents();
        // Floor 2: 50 residents * 1.0/hr * (0.3 down + 0.2 interfloor).
        let rate = profile.average_arrivals_per_second(0.0, &residents, 2, 0);
        assert!((rate - 25.0 / 3600.0).abs() < 1e-12);
    }

    #[test]
    fn test_destination_probabilities_sum_to_one() {
        let profile = TrafficProfile::uniform(1.0, 0.5, 0.3);
        let residents = residents();
        for from in 0..residents.len() {
            let sum: f64 = (0..residents.len())
                .map(|to| profile.destination_probability(0.0, &residents, from, to, 0))
                .sum();
            assert!((sum - 1.0).abs() < 1e-9, "origin {from} summed to {sum}");
        }
    }

    #[test]
    fn test_two_floor_building_sends_everything_to_the_lobby() {
        let profile = TrafficProfile::uniform(1.0, 0.5, 0.3);
        let residents = vec![0, 40];
        let p = profile.destination_probability(0.0, &residents, 1, 0, 0);
        assert!((p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_profile_is_valid() {
        assert!(TrafficProfile::default().validate().is_ok());
    }
}
