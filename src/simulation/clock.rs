//! Simulated clock
//!
//! The clock holds elapsed simulated time as a plain scalar of seconds and
//! has no coupling to wall time: batch runs push it forward with a fixed
//! step as fast as the machine allows, and an interactive host may instead
//! feed it measured real-time deltas. Time is monotonic and non-negative.

use chrono::NaiveTime;
use tracing::warn;

/// Simulated time in seconds since the start of the run
pub type SimTime = f64;

/// Seconds in one simulated day
pub const DAY_SECONDS: f64 = 86_400.0;

/// Monotonic virtual clock
#[derive(Debug, Clone, Default)]
pub struct Clock {
    elapsed: SimTime,
}

impl Clock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance simulated time by `dt` seconds
    ///
    /// Negative steps are ignored; the clock never runs backwards.
    pub fn step(&mut self, dt: SimTime) {
        if dt < 0.0 {
            warn!(dt, "ignoring negative clock step");
            return;
        }
        self.elapsed += dt;
    }

    /// Elapsed simulated time
    pub fn now(&self) -> SimTime {
        self.elapsed
    }

    /// Simulated time elapsed since the earlier instant `t`
    pub fn elapsed_since(&self, t: SimTime) -> SimTime {
        self.elapsed - t
    }

    /// Rewind the clock to zero
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Convert an internal time value to seconds
    ///
    /// The internal unit is the second, so this is the identity; it exists
    /// so call sites state which unit they mean.
    pub fn to_seconds(t: SimTime) -> f64 {
        t
    }

    /// Convert a duration in seconds to internal time units
    pub fn seconds_to_time(seconds: f64) -> SimTime {
        seconds
    }

    /// Convert a duration in minutes to internal time units
    pub fn minutes_to_time(minutes: f64) -> SimTime {
        minutes * 60.0
    }

    /// Time of day corresponding to the elapsed time, wrapping every 24 h
    pub fn time_of_day(&self) -> NaiveTime {
        let day_seconds = self.elapsed.rem_euclid(DAY_SECONDS);
        let whole = day_seconds as u32;
        let nanos = ((day_seconds - f64::from(whole)) * 1e9) as u32;
        NaiveTime::from_num_seconds_from_midnight_opt(whole, nanos).unwrap_or(NaiveTime::MIN)
    }

    /// Elapsed time formatted for diagnostics, e.g. `1d 07:32:10`
    pub fn format_elapsed(&self) -> String {
        let days = (self.elapsed / DAY_SECONDS) as u64;
        let time = self.time_of_day().format("%H:%M:%S");
        if days > 0 {
            format!("{days}d {time}")
        } else {
            time.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_starts_at_zero() {
        let clock = Clock::new();
        assert_eq!(clock.now(), 0.0);
        assert_eq!(clock.format_elapsed(), "00:00:00");
    }

    #[test]
    fn test_step_accumulates() {
        let mut clock = Clock::new();
        clock.step(1.5);
        clock.step(2.5);
        assert_eq!(clock.now(), 4.0);
        assert_eq!(clock.elapsed_since(1.0), 3.0);
    }

    #[test]
    fn test_negative_steps_are_ignored() {
        let mut clock = Clock::new();
        clock.step(10.0);
        clock.step(-5.0);
        assert_eq!(clock.now(), 10.0);
    }

    #[test]
    fn test_reset_rewinds_to_zero() {
        let mut clock = Clock::new();
        clock.step(100.0);
        clock.reset();
        assert_eq!(clock.now(), 0.0);
    }

    #[test]
    fn test_unit_conversions() {
        assert_eq!(Clock::seconds_to_time(90.0), 90.0);
        assert_eq!(Clock::minutes_to_time(2.0), 120.0);
        assert_eq!(Clock::to_seconds(Clock::minutes_to_time(1.0)), 60.0);
    }

    #[test]
    fn test_formatting_wraps_at_a_day() {
        let mut clock = Clock::new();
        clock.step(7.0 * 3600.0 + 32.0 * 60.0 + 10.0);
        assert_eq!(clock.format_elapsed(), "07:32:10");

        clock.step(DAY_SECONDS);
        assert_eq!(clock.format_elapsed(), "1d 07:32:10");
    }
}
