//! Passenger modeling
//!
//! Passengers are immutable trip records with once-only lifecycle
//! timestamps; everything else about them is derived.

pub mod passenger;

pub use passenger::Passenger;
