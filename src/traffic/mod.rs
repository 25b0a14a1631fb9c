//! Stochastic traffic generation model
//!
//! The traffic model has two halves: the [`TrafficProfile`] table that says
//! how busy each time of day is and which way people are headed, and the
//! [`WeightedSampler`] that turns those destination probabilities into
//! concrete draws.

pub mod profile;
pub mod sampler;

pub use profile::{
    TrafficInterval, TrafficProfile, TrafficProfileError, DEFAULT_INTERVAL_LENGTH_SECONDS,
};
pub use sampler::WeightedSampler;
