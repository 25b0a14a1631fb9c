//! Error types for the simulation
//!
//! Configuration and distribution problems abort a run with a descriptive
//! error; everything else in the engine degrades gracefully (longer queues,
//! longer waits) instead of failing.

use crate::types::ConfigValidationError;
use thiserror::Error;

/// Errors that can occur while building or running a simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Scenario configuration failed validation
    #[error("configuration error: {0}")]
    ConfigurationError(#[from] ConfigValidationError),

    /// A weighted distribution does not sum to one
    #[error("distribution error: {0}")]
    DistributionError(String),

    /// A dispatch component was driven outside its contract
    #[error("dispatch error: {0}")]
    DispatchError(String),

    /// A passenger record was created or mutated illegally
    #[error("passenger error: {0}")]
    PassengerError(String),

    /// Simulated time was driven outside its contract
    #[error("time error: {0}")]
    TimeError(String),

    /// I/O failure in an embedding host concern (e.g. log files)
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization failure on the export surface
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<anyhow::Error> for SimulationError {
    fn from(error: anyhow::Error) -> Self {
        SimulationError::DispatchError(error.to_string())
    }
}

impl SimulationError {
    /// Whether a run can continue past this error
    ///
    /// Configuration and distribution errors are data errors that would
    /// silently skew results; they always abort.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            SimulationError::ConfigurationError(_) | SimulationError::DistributionError(_)
        )
    }

    /// Coarse category for log routing
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::ConfigurationError(_) => "Configuration",
            SimulationError::DistributionError(_) => "Distribution",
            SimulationError::DispatchError(_) => "Dispatch",
            SimulationError::PassengerError(_) => "Passenger",
            SimulationError::TimeError(_) => "Time",
            SimulationError::IoError(_) => "IO",
            SimulationError::SerializationError(_) => "Serialization",
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_fatal() {
        let error: SimulationError = ConfigValidationError::TooFewFloors(1).into();
        assert!(!error.is_recoverable());
        assert_eq!(error.category(), "Configuration");
        assert_eq!(
            error.to_string(),
            "configuration error: building must have at least 2 floors, got 1"
        );
    }

    #[test]
    fn test_distribution_errors_are_fatal() {
        let error = SimulationError::DistributionError("mass 0.5".into());
        assert!(!error.is_recoverable());
        assert_eq!(error.category(), "Distribution");
    }

    #[test]
    fn test_operational_errors_are_recoverable() {
        assert!(SimulationError::DispatchError("x".into()).is_recoverable());
        assert!(SimulationError::PassengerError("x".into()).is_recoverable());
        assert!(SimulationError::TimeError("x".into()).is_recoverable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error: SimulationError = io.into();
        assert!(matches!(error, SimulationError::IoError(_)));
        assert_eq!(error.category(), "IO");
    }
}
