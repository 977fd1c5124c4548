//! Error types for schedule construction and solving.

use thiserror::Error;

/// Input-shape errors for caller-supplied constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `cannot_sleep` does not have exactly 7 rows.
    #[error("cannot_sleep must have {expected} days, got {actual}")]
    DayCount { expected: usize, actual: usize },

    /// One row of `cannot_sleep` does not have exactly 96 slots.
    #[error("cannot_sleep day {day} must have {expected} slots, got {actual}")]
    SlotCount {
        day: usize,
        expected: usize,
        actual: usize,
    },
}

/// Objective-construction errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    /// A penalty weight is NaN or infinite.
    #[error("penalty weight '{name}' must be finite, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    /// The wake-gap lower bound exceeds the upper bound.
    #[error("wake-gap bounds inverted: min {min} > max {max}")]
    InvertedWakeBounds { min: usize, max: usize },

    /// A compiled coefficient overflowed to a non-finite value.
    #[error("{term} coefficient is not finite")]
    NonFinite { term: &'static str },
}

/// Invalid annealer configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("num_sweeps must be positive")]
    ZeroSweeps,

    #[error("num_reads must be positive")]
    ZeroReads,

    #[error("{name} must be positive and finite, got {value}")]
    BadTemperature { name: &'static str, value: f64 },

    #[error("min_temperature ({min}) must be less than initial_temperature ({initial})")]
    TemperatureOrder { initial: f64, min: f64 },
}

/// Top-level error surfaced to the caller of a solve.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("objective construction failed: {0}")]
    Build(#[from] BuildError),

    #[error("invalid solver configuration: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Returns true if the error was caused by malformed caller input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_descriptive() {
        let err: Error = ValidationError::SlotCount {
            day: 3,
            expected: 96,
            actual: 95,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "invalid input: cannot_sleep day 3 must have 96 slots, got 95"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_build_error_not_validation() {
        let err: Error = BuildError::NonFinite { term: "target" }.into();
        assert!(!err.is_validation());
        assert!(err.to_string().contains("target coefficient"));
    }
}
