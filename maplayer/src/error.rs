//! Errors which can happen in various parts of the library.

use thiserror::Error;

/// Returned by the `validate` methods of the settings structs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("{name} must be a non-negative number, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("{name} must be a positive number, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("decelerate_multiplicator must be within [0, 1], got {0}")]
    DecelerateMultiplicator(f64),
    #[error("zoom_min_scale ({min}) is larger than zoom_max_scale ({max})")]
    ZoomRange { min: f64, max: f64 },
}
