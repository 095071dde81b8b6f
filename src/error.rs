//! Error types.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised while loading, building or simulating a model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The configuration failed validation. No model was built.
    #[error("invalid configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ValidationError>),
    /// The configuration could not be parsed.
    #[error("configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// The configuration could not be read.
    #[error("configuration read error: {0}")]
    Io(#[from] std::io::Error),
    /// The activation vector does not have one bit per station.
    #[error("buffer activation has {actual} entries, model has {expected} stations")]
    ActivationLength { expected: usize, actual: usize },
    /// Buffer zones could not be derived for a station.
    #[error("buffer zones undefined for station {station} after lead-time propagation")]
    UndefinedZones { station: usize },
    /// Search parameters are inconsistent.
    #[error("invalid solver configuration: {0}")]
    InvalidSolverConfig(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ModelError {
    /// Validation errors carried by an `InvalidConfig`, empty otherwise.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::InvalidConfig(errors) => errors,
            _ => &[],
        }
    }
}
