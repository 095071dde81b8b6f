//! Input validation for line configurations.
//!
//! Checks structural integrity of a [`ModelConfig`] before any model is
//! built. Detects:
//! - Duplicate or missing station indices
//! - Links to unknown stations, self links, negative ratios
//! - Output stations without variability or forecast, negative forecasts
//! - Forecast and past series whose length disagrees with the horizons
//! - Circular material flow (DAG validation)
//!
//! All problems are collected so a caller sees every offending station
//! at once.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{HashMap, HashSet};
use std::fmt;

use thiserror::Error;

use crate::models::ModelConfig;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Offending station indices (may be empty for global problems).
    pub stations: Vec<usize>,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Horizon values unusable (e.g. zero planning horizon).
    InvalidHorizon,
    /// Two declarations share the same station index.
    DuplicateIndex,
    /// Station indices do not cover `0..N`.
    MissingIndex,
    /// A link targets an unknown station, the station itself, or has a bad ratio.
    InvalidLink,
    /// Material flow graph contains a cycle.
    CyclicDependency,
    /// An output station lacks variability or forecast.
    MissingDemandData,
    /// Forecast length differs from the planning horizon.
    ForecastLength,
    /// Past series length differs from the past horizon.
    PastDataLength,
    /// A numeric field is negative or not finite.
    InvalidValue,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidHorizon => "invalid horizon",
            Self::DuplicateIndex => "duplicate index",
            Self::MissingIndex => "missing index",
            Self::InvalidLink => "invalid link",
            Self::CyclicDependency => "cyclic dependency",
            Self::MissingDemandData => "missing demand data",
            Self::ForecastLength => "forecast length",
            Self::PastDataLength => "past data length",
            Self::InvalidValue => "invalid value",
        };
        f.write_str(name)
    }
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, stations: Vec<usize>, message: impl Into<String>) -> Self {
        Self {
            kind,
            stations,
            message: message.into(),
        }
    }
}

/// Validates a line configuration.
///
/// Checks:
/// 1. Planning horizon is at least 1 and at least one station is declared
/// 2. Station indices are exactly `0..N`, each once
/// 3. Processing and lead times are finite and non-negative, forecasts non-negative
/// 4. Links point to other existing stations with finite, non-negative ratios
/// 5. Output stations declare variability and a forecast of `planning_horizon` values
/// 6. Past series have `past_horizon` values when present
/// 7. No circular material flow
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &ModelConfig) -> ValidationResult {
    let mut errors = Vec::new();
    let n = config.station_count();

    if config.planning_horizon == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidHorizon,
            Vec::new(),
            "PlanningHorizon must be at least 1",
        ));
    }
    if n == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingIndex,
            Vec::new(),
            "No station declared",
        ));
    }

    // Index coverage
    let mut seen: HashMap<usize, usize> = HashMap::new();
    for decl in &config.station_declarations {
        *seen.entry(decl.station_index).or_insert(0) += 1;
    }
    let mut duplicates: Vec<usize> = seen
        .iter()
        .filter(|(_, &count)| count > 1)
        .map(|(&idx, _)| idx)
        .collect();
    duplicates.sort_unstable();
    if !duplicates.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::DuplicateIndex,
            duplicates.clone(),
            format!("Station indices declared more than once: {duplicates:?}"),
        ));
    }
    let missing: Vec<usize> = (0..n).filter(|i| !seen.contains_key(i)).collect();
    let out_of_range: Vec<usize> = {
        let mut v: Vec<usize> = seen.keys().copied().filter(|&i| i >= n).collect();
        v.sort_unstable();
        v
    };
    if !missing.is_empty() || !out_of_range.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingIndex,
            missing.iter().chain(&out_of_range).copied().collect(),
            format!(
                "Station indices must be 0..{n}: missing {missing:?}, out of range {out_of_range:?}"
            ),
        ));
    }

    for decl in &config.station_declarations {
        let idx = decl.station_index;

        if !decl.processing_time.is_finite() || decl.processing_time < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                vec![idx],
                format!("Station {idx} has invalid processing time {}", decl.processing_time),
            ));
        }
        if let Some(lt) = decl.lead_time {
            if !lt.is_finite() || lt < 0.0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidValue,
                    vec![idx],
                    format!("Station {idx} has invalid lead time {lt}"),
                ));
            }
        }
        if let Some(var) = decl.demand_variability {
            if !var.is_finite() || var < 0.0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidValue,
                    vec![idx],
                    format!("Station {idx} has invalid demand variability {var}"),
                ));
            }
        }

        if let Some(forecast) = &decl.demand_forecast {
            if let Some(value) = forecast.iter().copied().find(|&v| v < 0) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidValue,
                    vec![idx],
                    format!("Station {idx} has negative demand forecast {value}"),
                ));
            }
        }

        for link in decl.next_stations_input.iter().flatten() {
            let next = link.next_station_index;
            if next >= n || next == idx {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidLink,
                    vec![idx],
                    format!("Station {idx} links to invalid station {next}"),
                ));
            }
            if !link.input_amount.is_finite() || link.input_amount < 0.0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidLink,
                    vec![idx],
                    format!(
                        "Station {idx} has invalid input amount {} towards station {next}",
                        link.input_amount
                    ),
                ));
            }
        }

        if !decl.past_buffer.is_empty() && decl.past_buffer.len() != config.past_horizon {
            errors.push(ValidationError::new(
                ValidationErrorKind::PastDataLength,
                vec![idx],
                format!(
                    "Station {idx} PastBuffer has {} values, PastHorizon is {}",
                    decl.past_buffer.len(),
                    config.past_horizon
                ),
            ));
        }
        if !decl.past_order_amount.is_empty()
            && decl.past_order_amount.len() != config.past_horizon
        {
            errors.push(ValidationError::new(
                ValidationErrorKind::PastDataLength,
                vec![idx],
                format!(
                    "Station {idx} PastOrderAmount has {} values, PastHorizon is {}",
                    decl.past_order_amount.len(),
                    config.past_horizon
                ),
            ));
        }
    }

    // Output stations need demand inputs
    let outputs = config.station_declarations.iter().filter(|d| d.is_output());
    let mut missing_demand = Vec::new();
    let mut wrong_length = Vec::new();
    for decl in outputs {
        match (&decl.demand_variability, &decl.demand_forecast) {
            (Some(_), Some(forecast)) => {
                if forecast.len() != config.planning_horizon {
                    wrong_length.push(decl.station_index);
                }
            }
            _ => missing_demand.push(decl.station_index),
        }
    }
    if !missing_demand.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingDemandData,
            missing_demand.clone(),
            format!(
                "Output stations {missing_demand:?} must declare DemandVariability and DemandForecast"
            ),
        ));
    }
    if !wrong_length.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::ForecastLength,
            wrong_length.clone(),
            format!(
                "Output stations {wrong_length:?} must forecast exactly {} instants",
                config.planning_horizon
            ),
        ));
    }

    if let Some(cycle_err) = detect_cycles(config) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the material flow graph using DFS.
///
/// # Algorithm
/// Topological sort via DFS. If a back-edge is found (visiting a node
/// currently in the recursion stack), a cycle exists.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
fn detect_cycles(config: &ModelConfig) -> Option<ValidationError> {
    let mut adj: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut all_ids: Vec<usize> = Vec::new();
    for decl in &config.station_declarations {
        all_ids.push(decl.station_index);
        for link in decl.next_stations_input.iter().flatten() {
            adj.entry(decl.station_index)
                .or_default()
                .push(link.next_station_index);
        }
    }
    all_ids.sort_unstable();

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for &node in &all_ids {
        if !visited.contains(&node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                vec![node],
                format!("Circular material flow detected involving station {node}"),
            ));
        }
    }

    None
}

fn has_cycle_dfs(
    node: usize,
    adj: &HashMap<usize, Vec<usize>>,
    visited: &mut HashSet<usize>,
    in_stack: &mut HashSet<usize>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(&node) {
        for &next in neighbors {
            if in_stack.contains(&next) {
                return true; // Back edge → cycle
            }
            if !visited.contains(&next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(&node);
    false
}
