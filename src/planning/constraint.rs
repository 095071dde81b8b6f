//! Feasibility constraints over a simulated plan.
//!
//! Constraints are checked after simulation. A violation means the
//! simulated state is inconsistent, not that the placement is bad.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::models::Station;

/// A constraint violation at one station and instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    /// Name of the violated constraint.
    pub constraint: String,
    /// Station index.
    pub station: usize,
    /// Instant index.
    pub instant: usize,
    /// Human-readable description.
    pub message: String,
}

/// A feasibility predicate over simulated stations.
pub trait Constraint: Send + Sync + Debug {
    /// Constraint name.
    fn name(&self) -> &'static str;

    /// All violations in the simulated state.
    fn violations(&self, stations: &[Station]) -> Vec<ConstraintViolation>;

    /// Whether the constraint holds everywhere.
    fn is_verified(&self, stations: &[Station]) -> bool {
        self.violations(stations).is_empty()
    }
}

/// Consistency of replenishment flags with the net-flow position.
///
/// Big-M linearization, for every station and decided instant:
///
/// ```text
/// M × (r - 1) ≤ has_buffer × (TOY - net_flow) ≤ M × r
/// ```
///
/// A buffered station must replenish exactly when `net_flow ≤ TOY`.
/// `M` bounds the largest `|TOY - net_flow|` the check tolerates and
/// should be sized to the line's volumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentsConstraint {
    /// Big-M bound (default: 1000).
    pub big_m: f64,
}

impl Default for ReplenishmentsConstraint {
    fn default() -> Self {
        Self { big_m: 1000.0 }
    }
}

impl ReplenishmentsConstraint {
    /// Creates the constraint with a custom big-M.
    pub fn new(big_m: f64) -> Self {
        Self { big_m }
    }
}

impl Constraint for ReplenishmentsConstraint {
    fn name(&self) -> &'static str {
        "Replenishments"
    }

    fn violations(&self, stations: &[Station]) -> Vec<ConstraintViolation> {
        const EPS: f64 = 1e-9;
        let m = self.big_m;
        let mut violations = Vec::new();

        for station in stations {
            let Some(toy) = station.toy() else {
                continue;
            };
            let b = if station.has_buffer { 1.0 } else { 0.0 };
            for state in &station.states {
                let Some(flag) = state.replenishment_flag else {
                    continue;
                };
                let r = if flag { 1.0 } else { 0.0 };
                let gap = b * (toy - state.net_flow() as f64);
                if m * (r - 1.0) > gap + EPS || gap > m * r + EPS {
                    violations.push(ConstraintViolation {
                        constraint: self.name().to_string(),
                        station: station.index,
                        instant: state.instant,
                        message: format!(
                            "replenishment={flag} inconsistent with TOY {toy:.2} and net flow {}",
                            state.net_flow()
                        ),
                    });
                }
            }
        }
        violations
    }
}
