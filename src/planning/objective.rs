//! Cost objective of a simulated plan.
//!
//! ```text
//! cost = w_b × mean_{buffered}( mean_t max(0, buffer) )
//!      + w_d × mean_{output}( mean_t max(0, demand - buffer) )
//! ```
//!
//! Both terms are non-negative. The search maximizes
//! [`fitness_from_objective`], the reciprocal of the cost.

use serde::{Deserialize, Serialize};

use crate::models::Station;

/// Weighted inventory / service cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    /// Weight of mean buffer inventory (default: 0.5).
    pub buffer_weight: f64,
    /// Weight of mean unsatisfied demand (default: 0.5).
    pub demand_weight: f64,
}

impl Default for Objective {
    fn default() -> Self {
        Self {
            buffer_weight: 0.5,
            demand_weight: 0.5,
        }
    }
}

impl Objective {
    /// Creates an objective with the given weights (negative weights clamp to 0).
    pub fn new(buffer_weight: f64, demand_weight: f64) -> Self {
        Self {
            buffer_weight: buffer_weight.max(0.0),
            demand_weight: demand_weight.max(0.0),
        }
    }

    /// Scores a set of simulated stations. Lower is better.
    pub fn evaluate(&self, stations: &[Station]) -> f64 {
        self.buffer_weight * mean_buffer_inventory(stations)
            + self.demand_weight * mean_unsatisfied_demand(stations)
    }
}

/// Mean over buffered stations of their time-averaged on-hand stock.
///
/// Backlog (negative buffer) counts as zero stock. 0 without buffers.
pub fn mean_buffer_inventory(stations: &[Station]) -> f64 {
    mean(
        stations
            .iter()
            .filter(|s| s.has_buffer)
            .map(|s| mean(s.states.iter().filter_map(|st| st.buffer).map(|b| b.max(0) as f64))),
    )
}

/// Mean over output stations of their time-averaged shortfall.
pub fn mean_unsatisfied_demand(stations: &[Station]) -> f64 {
    mean(stations.iter().filter(|s| s.is_output_station).map(|s| {
        mean(s.states.iter().filter_map(|st| {
            let demand = st.demand?;
            let buffer = st.buffer?;
            Some(demand.saturating_sub(buffer).max(0) as f64)
        }))
    }))
}

/// Maps a cost to a fitness to maximize.
///
/// Strictly decreasing for positive costs; a zero (or negative) cost maps
/// to `f64::MAX` instead of dividing by zero.
pub fn fitness_from_objective(objective: f64) -> f64 {
    if objective <= 0.0 {
        f64::MAX
    } else {
        1.0 / objective
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station_with(
        index: usize,
        buffered: bool,
        output: bool,
        buffers: &[i64],
        demands: &[i64],
    ) -> Station {
        let mut station = Station::new(index, 1.0, buffers.len());
        station.has_buffer = buffered;
        station.is_output_station = output;
        for (state, (&b, &d)) in station.states.iter_mut().zip(buffers.iter().zip(demands)) {
            state.buffer = Some(b);
            state.demand = Some(d);
        }
        station
    }

    #[test]
    fn test_inventory_term() {
        let stations = vec![
            station_with(0, true, false, &[10, 20, 30], &[0, 0, 0]),
            station_with(1, true, false, &[-6, 6, 0], &[0, 0, 0]),
            station_with(2, false, false, &[1000, 1000, 1000], &[0, 0, 0]),
        ];
        // (20 + 2) / 2
        assert!((mean_buffer_inventory(&stations) - 11.0).abs() < 1e-10);
    }

    #[test]
    fn test_unsatisfied_term() {
        let stations = vec![
            station_with(0, false, true, &[5, 0, -3], &[10, 4, 2]),
            station_with(1, true, false, &[0, 0, 0], &[99, 99, 99]),
        ];
        // shortfalls 5, 4, 5 over one output station
        assert!((mean_unsatisfied_demand(&stations) - 14.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_weighted_sum() {
        let stations = vec![station_with(0, true, true, &[4, 4], &[6, 6])];
        let objective = Objective::default();
        assert!((objective.evaluate(&stations) - (0.5 * 4.0 + 0.5 * 2.0)).abs() < 1e-10);

        let inventory_only = Objective::new(1.0, 0.0);
        assert!((inventory_only.evaluate(&stations) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_sets_cost_nothing() {
        let stations = vec![station_with(0, false, false, &[3], &[3])];
        assert_eq!(Objective::default().evaluate(&stations), 0.0);
    }

    #[test]
    fn test_negative_weights_clamped() {
        let objective = Objective::new(-1.0, 2.0);
        assert_eq!(objective.buffer_weight, 0.0);
        assert_eq!(objective.demand_weight, 2.0);
    }

    #[test]
    fn test_fitness_monotonic_inverse() {
        let costs = [0.001, 0.5, 1.0, 3.7, 250.0, 1e9];
        for pair in costs.windows(2) {
            assert!(fitness_from_objective(pair[0]) > fitness_from_objective(pair[1]));
        }
    }

    #[test]
    fn test_zero_cost_is_max_fitness() {
        assert_eq!(fitness_from_objective(0.0), f64::MAX);
        assert!(fitness_from_objective(0.0) > fitness_from_objective(1e-300));
    }
}
