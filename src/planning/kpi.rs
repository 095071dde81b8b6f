//! Plan quality metrics (KPIs).
//!
//! Computes standard DDMRP performance indicators from a simulated model.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Avg Inventory | Mean on-hand stock of buffered stations |
//! | Avg Inventory by Station | Same, per station (all stations) |
//! | Total Shortfall | Sum of max(0, demand - buffer) at output stations |
//! | Fill Rate | Fraction of output instants with buffer ≥ demand |
//! | Replenishments | Number of triggered replenishments |
//! | Buffered Stations | Number of decoupling points |
//!
//! # Reference
//! Ptak & Smith (2016), "DDMRP", Ch. 12: Metrics and Analytics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model::ProductionControlModel;
use super::objective::mean_buffer_inventory;

/// Plan performance indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanKpi {
    /// Mean on-hand stock over buffered stations.
    pub avg_inventory: f64,
    /// Mean on-hand stock per station index.
    pub inventory_by_station: BTreeMap<usize, f64>,
    /// Sum of shortfalls over output stations and instants.
    pub total_shortfall: i64,
    /// Fraction of output station instants fully served (0.0..1.0).
    pub fill_rate: f64,
    /// Number of triggered replenishments.
    pub replenishment_count: usize,
    /// Number of stations holding a buffer.
    pub buffered_stations: usize,
    /// Objective value of the plan.
    pub objective_value: f64,
}

impl PlanKpi {
    /// Computes KPIs from a simulated model.
    pub fn calculate(model: &ProductionControlModel) -> Self {
        let stations = model.stations();

        let inventory_by_station = stations
            .iter()
            .map(|s| {
                let series = s.buffer_series();
                let mean = if series.is_empty() {
                    0.0
                } else {
                    series.iter().map(|&b| b.max(0) as f64).sum::<f64>() / series.len() as f64
                };
                (s.index, mean)
            })
            .collect();

        let mut total_shortfall: i64 = 0;
        let mut served = 0usize;
        let mut observed = 0usize;
        for station in stations.iter().filter(|s| s.is_output_station) {
            for state in &station.states {
                if let (Some(demand), Some(buffer)) = (state.demand, state.buffer) {
                    observed += 1;
                    let shortfall = demand.saturating_sub(buffer).max(0);
                    total_shortfall = total_shortfall.saturating_add(shortfall);
                    if shortfall == 0 {
                        served += 1;
                    }
                }
            }
        }

        let fill_rate = if observed == 0 {
            1.0
        } else {
            served as f64 / observed as f64
        };

        let replenishment_count = stations
            .iter()
            .flat_map(|s| &s.states)
            .filter(|st| st.replenishment_flag == Some(true))
            .count();

        Self {
            avg_inventory: mean_buffer_inventory(stations),
            inventory_by_station,
            total_shortfall,
            fill_rate,
            replenishment_count,
            buffered_stations: stations.iter().filter(|s| s.has_buffer).count(),
            objective_value: model.objective_value(),
        }
    }

    /// Whether the plan meets the given service and stock thresholds.
    pub fn meets_thresholds(&self, min_fill_rate: f64, max_avg_inventory: f64) -> bool {
        self.fill_rate >= min_fill_rate && self.avg_inventory <= max_avg_inventory
    }
}
