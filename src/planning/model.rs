//! Production control model and its DDMRP simulation.
//!
//! # Algorithm
//!
//! Each [`ProductionControlModel::plan`] call recomputes everything from
//! the declared inputs and the activation vector:
//!
//! 1. Average demand, successors first: output stations use their forecast
//!    mean, others `Σ input_ratio[self][succ] × ADU[succ]`.
//! 2. Buffer flags from the activation vector.
//! 3. Demand variability, same successor-weighted sum (declared values kept).
//! 4. Decoupled lead time, predecessors first. An unbuffered predecessor
//!    passes on `processing_time + upstream lead time`, a buffered one
//!    passes on nothing.
//! 5. Lead-time factor `min(non-zero DLT) / DLT`.
//! 6. Instant 0 seeded from past data.
//! 7. Forward simulation. At each instant buffers are advanced first (they
//!    only depend on the previous instant), then demand, net flow and
//!    orders are resolved successors first so a station sees the orders
//!    its successors placed at the same instant.
//!
//! # Complexity
//! O(H × N²) per plan for horizon H and N stations.
//!
//! # Reference
//! Ptak & Smith (2016), "Demand Driven Material Requirements Planning", Ch. 6-9

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::constraint::{Constraint, ConstraintViolation};
use super::objective::Objective;
use crate::error::ModelError;
use crate::models::{BufferZones, PrecedenceGraph, Station};

/// Lifecycle of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelStatus {
    /// Built and validated, not simulated yet.
    InputsImported,
    /// At least one successful `plan` call.
    Planned,
}

/// Which stations may trigger replenishment orders.
///
/// Unbuffered internal stations never replenish. Whether an unbuffered
/// output station does is a planning policy choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReplenishmentPolicy {
    /// Only buffered stations replenish.
    #[default]
    BufferedOnly,
    /// Buffered stations and unbuffered output stations replenish.
    BufferedAndOutput,
}

impl ReplenishmentPolicy {
    /// Whether the station is allowed to place orders.
    pub fn may_replenish(&self, station: &Station) -> bool {
        match self {
            Self::BufferedOnly => station.has_buffer,
            Self::BufferedAndOutput => station.has_buffer || station.is_output_station,
        }
    }
}

/// When a forecast value inside the peak horizon counts as a spike.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PeakRule {
    /// Above `t × TOR`, `t` being the instant under planning. At instant 0
    /// every positive value qualifies.
    #[default]
    InstantScaled,
    /// Above a fixed multiple of TOR, whatever the instant.
    Fixed(f64),
}

impl PeakRule {
    /// Spike threshold at instant `t` for a buffer with top of red `tor`.
    pub fn threshold(&self, t: usize, tor: f64) -> f64 {
        match self {
            Self::InstantScaled => t as f64 * tor,
            Self::Fixed(multiple) => multiple * tor,
        }
    }
}

/// Simulation parameters that are not part of the line configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Replenishment rule for unbuffered stations.
    pub replenishment_policy: ReplenishmentPolicy,
    /// Spike qualification rule.
    pub peak_rule: PeakRule,
}

/// A production line with its DDMRP state, ready to be simulated.
///
/// Built by [`super::ModelBuilder`]; each instance owns its stations, while
/// the precedence graph is shared read-only between clones.
#[derive(Debug, Clone)]
pub struct ProductionControlModel {
    stations: Vec<Station>,
    graph: Arc<PrecedenceGraph>,
    planning_horizon: usize,
    peak_horizon: usize,
    past_horizon: usize,
    settings: SimulationSettings,
    objective: Objective,
    constraints: Vec<Arc<dyn Constraint>>,
    status: ModelStatus,
}

impl ProductionControlModel {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        stations: Vec<Station>,
        graph: Arc<PrecedenceGraph>,
        planning_horizon: usize,
        peak_horizon: usize,
        past_horizon: usize,
        settings: SimulationSettings,
        objective: Objective,
        constraints: Vec<Arc<dyn Constraint>>,
    ) -> Self {
        Self {
            stations,
            graph,
            planning_horizon,
            peak_horizon,
            past_horizon,
            settings,
            objective,
            constraints,
            status: ModelStatus::InputsImported,
        }
    }

    /// Simulates the line for the given buffer placement.
    ///
    /// `buffers_activation[i]` decides whether station `i` holds a buffer.
    /// Previous results are discarded, so repeated calls with the same
    /// vector produce identical timelines.
    ///
    /// # Errors
    /// - [`ModelError::ActivationLength`] if the vector length differs from
    ///   the station count.
    /// - [`ModelError::UndefinedZones`] if a station's zones cannot be
    ///   derived (e.g. it sits on a cycle).
    pub fn plan(&mut self, buffers_activation: &[bool]) -> Result<(), ModelError> {
        if buffers_activation.len() != self.stations.len() {
            return Err(ModelError::ActivationLength {
                expected: self.stations.len(),
                actual: buffers_activation.len(),
            });
        }

        for station in &mut self.stations {
            station.reset_derived();
        }
        self.propagate_average_demand();
        for (station, &active) in self.stations.iter_mut().zip(buffers_activation) {
            station.has_buffer = active;
        }
        self.propagate_variability();
        self.propagate_lead_times();
        self.assign_lead_time_factors();

        let zones = self
            .stations
            .iter()
            .map(|s| s.zones().ok_or(ModelError::UndefinedZones { station: s.index }))
            .collect::<Result<Vec<_>, _>>()?;

        self.seed_initial_instant(&zones);
        for t in 1..self.planning_horizon {
            self.advance_buffers(t);
            self.resolve_orders(t, &zones);
        }

        self.status = ModelStatus::Planned;
        Ok(())
    }

    fn propagate_average_demand(&mut self) {
        let graph = Arc::clone(&self.graph);
        for &s in graph.topological_order().iter().rev() {
            let value = if self.stations[s].is_output_station {
                self.stations[s].forecast_mean()
            } else {
                graph
                    .successors(s)
                    .map(|succ| Some(graph.input_ratio(s, succ) * self.stations[succ].average_demand?))
                    .sum::<Option<f64>>()
            };
            self.stations[s].average_demand = value;
        }
    }

    fn propagate_variability(&mut self) {
        let graph = Arc::clone(&self.graph);
        for &s in graph.topological_order().iter().rev() {
            if self.stations[s].variability_declared {
                continue;
            }
            let value = graph
                .successors(s)
                .map(|succ| {
                    Some(graph.input_ratio(s, succ) * self.stations[succ].demand_variability?)
                })
                .sum::<Option<f64>>();
            self.stations[s].demand_variability = value;
        }
    }

    fn propagate_lead_times(&mut self) {
        let graph = Arc::clone(&self.graph);
        for &s in graph.topological_order() {
            let (upstream, dlt) = if self.stations[s].is_input_station {
                let station = &self.stations[s];
                let dlt = if station.has_buffer {
                    0.0
                } else {
                    station.processing_time
                };
                (Some(station.lead_time.unwrap_or(0.0)), Some(dlt))
            } else {
                let upstream = graph
                    .predecessors(s)
                    .map(|p| {
                        let weight = f64::from(graph.adjacency(p, s));
                        Some(weight * self.stations[p].lead_time_contribution()?)
                    })
                    .sum::<Option<f64>>();
                (upstream, upstream.map(|u| u + self.stations[s].processing_time))
            };
            self.stations[s].upstream_lead_time = upstream;
            self.stations[s].decoupled_lead_time = dlt;
        }
    }

    fn assign_lead_time_factors(&mut self) {
        let min_lead_time = self
            .stations
            .iter()
            .filter_map(|s| s.decoupled_lead_time)
            .filter(|&dlt| dlt > 0.0)
            .fold(f64::INFINITY, f64::min);

        for station in &mut self.stations {
            station.lead_time_factor = station.decoupled_lead_time.map(|dlt| {
                if dlt > 0.0 {
                    min_lead_time / dlt
                } else {
                    0.0
                }
            });
        }
    }

    fn seed_initial_instant(&mut self, zones: &[BufferZones]) {
        for station in &mut self.stations {
            let seed_buffer = station.seed_buffer();
            let seed_order = station.seed_order();
            let state = &mut station.states[0];
            state.buffer = Some(seed_buffer);
            state.order_amount = Some(seed_order);
            state.on_order_inventory = Some(0);
        }
        let graph = Arc::clone(&self.graph);
        for s in 0..self.stations.len() {
            let demand = self.demand_at(&graph, s, 0);
            let peak = self.peak_demand(s, 0, zones[s].tor);
            let state = &mut self.stations[s].states[0];
            state.demand = Some(demand);
            state.qualified_demand = Some(demand.saturating_add(peak));
        }
    }

    /// `buffer[t] = buffer[t-1] + incoming - demand[t-1]` for every station.
    fn advance_buffers(&mut self, t: usize) {
        for station in &mut self.stations {
            let lead = station.lead_time_steps();
            let incoming = if t > lead {
                station.states[t - 1 - lead].order_amount.unwrap_or(0)
            } else {
                0
            };
            let previous = &station.states[t - 1];
            let buffer = previous
                .buffer
                .unwrap_or(0)
                .saturating_add(incoming)
                .saturating_sub(previous.demand.unwrap_or(0));
            station.states[t].buffer = Some(buffer);
        }
    }

    /// Demand, net flow and order decisions at `t`, successors first.
    fn resolve_orders(&mut self, t: usize, zones: &[BufferZones]) {
        let graph = Arc::clone(&self.graph);
        for &s in graph.topological_order().iter().rev() {
            let demand = self.demand_at(&graph, s, t);
            let peak = self.peak_demand(s, t, zones[s].tor);
            let available = self.available_upstream(&graph, s, t);

            let station = &mut self.stations[s];
            let lead = station.lead_time_steps();
            let on_order = station.states[t.saturating_sub(lead)..t]
                .iter()
                .map(|st| st.order_amount.unwrap_or(0))
                .fold(0i64, i64::saturating_add);
            let may_replenish = self.settings.replenishment_policy.may_replenish(station);

            let state = &mut station.states[t];
            state.demand = Some(demand);
            state.qualified_demand = Some(demand.saturating_add(peak));
            state.on_order_inventory = Some(on_order);

            let net_flow = state.net_flow();
            let replenish = may_replenish && (net_flow as f64) <= zones[s].toy;
            let order = if replenish {
                let wanted = (zones[s].tog - net_flow as f64).ceil() as i64;
                available.map_or(wanted, |cap| wanted.min(cap)).max(0)
            } else {
                0
            };
            state.replenishment_flag = Some(replenish);
            state.order_amount = Some(order);
        }
    }

    /// Forecast for output stations, successors' orders otherwise.
    fn demand_at(&self, graph: &PrecedenceGraph, s: usize, t: usize) -> i64 {
        let station = &self.stations[s];
        if station.is_output_station {
            return station.forecast_at(t);
        }
        let requested: f64 = graph
            .successors(s)
            .map(|succ| {
                let order = self.stations[succ].states[t].order_amount.unwrap_or(0);
                graph.input_ratio(s, succ) * order as f64
            })
            .sum();
        requested.ceil() as i64
    }

    /// Largest forecast spike within the peak horizon after `t`, or 0.
    fn peak_demand(&self, s: usize, t: usize, tor: f64) -> i64 {
        let station = &self.stations[s];
        let Some(forecast) = station.demand_forecast.as_ref() else {
            return 0;
        };
        let threshold = self.settings.peak_rule.threshold(t, tor);
        let end = t
            .saturating_add(self.peak_horizon)
            .min(self.planning_horizon.saturating_sub(1));
        (t + 1..=end)
            .filter_map(|i| forecast.get(i).copied())
            .filter(|&value| value as f64 > threshold)
            .max()
            .unwrap_or(0)
    }

    /// Upstream stock a station can draw from. `None` for input stations,
    /// which are supplied externally.
    fn available_upstream(&self, graph: &PrecedenceGraph, s: usize, t: usize) -> Option<i64> {
        if self.stations[s].is_input_station {
            return None;
        }
        let stock: f64 = graph
            .predecessors(s)
            .map(|p| {
                let buffer = self.stations[p].states[t].buffer.unwrap_or(0);
                graph.input_ratio(p, s) * buffer as f64
            })
            .sum();
        Some(stock.max(0.0).floor() as i64)
    }

    /// All stations, ordered by index.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// A station by index.
    pub fn station(&self, index: usize) -> Option<&Station> {
        self.stations.get(index)
    }

    /// Number of stations.
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Precedence graph.
    pub fn graph(&self) -> &PrecedenceGraph {
        &self.graph
    }

    /// Number of simulated instants.
    pub fn planning_horizon(&self) -> usize {
        self.planning_horizon
    }

    /// Instants after `t` scanned for demand spikes.
    pub fn peak_horizon(&self) -> usize {
        self.peak_horizon
    }

    /// Length of the past buffer and order series.
    pub fn past_horizon(&self) -> usize {
        self.past_horizon
    }

    /// Replenishment and spike rules in use.
    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Whether the model has been planned.
    pub fn status(&self) -> ModelStatus {
        self.status
    }

    /// Objective used to score this model.
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Objective value of the current state.
    pub fn objective_value(&self) -> f64 {
        self.objective.evaluate(&self.stations)
    }

    /// Current buffer placement, one flag per station.
    pub fn buffer_activation(&self) -> Vec<bool> {
        self.stations.iter().map(|s| s.has_buffer).collect()
    }

    /// Registered feasibility constraints.
    pub fn constraints(&self) -> &[Arc<dyn Constraint>] {
        &self.constraints
    }

    /// Violations of every registered constraint.
    pub fn verify_constraints(&self) -> Vec<ConstraintViolation> {
        self.constraints
            .iter()
            .flat_map(|c| c.violations(&self.stations))
            .collect()
    }

    /// Whether every registered constraint holds.
    pub fn is_feasible(&self) -> bool {
        self.constraints.iter().all(|c| c.is_verified(&self.stations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModelConfig, StationDeclaration};
    use crate::planning::{ModelBuilder, PlanKpi};

    /// Station 0 (input) feeds station 1 (output), horizon 5, demand 10.
    fn two_station_config() -> ModelConfig {
        ModelConfig::new(5)
            .with_station(StationDeclaration::new(0, 2.0).with_next(1, 1.0))
            .with_station(StationDeclaration::new(1, 1.0).with_demand(0.0, vec![10; 5]))
    }

    // 0 ─┐
    //    ├─> 2 ─> 3
    // 1 ─┘
    fn assembly_config() -> ModelConfig {
        ModelConfig::new(12)
            .with_peak_horizon(3)
            .with_station(
                StationDeclaration::new(0, 2.0)
                    .with_lead_time(1.0)
                    .with_initial_buffer(80)
                    .with_next(2, 1.0),
            )
            .with_station(
                StationDeclaration::new(1, 1.0)
                    .with_initial_buffer(150)
                    .with_next(2, 2.0),
            )
            .with_station(
                StationDeclaration::new(2, 3.0)
                    .with_initial_buffer(60)
                    .with_next(3, 1.0),
            )
            .with_station(
                StationDeclaration::new(3, 1.0)
                    .with_initial_buffer(40)
                    .with_demand(0.3, vec![8, 12, 10, 9, 30, 11, 10, 8, 12, 10, 9, 11]),
            )
    }

    fn build(config: &ModelConfig) -> ProductionControlModel {
        ModelBuilder::new().build(config).unwrap()
    }

    fn planned(config: &ModelConfig, activation: &[bool]) -> ProductionControlModel {
        let mut model = build(config);
        model.plan(activation).unwrap();
        model
    }

    #[test]
    fn test_average_demand_two_stations() {
        let model = planned(&two_station_config(), &[false, true]);
        assert!((model.stations()[1].average_demand.unwrap() - 10.0).abs() < 1e-10);
        assert!((model.stations()[0].average_demand.unwrap() - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_output_buffer_lead_time() {
        let config = two_station_config();
        let model = planned(&config, &[false, true]);
        // PT[1] + 1 × (1 - 0) × (PT[0] + LT[0]), no raw lead time declared
        let expected = 1.0 + 1.0 * (1.0 - 0.0) * (2.0 + 0.0);
        assert!((model.stations()[1].decoupled_lead_time.unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn test_both_buffered_decouples_upstream() {
        let config = two_station_config();
        let single = planned(&config, &[false, true]);
        let both = planned(&config, &[true, true]);

        assert_eq!(both.stations()[0].lead_time_contribution(), Some(0.0));
        assert_eq!(both.stations()[1].upstream_lead_time, Some(0.0));
        let dlt_single = single.stations()[1].decoupled_lead_time.unwrap();
        let dlt_both = both.stations()[1].decoupled_lead_time.unwrap();
        assert!(dlt_both < dlt_single);
        assert!((dlt_both - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_buffered_input_has_zero_lead_time() {
        let model = planned(&assembly_config(), &[true, true, false, true]);
        assert_eq!(model.stations()[0].decoupled_lead_time, Some(0.0));
        assert_eq!(model.stations()[1].decoupled_lead_time, Some(0.0));
        // Buffered predecessors add nothing whatever their processing time
        assert_eq!(model.stations()[2].upstream_lead_time, Some(0.0));
        assert_eq!(model.stations()[2].decoupled_lead_time, Some(3.0));
    }

    #[test]
    fn test_lead_time_accumulates_through_unbuffered_chain() {
        let model = planned(&assembly_config(), &[false, false, false, true]);
        // U(2) = (2 + 1) + (1 + 0); DLT(2) = U(2) + 3; U(3) = DLT(2)
        assert_eq!(model.stations()[2].upstream_lead_time, Some(4.0));
        assert_eq!(model.stations()[2].decoupled_lead_time, Some(7.0));
        assert_eq!(model.stations()[3].decoupled_lead_time, Some(8.0));
    }

    #[test]
    fn test_demand_conservation() {
        let model = planned(&assembly_config(), &[true, false, true, true]);
        let graph = model.graph();
        for station in model.stations().iter().filter(|s| !s.is_output_station) {
            let expected: f64 = graph
                .successors(station.index)
                .map(|succ| {
                    graph.input_ratio(station.index, succ)
                        * model.stations()[succ].average_demand.unwrap()
                })
                .sum();
            assert!((station.average_demand.unwrap() - expected).abs() < 1e-9);
        }
        let adu3 = model.stations()[3].average_demand.unwrap();
        assert!((model.stations()[1].average_demand.unwrap() - 2.0 * adu3).abs() < 1e-9);
    }

    #[test]
    fn test_variability_propagates() {
        let model = planned(&assembly_config(), &[true, true, true, true]);
        assert_eq!(model.stations()[3].demand_variability, Some(0.3));
        assert!((model.stations()[2].demand_variability.unwrap() - 0.3).abs() < 1e-10);
        assert!((model.stations()[1].demand_variability.unwrap() - 0.6).abs() < 1e-10);
    }

    #[test]
    fn test_lead_time_factor() {
        let model = planned(&assembly_config(), &[false, false, false, true]);
        // DLTs: 2, 1, 7, 8 → min 1
        let factors: Vec<f64> = model
            .stations()
            .iter()
            .map(|s| s.lead_time_factor.unwrap())
            .collect();
        assert!((factors[0] - 0.5).abs() < 1e-10);
        assert!((factors[1] - 1.0).abs() < 1e-10);
        assert!((factors[3] - 0.125).abs() < 1e-10);

        let buffered = planned(&assembly_config(), &[true, false, false, true]);
        assert_eq!(buffered.stations()[0].lead_time_factor, Some(0.0));
    }

    #[test]
    fn test_buffer_recursion() {
        let model = planned(&assembly_config(), &[true, true, true, true]);
        for station in model.stations() {
            let lead = station.lead_time_steps();
            for t in 1..model.planning_horizon() {
                let prev = &station.states[t - 1];
                let incoming = if t > lead {
                    station.states[t - 1 - lead].order_amount.unwrap()
                } else {
                    0
                };
                assert_eq!(
                    station.states[t].buffer.unwrap(),
                    prev.buffer.unwrap() + incoming - prev.demand.unwrap()
                );
            }
        }
    }

    #[test]
    fn test_causality() {
        // Same mean, different late demand
        let mut early = assembly_config().with_peak_horizon(0);
        let mut late = early.clone();
        early.station_declarations[3].demand_forecast =
            Some(vec![8, 12, 10, 9, 30, 11, 10, 8, 12, 10, 9, 11]);
        late.station_declarations[3].demand_forecast =
            Some(vec![8, 12, 10, 9, 30, 11, 10, 8, 12, 9, 10, 11]);

        let activation = [true, true, true, true];
        let a = planned(&early, &activation);
        let b = planned(&late, &activation);

        // Demand diverges at instant 9; buffers up to 9 must match
        for (sa, sb) in a.stations().iter().zip(b.stations()) {
            for t in 0..=9 {
                assert_eq!(sa.states[t].buffer, sb.states[t].buffer, "station {} t {}", sa.index, t);
            }
        }
        assert_ne!(
            a.stations()[3].states[10].buffer,
            b.stations()[3].states[10].buffer
        );
    }

    #[test]
    fn test_idempotent_plan() {
        let config = assembly_config();
        let activation = [true, false, true, true];
        let mut model = build(&config);
        model.plan(&activation).unwrap();
        let first: Vec<_> = model.stations().iter().map(|s| s.states.clone()).collect();
        model.plan(&activation).unwrap();
        let second: Vec<_> = model.stations().iter().map(|s| s.states.clone()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_replan_with_other_vector_forgets_previous() {
        let config = assembly_config();
        let mut reused = build(&config);
        reused.plan(&[true, true, true, true]).unwrap();
        reused.plan(&[false, true, false, true]).unwrap();
        let fresh = planned(&config, &[false, true, false, true]);
        for (a, b) in reused.stations().iter().zip(fresh.stations()) {
            assert_eq!(a.states, b.states);
            assert_eq!(a.decoupled_lead_time, b.decoupled_lead_time);
        }
    }

    #[test]
    fn test_no_buffers_simulates() {
        let model = planned(&assembly_config(), &[false; 4]);
        assert_eq!(model.status(), ModelStatus::Planned);
        for station in model.stations() {
            assert!(station.states.iter().all(|s| s.buffer.is_some()));
            assert!(station.states[1..]
                .iter()
                .all(|s| s.replenishment_flag == Some(false)));
        }
        // Output keeps consuming its initial stock
        let output = &model.stations()[3];
        assert_eq!(output.states[1].buffer, Some(40 - 8));
    }

    #[test]
    fn test_output_policy_replenishes_unbuffered_output() {
        let config = assembly_config();
        let mut model = ModelBuilder::new()
            .with_replenishment_policy(ReplenishmentPolicy::BufferedAndOutput)
            .build(&config)
            .unwrap();
        model.plan(&[false; 4]).unwrap();
        let output = &model.stations()[3];
        assert!(output.states[1..]
            .iter()
            .any(|s| s.replenishment_flag == Some(true)));
        assert!(model.stations()[2].states[1..]
            .iter()
            .all(|s| s.replenishment_flag == Some(false)));
    }

    #[test]
    fn test_orders_capped_by_upstream_stock() {
        let model = planned(&assembly_config(), &[true, true, true, true]);
        let graph = model.graph();
        let station = &model.stations()[2];
        for t in 1..model.planning_horizon() {
            let stock: f64 = graph
                .predecessors(2)
                .map(|p| graph.input_ratio(p, 2) * model.stations()[p].states[t].buffer.unwrap() as f64)
                .sum();
            let order = station.states[t].order_amount.unwrap();
            assert!(order >= 0);
            assert!(order as f64 <= stock.max(0.0));
        }
    }

    #[test]
    fn test_successor_orders_become_demand() {
        let model = planned(&assembly_config(), &[true, true, true, true]);
        for t in 0..model.planning_horizon() {
            let order2 = model.stations()[2].states[t].order_amount.unwrap();
            assert_eq!(model.stations()[0].states[t].demand, Some(order2));
            assert_eq!(model.stations()[1].states[t].demand, Some(2 * order2));
        }
    }

    #[test]
    fn test_replenishment_follows_net_flow() {
        let model = planned(&assembly_config(), &[true, true, true, true]);
        for station in model.stations() {
            let toy = station.toy().unwrap();
            for state in &station.states[1..] {
                let expected = (state.net_flow() as f64) <= toy;
                assert_eq!(state.replenishment_flag, Some(expected));
            }
        }
        assert!(model.is_feasible());
    }

    #[test]
    fn test_peak_qualifies_demand() {
        // Spike of 30 at instant 4 is within reach from instants 1..=3
        let model = planned(&assembly_config(), &[true, true, true, true]);
        let output = &model.stations()[3];
        let tor = output.tor().unwrap();
        assert!(30.0 > tor && 30.0 < 2.0 * tor);
        let state = &output.states[1];
        assert_eq!(state.qualified_demand, Some(state.demand.unwrap() + 30));
        // At instant 2 the threshold is 2 × TOR
        let state = &output.states[2];
        assert_eq!(state.qualified_demand, state.demand);

        let flat = planned(&assembly_config().with_peak_horizon(0), &[true, true, true, true]);
        let state = &flat.stations()[3].states[1];
        assert_eq!(state.qualified_demand, state.demand);
    }

    // ADU = 80 / 6, DLT = 1, LTF = 1, no variability: TOR = 13.33
    fn spike_config() -> ModelConfig {
        ModelConfig::new(6)
            .with_peak_horizon(3)
            .with_station(StationDeclaration::new(0, 1.0).with_next(1, 1.0))
            .with_station(
                StationDeclaration::new(1, 1.0).with_demand(0.0, vec![10, 10, 10, 10, 30, 10]),
            )
    }

    #[test]
    fn test_peak_threshold_grows_with_instant() {
        let model = planned(&spike_config(), &[true, true]);
        let output = &model.stations()[1];
        assert!((output.tor().unwrap() - 80.0 / 6.0).abs() < 1e-10);
        // 30 > 1 × TOR but not > 3 × TOR
        assert_eq!(output.states[1].qualified_demand, Some(40));
        assert_eq!(output.states[3].qualified_demand, Some(10));
    }

    #[test]
    fn test_fixed_peak_threshold() {
        let mut model = ModelBuilder::new()
            .with_peak_threshold(1.0)
            .build(&spike_config())
            .unwrap();
        model.plan(&[true, true]).unwrap();
        assert_eq!(model.settings().peak_rule, PeakRule::Fixed(1.0));
        assert_eq!(model.stations()[1].states[3].qualified_demand, Some(40));
    }

    #[test]
    fn test_unbounded_peak_horizon() {
        let config = assembly_config().with_peak_horizon(usize::MAX);
        let mut model = build(&config);
        model.plan(&[true, true, true, true]).unwrap();
        assert_eq!(model.status(), ModelStatus::Planned);
        // The window is clipped to the planning horizon
        let bounded = planned(&assembly_config().with_peak_horizon(12), &[true, true, true, true]);
        assert_eq!(model.stations()[3].states, bounded.stations()[3].states);
    }

    #[test]
    fn test_large_forecast_saturates() {
        let big = i64::MAX / 2;
        let config = ModelConfig::new(5)
            .with_peak_horizon(2)
            .with_station(
                StationDeclaration::new(0, 1.0)
                    .with_initial_buffer(big)
                    .with_next(1, 1.0),
            )
            .with_station(
                StationDeclaration::new(1, 1.0)
                    .with_initial_buffer(big)
                    .with_demand(0.5, vec![big; 5]),
            );
        for activation in [[true, true], [false, true], [true, false], [false, false]] {
            let model = planned(&config, &activation);
            assert_eq!(model.status(), ModelStatus::Planned);
            for state in &model.stations()[1].states {
                assert!(state.qualified_demand.unwrap() >= big);
            }
            assert!(model.objective_value().is_finite());
            assert!(PlanKpi::calculate(&model).total_shortfall > 0);
        }
    }

    #[test]
    fn test_activation_length_mismatch() {
        let mut model = build(&two_station_config());
        let err = model.plan(&[true]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::ActivationLength {
                expected: 2,
                actual: 1
            }
        ));
        assert_eq!(model.status(), ModelStatus::InputsImported);
    }

    #[test]
    fn test_seeded_instant_zero() {
        let config = ModelConfig::new(3)
            .with_past_horizon(2)
            .with_station(
                StationDeclaration::new(0, 1.0)
                    .with_past(vec![4, 9], vec![1, 3])
                    .with_next(1, 1.0),
            )
            .with_station(StationDeclaration::new(1, 1.0).with_demand(0.0, vec![2, 2, 2]));
        let model = planned(&config, &[true, true]);
        let s0 = &model.stations()[0].states[0];
        assert_eq!(s0.buffer, Some(9));
        assert_eq!(s0.order_amount, Some(3));
        assert_eq!(s0.replenishment_flag, None);
        assert_eq!(model.stations()[1].states[0].demand, Some(2));
    }
}
