//! Builds validated production control models from a configuration.

use std::sync::Arc;

use tracing::debug;

use super::constraint::{Constraint, ReplenishmentsConstraint};
use super::model::{PeakRule, ProductionControlModel, ReplenishmentPolicy, SimulationSettings};
use super::objective::Objective;
use crate::error::ModelError;
use crate::models::{ModelConfig, PrecedenceGraph, Station};
use crate::validation::validate_config;

/// Factory for [`ProductionControlModel`].
///
/// Validation is all-or-nothing: a configuration with any problem yields
/// [`ModelError::InvalidConfig`] listing every problem, never a partial model.
///
/// # Example
/// ```
/// use u_ddmrp::models::{ModelConfig, StationDeclaration};
/// use u_ddmrp::planning::{ModelBuilder, ModelStatus};
///
/// let config = ModelConfig::new(5)
///     .with_station(StationDeclaration::new(0, 2.0).with_next(1, 1.0))
///     .with_station(StationDeclaration::new(1, 1.0).with_demand(0.0, vec![10; 5]));
///
/// let mut model = ModelBuilder::new().build(&config).unwrap();
/// assert_eq!(model.status(), ModelStatus::InputsImported);
/// model.plan(&[false, true]).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    settings: SimulationSettings,
    objective: Objective,
    constraints: Vec<Arc<dyn Constraint>>,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBuilder {
    /// Creates a builder with default settings, the default objective and
    /// the replenishment constraint.
    pub fn new() -> Self {
        Self {
            settings: SimulationSettings::default(),
            objective: Objective::default(),
            constraints: vec![Arc::new(ReplenishmentsConstraint::default())],
        }
    }

    /// Sets the objective.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    /// Sets all simulation settings.
    pub fn with_settings(mut self, settings: SimulationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the replenishment policy.
    pub fn with_replenishment_policy(mut self, policy: ReplenishmentPolicy) -> Self {
        self.settings.replenishment_policy = policy;
        self
    }

    /// Sets the spike qualification rule.
    pub fn with_peak_rule(mut self, rule: PeakRule) -> Self {
        self.settings.peak_rule = rule;
        self
    }

    /// Qualifies spikes above a fixed multiple of TOR instead of `t × TOR`.
    pub fn with_peak_threshold(self, multiple: f64) -> Self {
        self.with_peak_rule(PeakRule::Fixed(multiple.max(0.0)))
    }

    /// Replaces the constraint set with a single constraint.
    pub fn with_constraint<C: Constraint + 'static>(mut self, constraint: C) -> Self {
        self.constraints = vec![Arc::new(constraint)];
        self
    }

    /// Adds a constraint to the set.
    pub fn add_constraint<C: Constraint + 'static>(mut self, constraint: C) -> Self {
        self.constraints.push(Arc::new(constraint));
        self
    }

    /// Validates `config` and assembles a model in status `InputsImported`.
    pub fn build(&self, config: &ModelConfig) -> Result<ProductionControlModel, ModelError> {
        validate_config(config).map_err(ModelError::InvalidConfig)?;

        let n = config.station_count();
        let graph = PrecedenceGraph::from_links(n, &config.links());

        let mut declarations: Vec<_> = config.station_declarations.iter().collect();
        declarations.sort_by_key(|d| d.station_index);

        let stations: Vec<Station> = declarations
            .into_iter()
            .map(|decl| {
                let idx = decl.station_index;
                let mut station = Station::new(idx, decl.processing_time, config.planning_horizon);
                station.lead_time = decl.lead_time;
                station.initial_buffer = decl.initial_buffer;
                station.past_buffer = decl.past_buffer.clone();
                station.past_order_amount = decl.past_order_amount.clone();
                station.demand_forecast = decl.demand_forecast.clone();
                if let Some(var) = decl.demand_variability {
                    station = station.with_demand_variability(var);
                }
                station.is_input_station = graph.is_input(idx);
                station.is_output_station = graph.is_output(idx);

                let (seed_buffer, seed_order) = (station.seed_buffer(), station.seed_order());
                let state = &mut station.states[0];
                state.buffer = Some(seed_buffer);
                state.order_amount = Some(seed_order);
                station
            })
            .collect();

        debug!(
            stations = n,
            horizon = config.planning_horizon,
            inputs = stations.iter().filter(|s| s.is_input_station).count(),
            outputs = stations.iter().filter(|s| s.is_output_station).count(),
            "production control model built"
        );

        Ok(ProductionControlModel::from_parts(
            stations,
            Arc::new(graph),
            config.planning_horizon,
            config.peak_horizon,
            config.past_horizon,
            self.settings,
            self.objective,
            self.constraints.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StationDeclaration;
    use crate::planning::ModelStatus;
    use crate::validation::ValidationErrorKind;

    fn line_config() -> ModelConfig {
        ModelConfig::new(4)
            .with_past_horizon(3)
            .with_station(
                StationDeclaration::new(1, 1.0)
                    .with_past(vec![7, 8, 9], vec![0, 1, 2])
                    .with_demand(0.1, vec![5, 5, 5, 5]),
            )
            .with_station(
                StationDeclaration::new(0, 2.0)
                    .with_lead_time(3.0)
                    .with_initial_buffer(25)
                    .with_next(1, 2.0),
            )
    }

    #[test]
    fn test_build_assembles_model() {
        let model = ModelBuilder::new().build(&line_config()).unwrap();
        assert_eq!(model.status(), ModelStatus::InputsImported);
        assert_eq!(model.station_count(), 2);
        assert_eq!(model.planning_horizon(), 4);
        assert_eq!(model.past_horizon(), 3);

        let s0 = &model.stations()[0];
        let s1 = &model.stations()[1];
        assert_eq!(s0.index, 0);
        assert!(s0.is_input_station && !s0.is_output_station);
        assert!(s1.is_output_station && !s1.is_input_station);
        assert_eq!(s0.lead_time, Some(3.0));
        assert!(s1.variability_declared);
        assert_eq!(s1.states.len(), 4);

        assert_eq!(model.graph().adjacency(0, 1), 1);
        assert!((model.graph().input_ratio(0, 1) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_instant_zero_seeded() {
        let model = ModelBuilder::new().build(&line_config()).unwrap();
        assert_eq!(model.stations()[0].states[0].buffer, Some(25));
        assert_eq!(model.stations()[0].states[0].order_amount, Some(0));
        assert_eq!(model.stations()[1].states[0].buffer, Some(9));
        assert_eq!(model.stations()[1].states[0].order_amount, Some(2));
        assert!(model.stations()[1].states[1].buffer.is_none());
    }

    #[test]
    fn test_invalid_config_builds_nothing() {
        let mut config = line_config();
        config.station_declarations[0].demand_forecast = Some(vec![1, 2]);
        let err = ModelBuilder::new().build(&config).unwrap_err();
        let errors = err.validation_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::ForecastLength);
        assert_eq!(errors[0].stations, vec![1]);
        assert!(err.to_string().contains("forecast length"));
    }

    #[test]
    fn test_builder_options() {
        let builder = ModelBuilder::new()
            .with_objective(Objective::new(0.2, 0.8))
            .with_replenishment_policy(ReplenishmentPolicy::BufferedAndOutput)
            .with_peak_threshold(0.5)
            .add_constraint(ReplenishmentsConstraint::new(50.0));
        let model = builder.build(&line_config()).unwrap();
        assert_eq!(model.objective().demand_weight, 0.8);
        assert_eq!(
            model.settings().replenishment_policy,
            ReplenishmentPolicy::BufferedAndOutput
        );
        assert_eq!(model.settings().peak_rule, PeakRule::Fixed(0.5));
        let clamped = ModelBuilder::new()
            .with_peak_threshold(-2.0)
            .build(&line_config())
            .unwrap();
        assert_eq!(clamped.settings().peak_rule, PeakRule::Fixed(0.0));
        let default = ModelBuilder::new().build(&line_config()).unwrap();
        assert_eq!(default.settings().peak_rule, PeakRule::InstantScaled);
        assert_eq!(model.constraints().len(), 2);

        let single = ModelBuilder::new()
            .with_constraint(ReplenishmentsConstraint::new(10.0))
            .build(&line_config())
            .unwrap();
        assert_eq!(single.constraints().len(), 1);
    }
}
