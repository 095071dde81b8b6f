//! Search outcome.

use crate::planning::{PlanKpi, ProductionControlModel};

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Best fitness did not improve for `stagnation_limit` generations.
    Stagnation,
    /// `max_generations` reached.
    GenerationCap,
}

/// Result of a buffer placement search.
///
/// Holds the re-simulated best plan together with the search trace. All
/// fitness values are placement fitness (`1 / objective`, higher is better).
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    final_model: ProductionControlModel,
    fitness_history: Vec<f64>,
    evaluations: Vec<f64>,
    best_fitness: f64,
    generations: usize,
    termination: TerminationReason,
}

impl OptimizationResult {
    pub(crate) fn new(
        final_model: ProductionControlModel,
        fitness_history: Vec<f64>,
        evaluations: Vec<f64>,
        best_fitness: f64,
        generations: usize,
        termination: TerminationReason,
    ) -> Self {
        Self {
            final_model,
            fitness_history,
            evaluations,
            best_fitness,
            generations,
            termination,
        }
    }

    /// The best candidate, planned.
    pub fn final_model(&self) -> &ProductionControlModel {
        &self.final_model
    }

    /// Consumes the result, returning the planned model.
    pub fn into_model(self) -> ProductionControlModel {
        self.final_model
    }

    /// Best fitness of the initial population, then after each generation.
    pub fn fitness_history(&self) -> &[f64] {
        &self.fitness_history
    }

    /// Every fitness value computed, in evaluation order.
    pub fn evaluations(&self) -> &[f64] {
        &self.evaluations
    }

    /// Fitness of the returned placement.
    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    /// Generations bred after the initial population.
    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Stop condition that ended the search.
    pub fn termination(&self) -> TerminationReason {
        self.termination
    }

    /// Buffer placement of the best candidate.
    pub fn buffer_activation(&self) -> Vec<bool> {
        self.final_model.buffer_activation()
    }

    /// Cost of the best candidate.
    pub fn objective_value(&self) -> f64 {
        self.final_model.objective_value()
    }

    /// Indicators of the best plan.
    pub fn kpi(&self) -> PlanKpi {
        PlanKpi::calculate(&self.final_model)
    }
}
