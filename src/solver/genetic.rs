//! Genetic-algorithm solver.
//!
//! # Algorithm
//!
//! 1. Validate the search parameters and the line configuration once.
//! 2. Run `u_metaheur::ga::GaRunner` over [`BufferPlacementProblem`]
//!    (initial population, then evaluate / select / breed until stagnation
//!    or the generation cap).
//! 3. Re-plan the best activation vector and return it with the trace.
//!
//! # Mutation rates
//!
//! `GaConfig::mutation_rate` is the probability that a child is handed to
//! the mutation operator at all; `GeneticOperators::mutation_rate` is the
//! per-gene flip probability inside it. The default search passes every
//! child to the operator.

use tracing::{debug, info};
use u_metaheur::ga::{GaConfig, GaRunner};

use super::ProductionControlSolver;
use super::result::{OptimizationResult, TerminationReason};
use crate::error::ModelError;
use crate::ga::BufferPlacementProblem;
use crate::ga::operators::GeneticOperators;
use crate::models::ModelConfig;
use crate::planning::ModelBuilder;

/// Hard stop for searches that rely on stagnation.
pub const DEFAULT_GENERATION_CAP: usize = 10_000;

/// Search parameters used by [`GeneticSolver::new`].
///
/// Population 50, tournament of 3, crossover rate 0.9, one elite, stop
/// after 100 generations without improvement.
pub fn default_search_config() -> GaConfig {
    GaConfig::default()
        .with_population_size(50)
        .with_max_generations(DEFAULT_GENERATION_CAP)
        .with_stagnation_limit(100)
        .with_tournament_size(3)
        .with_crossover_rate(0.9)
        .with_mutation_rate(1.0)
        .with_elite_ratio(0.02)
}

/// Buffer placement by genetic search.
#[derive(Debug, Clone)]
pub struct GeneticSolver {
    ga: GaConfig,
    operators: GeneticOperators,
    builder: ModelBuilder,
}

impl Default for GeneticSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneticSolver {
    /// Creates a solver with [`default_search_config`] and default operators.
    pub fn new() -> Self {
        Self {
            ga: default_search_config(),
            operators: GeneticOperators::default(),
            builder: ModelBuilder::new(),
        }
    }

    /// Sets the search parameters.
    pub fn with_ga_config(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    /// Sets the crossover and mutation strategies.
    pub fn with_operators(mut self, operators: GeneticOperators) -> Self {
        self.operators = operators;
        self
    }

    /// Sets the builder used for every candidate model.
    pub fn with_builder(mut self, builder: ModelBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Search parameters in use.
    pub fn ga_config(&self) -> &GaConfig {
        &self.ga
    }
}

impl ProductionControlSolver for GeneticSolver {
    fn name(&self) -> &'static str {
        "genetic"
    }

    fn resolve(&self, config: &ModelConfig) -> Result<OptimizationResult, ModelError> {
        self.ga.validate().map_err(ModelError::InvalidSolverConfig)?;
        let problem = BufferPlacementProblem::with_builder(config, &self.builder)?
            .with_operators(self.operators.clone());

        info!(
            solver = self.name(),
            stations = problem.station_count(),
            horizon = config.planning_horizon,
            population = self.ga.population_size,
            "search started"
        );

        let outcome = GaRunner::run(&problem, &self.ga);
        let termination = if outcome.stagnated {
            TerminationReason::Stagnation
        } else {
            TerminationReason::GenerationCap
        };
        debug!(?termination, generations = outcome.generations, "search terminated");

        let best_fitness = outcome.best.placement_fitness();
        let final_model = problem.simulate(&outcome.best.genes)?;

        info!(
            solver = self.name(),
            generations = outcome.generations,
            best_fitness,
            buffers = outcome.best.buffer_count(),
            objective = final_model.objective_value(),
            "search finished"
        );

        let fitness_history = outcome.fitness_history.iter().map(|&f| -f).collect();
        Ok(OptimizationResult::new(
            final_model,
            fitness_history,
            problem.evaluations(),
            best_fitness,
            outcome.generations,
            termination,
        ))
    }
}
