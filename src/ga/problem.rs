//! Buffer placement GA problem definition.
//!
//! Implements `u_metaheur::ga::GaProblem` for DDMRP buffer positioning.
//! Each candidate is decoded by simulating a copy of a validated template
//! model.
//!
//! # Fitness sign
//!
//! Placement fitness is `1 / objective` (higher is better). `u-metaheur`
//! minimizes, so [`GaProblem::evaluate`] returns the negated value.
//!
//! # Reference
//! Jiang & Rim (2017), "Strategic WIP inventory positioning for make-to-order
//! production with stochastic processing times"

use std::sync::Mutex;

use rand::Rng;
use tracing::{debug, warn};
use u_metaheur::ga::GaProblem;

use super::chromosome::BufferChromosome;
use super::operators::GeneticOperators;
use crate::error::ModelError;
use crate::models::ModelConfig;
use crate::planning::{ModelBuilder, ProductionControlModel, fitness_from_objective};

/// Placement fitness assigned to a candidate whose simulation fails.
pub const WORST_FITNESS: f64 = 0.0;

/// GA problem definition for buffer placement.
///
/// The template is validated once at construction; every evaluation clones
/// it (the precedence graph is shared) and plans the clone, so evaluations
/// are independent and may run in parallel.
///
/// # Example
/// ```
/// use u_ddmrp::ga::BufferPlacementProblem;
/// use u_ddmrp::models::{ModelConfig, StationDeclaration};
/// use u_metaheur::ga::{GaConfig, GaRunner};
///
/// let config = ModelConfig::new(6)
///     .with_station(StationDeclaration::new(0, 1.0).with_next(1, 1.0))
///     .with_station(StationDeclaration::new(1, 1.0).with_demand(0.2, vec![5; 6]));
/// let problem = BufferPlacementProblem::new(&config).unwrap();
/// let ga = GaConfig::default()
///     .with_population_size(8)
///     .with_max_generations(5)
///     .with_seed(1)
///     .with_parallel(false);
/// let result = GaRunner::run(&problem, &ga);
/// assert_eq!(result.best.len(), 2);
/// ```
#[derive(Debug)]
pub struct BufferPlacementProblem {
    template: ProductionControlModel,
    operators: GeneticOperators,
    evaluations: Mutex<Vec<f64>>,
}

impl BufferPlacementProblem {
    /// Creates a problem with the default builder.
    pub fn new(config: &ModelConfig) -> Result<Self, ModelError> {
        Self::with_builder(config, &ModelBuilder::new())
    }

    /// Creates a problem whose template is built by `builder`.
    pub fn with_builder(config: &ModelConfig, builder: &ModelBuilder) -> Result<Self, ModelError> {
        Ok(Self {
            template: builder.build(config)?,
            operators: GeneticOperators::default(),
            evaluations: Mutex::new(Vec::new()),
        })
    }

    /// Sets the genetic operators.
    pub fn with_operators(mut self, operators: GeneticOperators) -> Self {
        self.operators = operators;
        self
    }

    /// Crossover and mutation strategies in use.
    pub fn operators(&self) -> &GeneticOperators {
        &self.operators
    }

    /// Gene count (one per station).
    pub fn station_count(&self) -> usize {
        self.template.station_count()
    }

    /// Plans a fresh copy of the template for an activation vector.
    pub fn simulate(&self, genes: &[bool]) -> Result<ProductionControlModel, ModelError> {
        let mut model = self.template.clone();
        model.plan(genes)?;
        Ok(model)
    }

    /// Placement fitness of an activation vector (`1 / objective`).
    pub fn fitness(&self, genes: &[bool]) -> Result<f64, ModelError> {
        let model = self.simulate(genes)?;
        Ok(fitness_from_objective(model.objective_value()))
    }

    /// Placement fitness of every GA evaluation so far, in completion order.
    pub fn evaluations(&self) -> Vec<f64> {
        self.evaluations
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    /// Placement fitness with failures mapped to [`WORST_FITNESS`].
    fn score(&self, genes: &[bool]) -> f64 {
        match self.fitness(genes) {
            Ok(fitness) => fitness,
            Err(err) => {
                warn!(error = %err, genes = ?genes, "candidate simulation failed");
                WORST_FITNESS
            }
        }
    }
}

impl GaProblem for BufferPlacementProblem {
    type Individual = BufferChromosome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> BufferChromosome {
        BufferChromosome::random(self.station_count(), rng)
    }

    fn evaluate(&self, individual: &BufferChromosome) -> f64 {
        let fitness = self.score(&individual.genes);
        if let Ok(mut log) = self.evaluations.lock() {
            log.push(fitness);
        }
        -fitness
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &BufferChromosome,
        parent2: &BufferChromosome,
        rng: &mut R,
    ) -> Vec<BufferChromosome> {
        let (c1, c2) = self.operators.crossover(parent1, parent2, rng);
        vec![c1, c2]
    }

    fn mutate<R: Rng>(&self, individual: &mut BufferChromosome, rng: &mut R) {
        self.operators.mutate(individual, rng);
    }

    fn on_generation(&self, generation: usize, best_fitness: f64) {
        debug!(
            generation,
            best_fitness = -best_fitness,
            "generation evaluated"
        );
    }
}
