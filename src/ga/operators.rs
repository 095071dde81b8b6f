//! Configurable genetic operators for buffer placement.
//!
//! Provides runtime-selectable crossover and mutation strategies
//! via [`GeneticOperators`].
//!
//! # Usage
//!
//! ```
//! use u_ddmrp::ga::operators::{GeneticOperators, CrossoverType, MutationType};
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.crossover_type, CrossoverType::Uniform);
//! assert_eq!(ops.mutation_type, MutationType::BitFlip);
//! ```

use rand::Rng;

use super::chromosome::{
    BufferChromosome, bit_flip_mutation, single_flip_mutation, single_point_crossover,
    uniform_crossover,
};

/// Crossover strategy for activation vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossoverType {
    /// Per-gene coin flip (Syswerda, 1989).
    Uniform,
    /// Exchange tails after one random cut.
    SinglePoint,
}

/// Mutation strategy for activation vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    /// Flip each gene with probability `mutation_rate`.
    BitFlip,
    /// Flip exactly one gene.
    SingleFlip,
}

/// Runtime-selectable genetic operators for buffer placement.
///
/// # Example
///
/// ```
/// use u_ddmrp::ga::operators::{GeneticOperators, CrossoverType, MutationType};
///
/// let ops = GeneticOperators {
///     crossover_type: CrossoverType::SinglePoint,
///     mutation_type: MutationType::SingleFlip,
///     mutation_rate: 0.1,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct GeneticOperators {
    /// Crossover strategy.
    pub crossover_type: CrossoverType,
    /// Mutation strategy.
    pub mutation_type: MutationType,
    /// Per-gene flip probability for [`MutationType::BitFlip`].
    pub mutation_rate: f64,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self {
            crossover_type: CrossoverType::Uniform,
            mutation_type: MutationType::BitFlip,
            mutation_rate: 0.05,
        }
    }
}

impl GeneticOperators {
    /// Performs crossover using the configured strategy.
    pub fn crossover<R: Rng>(
        &self,
        p1: &BufferChromosome,
        p2: &BufferChromosome,
        rng: &mut R,
    ) -> (BufferChromosome, BufferChromosome) {
        match self.crossover_type {
            CrossoverType::Uniform => uniform_crossover(p1, p2, rng),
            CrossoverType::SinglePoint => single_point_crossover(p1, p2, rng),
        }
    }

    /// Performs mutation using the configured strategy.
    pub fn mutate<R: Rng>(&self, chromosome: &mut BufferChromosome, rng: &mut R) {
        match self.mutation_type {
            MutationType::BitFlip => bit_flip_mutation(chromosome, self.mutation_rate, rng),
            MutationType::SingleFlip => single_flip_mutation(chromosome, rng),
        }
    }
}
