//! Buffer-activation chromosome.
//!
//! # Encoding
//!
//! One boolean gene per station, indexed by station index: `true` places
//! a decoupling buffer at that station.
//!
//! The GA engine minimizes, so the stored fitness is the negated placement
//! fitness; [`BufferChromosome::placement_fitness`] undoes the sign.
//!
//! # Reference
//! Syswerda (1989), "Uniform Crossover in Genetic Algorithms"

use rand::Rng;
use u_metaheur::ga::Individual;

/// Buffer-activation chromosome.
///
/// Lower fitness = better placement (minimization convention).
#[derive(Debug, Clone, PartialEq)]
pub struct BufferChromosome {
    /// Activation gene per station.
    pub genes: Vec<bool>,
    /// Negated placement fitness (`+inf` until evaluated).
    pub fitness: f64,
}

impl Individual for BufferChromosome {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

impl BufferChromosome {
    /// Creates a chromosome with each gene drawn with probability one half.
    pub fn random<R: Rng>(len: usize, rng: &mut R) -> Self {
        Self::from_genes((0..len).map(|_| rng.random_bool(0.5)).collect())
    }

    /// Wraps an explicit activation vector.
    pub fn from_genes(genes: Vec<bool>) -> Self {
        Self {
            genes,
            fitness: f64::INFINITY,
        }
    }

    /// Placement fitness (`1 / objective`, higher is better).
    pub fn placement_fitness(&self) -> f64 {
        -self.fitness
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Number of activated buffers.
    pub fn buffer_count(&self) -> usize {
        self.genes.iter().filter(|&&g| g).count()
    }
}

/// Uniform crossover: each gene is swapped between the children with
/// probability one half.
pub fn uniform_crossover<R: Rng>(
    p1: &BufferChromosome,
    p2: &BufferChromosome,
    rng: &mut R,
) -> (BufferChromosome, BufferChromosome) {
    let n = p1.len().min(p2.len());
    let mut g1 = p1.genes.clone();
    let mut g2 = p2.genes.clone();
    for i in 0..n {
        if rng.random_bool(0.5) {
            std::mem::swap(&mut g1[i], &mut g2[i]);
        }
    }
    (
        BufferChromosome::from_genes(g1),
        BufferChromosome::from_genes(g2),
    )
}

/// Single-point crossover: tails after a random cut are exchanged.
pub fn single_point_crossover<R: Rng>(
    p1: &BufferChromosome,
    p2: &BufferChromosome,
    rng: &mut R,
) -> (BufferChromosome, BufferChromosome) {
    let n = p1.len().min(p2.len());
    let mut g1 = p1.genes.clone();
    let mut g2 = p2.genes.clone();
    if n > 1 {
        let cut = rng.random_range(1..n);
        g1[cut..n].swap_with_slice(&mut g2[cut..n]);
    }
    (
        BufferChromosome::from_genes(g1),
        BufferChromosome::from_genes(g2),
    )
}

/// Flips each gene independently with probability `rate`.
pub fn bit_flip_mutation<R: Rng>(chromosome: &mut BufferChromosome, rate: f64, rng: &mut R) {
    let rate = rate.clamp(0.0, 1.0);
    let mut changed = false;
    for gene in chromosome.genes.iter_mut() {
        if rng.random_bool(rate) {
            *gene = !*gene;
            changed = true;
        }
    }
    if changed {
        chromosome.fitness = f64::INFINITY;
    }
}

/// Flips exactly one random gene.
pub fn single_flip_mutation<R: Rng>(chromosome: &mut BufferChromosome, rng: &mut R) {
    if chromosome.is_empty() {
        return;
    }
    let i = rng.random_range(0..chromosome.len());
    chromosome.genes[i] = !chromosome.genes[i];
    chromosome.fitness = f64::INFINITY;
}
