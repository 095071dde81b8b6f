//! GA-based buffer placement.
//!
//! Implements the buffer placement encoding on top of `u-metaheur`'s
//! generic GA framework.
//!
//! # Encoding
//!
//! One boolean gene per station: `true` places a decoupling buffer there.
//! Placement fitness is the reciprocal of the simulated plan's cost.
//!
//! # Submodules
//!
//! - [`operators`]: Runtime-selectable crossover and mutation strategies
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"
//! - Ptak & Smith (2016), "Demand Driven Material Requirements Planning", Ch. 6

mod chromosome;
pub mod operators;
mod problem;

pub use chromosome::{
    BufferChromosome, bit_flip_mutation, single_flip_mutation, single_point_crossover,
    uniform_crossover,
};
pub use problem::{BufferPlacementProblem, WORST_FITNESS};
