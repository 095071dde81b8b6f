//! Buffer placement solvers.
//!
//! A solver turns a line configuration into an optimized, fully simulated
//! plan. Strategies implement [`ProductionControlSolver`]; the simulation
//! engine is shared and unaware of the strategy.
//!
//! # Example
//!
//! ```
//! use u_ddmrp::models::{ModelConfig, StationDeclaration};
//! use u_ddmrp::solver::{GeneticSolver, ProductionControlSolver};
//! use u_metaheur::ga::GaConfig;
//!
//! let config = ModelConfig::new(8)
//!     .with_station(StationDeclaration::new(0, 2.0).with_initial_buffer(40).with_next(1, 1.0))
//!     .with_station(
//!         StationDeclaration::new(1, 1.0)
//!             .with_initial_buffer(20)
//!             .with_demand(0.3, vec![5; 8]),
//!     );
//! let solver = GeneticSolver::new().with_ga_config(
//!     GaConfig::default()
//!         .with_population_size(8)
//!         .with_max_generations(10)
//!         .with_seed(3)
//!         .with_parallel(false),
//! );
//! let result = solver.resolve(&config).unwrap();
//! assert_eq!(result.buffer_activation().len(), 2);
//! ```

mod genetic;
mod result;

pub use genetic::{DEFAULT_GENERATION_CAP, GeneticSolver, default_search_config};
pub use result::{OptimizationResult, TerminationReason};

use crate::error::ModelError;
use crate::models::ModelConfig;

/// Strategy that places buffers on a production line.
pub trait ProductionControlSolver {
    /// Short strategy name for logs.
    fn name(&self) -> &'static str;

    /// Searches a buffer placement and returns the simulated best plan.
    ///
    /// # Errors
    /// Configuration problems are reported once, before any search work.
    fn resolve(&self, config: &ModelConfig) -> Result<OptimizationResult, ModelError>;
}
