//! DDMRP buffer placement for the U-Engine ecosystem.
//!
//! Simulates a multi-station production line under Demand Driven MRP rules
//! for a given placement of decoupling buffers, and searches for the
//! placement that best trades held inventory against unmet demand.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Station`, `TimeIndexedState`,
//!   `PrecedenceGraph`, `ModelConfig`
//! - **`validation`**: Input integrity checks (index coverage, links, DAG cycles, series lengths)
//! - **`planning`**: Model builder, simulation engine, objective, constraints, KPIs
//! - **`ga`**: Buffer placement problem and operators for `u-metaheur`'s GA
//! - **`solver`**: `ProductionControlSolver` strategies returning an `OptimizationResult`
//! - **`error`**: `ModelError`
//!
//! # Example
//!
//! ```
//! use u_ddmrp::models::{ModelConfig, StationDeclaration};
//! use u_ddmrp::planning::ModelBuilder;
//!
//! let config = ModelConfig::new(5)
//!     .with_station(StationDeclaration::new(0, 2.0).with_next(1, 1.0))
//!     .with_station(StationDeclaration::new(1, 1.0).with_demand(0.0, vec![10; 5]));
//! let mut model = ModelBuilder::new().build(&config)?;
//! model.plan(&[false, true])?;
//! assert!(model.objective_value() >= 0.0);
//! # Ok::<(), u_ddmrp::ModelError>(())
//! ```
//!
//! # References
//!
//! - Ptak & Smith (2016), "Demand Driven Material Requirements Planning"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"

pub mod error;
pub mod ga;
pub mod models;
pub mod planning;
pub mod solver;
pub mod validation;

pub use error::ModelError;
