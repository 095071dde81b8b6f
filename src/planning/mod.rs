//! DDMRP production-control simulation.
//!
//! Turns a validated line configuration and a buffer placement into a
//! fully simulated plan, and scores it.
//!
//! # Submodules
//!
//! - [`ModelBuilder`]: validation and model assembly
//! - [`ProductionControlModel`]: the simulation engine (`plan`)
//! - [`Objective`]: inventory / shortfall cost
//! - [`Constraint`]: post-hoc feasibility checks
//! - [`PlanKpi`]: summary indicators
//!
//! # Reference
//! Ptak & Smith (2016), "Demand Driven Material Requirements Planning"

mod builder;
mod constraint;
mod kpi;
mod model;
mod objective;

pub use builder::ModelBuilder;
pub use constraint::{Constraint, ConstraintViolation, ReplenishmentsConstraint};
pub use kpi::PlanKpi;
pub use model::{
    ModelStatus, PeakRule, ProductionControlModel, ReplenishmentPolicy, SimulationSettings,
};
pub use objective::{
    Objective, fitness_from_objective, mean_buffer_inventory, mean_unsatisfied_demand,
};
