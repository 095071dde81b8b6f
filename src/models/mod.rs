//! DDMRP line domain models.
//!
//! Provides the data types describing a production line and its
//! simulated state. Independent of the search layer.
//!
//! # Domain Mappings
//!
//! | u-ddmrp | DDMRP term | Shop floor |
//! |---------|-----------|------------|
//! | Station | Position | Work center / stage |
//! | TimeIndexedState | Buffer status | Daily stock record |
//! | PrecedenceGraph | Product structure | Routing / BOM |
//! | ModelConfig | Master settings | Line setup sheet |

mod config;
mod precedence;
mod state;
mod station;

pub use config::{ModelConfig, NextStationInput, StationDeclaration};
pub use precedence::PrecedenceGraph;
pub use state::TimeIndexedState;
pub use station::{BufferZones, Station};
