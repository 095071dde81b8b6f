//! Time-indexed station state.
//!
//! One entry per planning instant. Values are `None` until the simulation
//! reaches the instant.

use serde::{Deserialize, Serialize};

/// Buffer, demand and order position of a station at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeIndexedState {
    /// Instant index (0 = seeded from past data).
    pub instant: usize,
    /// On-hand buffer. Negative values are backlog.
    pub buffer: Option<i64>,
    /// Demand placed on the station at this instant.
    pub demand: Option<i64>,
    /// Demand plus the detected near-term spike.
    pub qualified_demand: Option<i64>,
    /// Orders placed but not yet received.
    pub on_order_inventory: Option<i64>,
    /// Quantity ordered at this instant.
    pub order_amount: Option<i64>,
    /// Whether a replenishment was triggered.
    pub replenishment_flag: Option<bool>,
}

impl TimeIndexedState {
    /// Creates an empty state for the given instant.
    pub fn new(instant: usize) -> Self {
        Self {
            instant,
            ..Self::default()
        }
    }

    /// Net flow position: `buffer + on_order_inventory - qualified_demand`.
    ///
    /// Always recomputed so it cannot go stale after the buffer or order
    /// fields change. Missing terms count as zero.
    #[inline]
    pub fn net_flow(&self) -> i64 {
        self.buffer
            .unwrap_or(0)
            .saturating_add(self.on_order_inventory.unwrap_or(0))
            .saturating_sub(self.qualified_demand.unwrap_or(0))
    }

    /// Clears every simulated value, keeping the instant.
    pub fn reset(&mut self) {
        *self = Self::new(self.instant);
    }
}
