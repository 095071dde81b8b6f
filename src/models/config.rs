//! Line configuration payload.
//!
//! The serialized form keeps the PascalCase JSON schema used by existing
//! planning front-ends:
//!
//! ```json
//! {
//!   "PlanningHorizon": 5, "PeakHorizon": 2, "PastHorizon": 0,
//!   "StationDeclarations": [
//!     { "StationIndex": 0, "ProcessingTime": 2.0,
//!       "NextStationsInput": [{ "NextStationIndex": 1, "InputAmount": 1.0 }] },
//!     { "StationIndex": 1, "ProcessingTime": 1.0, "DemandVariability": 0.0,
//!       "DemandForecast": [10, 10, 10, 10, 10] }
//!   ]
//! }
//! ```
//!
//! Shape checks live in [`crate::validation`]; this module only parses.

use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::error::ModelError;

/// Configuration of a production line and its planning horizons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModelConfig {
    /// Number of instants simulated.
    pub planning_horizon: usize,
    /// Lookahead window for demand spikes.
    #[serde(default)]
    pub peak_horizon: usize,
    /// Length of the past buffer/order series.
    #[serde(default)]
    pub past_horizon: usize,
    /// One declaration per station.
    pub station_declarations: Vec<StationDeclaration>,
}

/// Declaration of a single station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StationDeclaration {
    pub station_index: usize,
    pub processing_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_buffer: Option<i64>,
    #[serde(default)]
    pub past_buffer: Vec<i64>,
    #[serde(default)]
    pub past_order_amount: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demand_variability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demand_forecast: Option<Vec<i64>>,
    /// Downstream stations consuming this one's output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_stations_input: Option<Vec<NextStationInput>>,
}

/// A downstream link: `input_amount` units of this station per unit of
/// `next_station_index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NextStationInput {
    pub next_station_index: usize,
    pub input_amount: f64,
}

impl ModelConfig {
    /// Creates an empty configuration.
    pub fn new(planning_horizon: usize) -> Self {
        Self {
            planning_horizon,
            peak_horizon: 0,
            past_horizon: 0,
            station_declarations: Vec::new(),
        }
    }

    /// Sets the spike lookahead window.
    pub fn with_peak_horizon(mut self, peak_horizon: usize) -> Self {
        self.peak_horizon = peak_horizon;
        self
    }

    /// Sets the past series length.
    pub fn with_past_horizon(mut self, past_horizon: usize) -> Self {
        self.past_horizon = past_horizon;
        self
    }

    /// Adds a station declaration.
    pub fn with_station(mut self, station: StationDeclaration) -> Self {
        self.station_declarations.push(station);
        self
    }

    /// Parses the JSON form.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses the JSON form from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Serializes to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of declared stations.
    pub fn station_count(&self) -> usize {
        self.station_declarations.len()
    }

    /// All `(from, to, ratio)` links declared across stations.
    pub fn links(&self) -> Vec<(usize, usize, f64)> {
        self.station_declarations
            .iter()
            .flat_map(|decl| {
                decl.next_stations_input
                    .iter()
                    .flatten()
                    .map(move |link| (decl.station_index, link.next_station_index, link.input_amount))
            })
            .collect()
    }
}

impl StationDeclaration {
    /// Creates a declaration with no links or history.
    pub fn new(station_index: usize, processing_time: f64) -> Self {
        Self {
            station_index,
            processing_time,
            lead_time: None,
            initial_buffer: None,
            past_buffer: Vec::new(),
            past_order_amount: Vec::new(),
            demand_variability: None,
            demand_forecast: None,
            next_stations_input: None,
        }
    }

    pub fn with_lead_time(mut self, lead_time: f64) -> Self {
        self.lead_time = Some(lead_time);
        self
    }

    pub fn with_initial_buffer(mut self, buffer: i64) -> Self {
        self.initial_buffer = Some(buffer);
        self
    }

    pub fn with_past(mut self, past_buffer: Vec<i64>, past_order_amount: Vec<i64>) -> Self {
        self.past_buffer = past_buffer;
        self.past_order_amount = past_order_amount;
        self
    }

    pub fn with_demand(mut self, variability: f64, forecast: Vec<i64>) -> Self {
        self.demand_variability = Some(variability);
        self.demand_forecast = Some(forecast);
        self
    }

    /// Adds a downstream link.
    pub fn with_next(mut self, next_station_index: usize, input_amount: f64) -> Self {
        self.next_stations_input
            .get_or_insert_with(Vec::new)
            .push(NextStationInput {
                next_station_index,
                input_amount,
            });
        self
    }

    /// A declaration without downstream links is an output station.
    pub fn is_output(&self) -> bool {
        self.next_stations_input
            .as_ref()
            .map_or(true, |links| links.is_empty())
    }
}
