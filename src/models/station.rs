//! Station (production position) model.
//!
//! A station is one stage of the line. It carries its static inputs
//! (processing time, raw lead time, forecast), the derived DDMRP
//! parameters (average demand, variability, decoupled lead time) and
//! the state timeline written by the simulation.
//!
//! # Buffer zones
//!
//! | Zone | Top |
//! |------|-----|
//! | Red | `DLT × ADU × LTF × (1 + variability)` |
//! | Yellow | `TOR + DLT × ADU` |
//! | Green | `TOY + DLT × ADU × LTF` |
//!
//! # Reference
//! Ptak & Smith (2016), "Demand Driven Material Requirements Planning", Ch. 7

use serde::{Deserialize, Serialize};

use super::TimeIndexedState;

/// Top-of-red/yellow/green thresholds of a station buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferZones {
    /// Top of red.
    pub tor: f64,
    /// Top of yellow.
    pub toy: f64,
    /// Top of green.
    pub tog: f64,
}

/// A production station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    /// Position in the line and in both precedence matrices.
    pub index: usize,
    /// No other station feeds this one.
    pub is_input_station: bool,
    /// No station consumes this one's output.
    pub is_output_station: bool,
    /// Decision variable: whether the station holds a decoupling buffer.
    pub has_buffer: bool,
    /// Processing time per unit.
    pub processing_time: f64,
    /// Raw external supply lead time (input stations only).
    pub lead_time: Option<f64>,
    /// Lead time accumulated by unbuffered predecessors. Derived.
    pub upstream_lead_time: Option<f64>,
    /// Lead time after upstream decoupling. Derived.
    pub decoupled_lead_time: Option<f64>,
    /// Average daily usage. Derived from forecast or successors.
    pub average_demand: Option<f64>,
    /// Demand variability. Declared on output stations, derived elsewhere.
    pub demand_variability: Option<f64>,
    /// Whether `demand_variability` came from the configuration.
    pub variability_declared: bool,
    /// `min non-zero DLT / own DLT`. Derived.
    pub lead_time_factor: Option<f64>,
    /// Demand forecast per instant (output stations).
    pub demand_forecast: Option<Vec<i64>>,
    /// Buffer at instant 0 when no past series is given.
    pub initial_buffer: Option<i64>,
    /// Buffer levels over the past horizon, oldest first.
    pub past_buffer: Vec<i64>,
    /// Orders placed over the past horizon, oldest first.
    pub past_order_amount: Vec<i64>,
    /// State per planning instant.
    pub states: Vec<TimeIndexedState>,
}

impl Station {
    /// Creates a station with an empty timeline of `horizon` instants.
    pub fn new(index: usize, processing_time: f64, horizon: usize) -> Self {
        Self {
            index,
            is_input_station: false,
            is_output_station: false,
            has_buffer: false,
            processing_time,
            lead_time: None,
            upstream_lead_time: None,
            decoupled_lead_time: None,
            average_demand: None,
            demand_variability: None,
            variability_declared: false,
            lead_time_factor: None,
            demand_forecast: None,
            initial_buffer: None,
            past_buffer: Vec::new(),
            past_order_amount: Vec::new(),
            states: (0..horizon).map(TimeIndexedState::new).collect(),
        }
    }

    /// Sets the raw external lead time.
    pub fn with_lead_time(mut self, lead_time: f64) -> Self {
        self.lead_time = Some(lead_time);
        self
    }

    /// Sets a declared demand variability.
    pub fn with_demand_variability(mut self, variability: f64) -> Self {
        self.demand_variability = Some(variability);
        self.variability_declared = true;
        self
    }

    /// Sets the demand forecast.
    pub fn with_demand_forecast(mut self, forecast: Vec<i64>) -> Self {
        self.demand_forecast = Some(forecast);
        self
    }

    /// Top of red, if every input is known.
    pub fn tor(&self) -> Option<f64> {
        let dlt = self.decoupled_lead_time?;
        let adu = self.average_demand?;
        let ltf = self.lead_time_factor?;
        let var = self.demand_variability?;
        Some(dlt * adu * ltf * (1.0 + var))
    }

    /// Top of yellow, if every input is known.
    pub fn toy(&self) -> Option<f64> {
        Some(self.tor()? + self.decoupled_lead_time? * self.average_demand?)
    }

    /// Top of green, if every input is known.
    pub fn tog(&self) -> Option<f64> {
        Some(
            self.toy()?
                + self.decoupled_lead_time? * self.average_demand? * self.lead_time_factor?,
        )
    }

    /// All three zones, or `None` while any input is missing.
    pub fn zones(&self) -> Option<BufferZones> {
        Some(BufferZones {
            tor: self.tor()?,
            toy: self.toy()?,
            tog: self.tog()?,
        })
    }

    /// Lead time this station adds to its successors.
    ///
    /// Zero when buffered, whatever the processing time.
    pub fn lead_time_contribution(&self) -> Option<f64> {
        if self.has_buffer {
            Some(0.0)
        } else {
            Some(self.processing_time + self.upstream_lead_time?)
        }
    }

    /// Decoupled lead time rounded up to whole instants.
    pub fn lead_time_steps(&self) -> usize {
        self.decoupled_lead_time
            .map(|dlt| dlt.max(0.0).ceil() as usize)
            .unwrap_or(0)
    }

    /// Mean of the forecast, if one is present and non-empty.
    pub fn forecast_mean(&self) -> Option<f64> {
        let forecast = self.demand_forecast.as_ref().filter(|f| !f.is_empty())?;
        Some(forecast.iter().map(|&v| v as f64).sum::<f64>() / forecast.len() as f64)
    }

    /// Buffer level seeded at instant 0.
    pub fn seed_buffer(&self) -> i64 {
        self.past_buffer
            .last()
            .copied()
            .or(self.initial_buffer)
            .unwrap_or(0)
    }

    /// Order amount seeded at instant 0.
    pub fn seed_order(&self) -> i64 {
        self.past_order_amount.last().copied().unwrap_or(0)
    }

    /// Forecast value at an instant, 0 outside the forecast.
    pub fn forecast_at(&self, instant: usize) -> i64 {
        self.demand_forecast
            .as_ref()
            .and_then(|f| f.get(instant))
            .copied()
            .unwrap_or(0)
    }

    /// Clears every derived value and simulated state.
    pub fn reset_derived(&mut self) {
        self.upstream_lead_time = None;
        self.decoupled_lead_time = None;
        self.average_demand = None;
        self.lead_time_factor = None;
        if !self.variability_declared {
            self.demand_variability = None;
        }
        for state in &mut self.states {
            state.reset();
        }
    }

    /// Buffer levels over the timeline (missing values read as 0).
    pub fn buffer_series(&self) -> Vec<i64> {
        self.states.iter().map(|s| s.buffer.unwrap_or(0)).collect()
    }
}
