//! Analysis configuration, decoded from JSON.
//!
//! Every section has defaults, so `{}` is a valid document and a partial
//! document only overrides the fields it names.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::indicators::engine::IndicatorConfig;
use crate::mining::{MiningParams, price_range};

/// Price axis of the profit-vs-price sweep; `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start: 20_000.0,
            end: 100_000.0,
            step: 5_000.0,
        }
    }
}

impl SweepConfig {
    pub fn prices(&self) -> Result<Vec<f64>> {
        price_range(self.start, self.end, self.step)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub indicators: IndicatorConfig,
    pub mining: MiningParams,
    pub sweep: SweepConfig,
}

impl AnalysisConfig {
    /// Decodes and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| AnalyticsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.indicators.validate()?;
        self.mining.validate()?;
        self.sweep.prices().map(|_| ())
    }
}
