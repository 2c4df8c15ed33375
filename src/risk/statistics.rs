//! Descriptive price statistics for the summary report

use serde::Serialize;

use crate::error::{AnalyticsError, Result};
use crate::indicators::moving_averages::{mean, sample_std};
use crate::indicators::series::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceStatistics {
    pub current: f64,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    /// Sample standard deviation of prices; `None` for a single sample
    pub std_dev: Option<f64>,
}

impl PriceStatistics {
    pub fn from_series(series: &PriceSeries) -> Result<Self> {
        let prices = series.prices();
        let current = *prices.last().ok_or(AnalyticsError::InsufficientData {
            required: 1,
            actual: 0,
        })?;

        Ok(Self {
            current,
            mean: mean(&prices),
            max: prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            min: prices.iter().copied().fold(f64::INFINITY, f64::min),
            std_dev: (prices.len() >= 2).then(|| sample_std(&prices)),
        })
    }
}
