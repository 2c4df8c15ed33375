//! One-shot computation of every indicator over a price series.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result, ensure_non_negative, ensure_window};
use crate::indicators::momentum::{
    DEFAULT_MACD_FAST, DEFAULT_MACD_SIGNAL, DEFAULT_MACD_SLOW, DEFAULT_RSI_PERIOD, MacdSeries,
    macd_series, rsi_series,
};
use crate::indicators::moving_averages::rolling_mean;
use crate::indicators::series::{DerivedSeries, PriceSeries};
use crate::indicators::volatility::{
    BollingerSeries, DEFAULT_BOLLINGER_STD, DEFAULT_BOLLINGER_WINDOW, DEFAULT_ROLLING_WINDOW,
    bollinger_series, daily_returns, rolling_volatility,
};

/// Windows and spans used by [`IndicatorSet::compute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_window: usize,
    pub bollinger_std: f64,
    /// Window for the rolling mean of prices and the rolling volatility of returns
    pub rolling_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: DEFAULT_RSI_PERIOD,
            macd_fast: DEFAULT_MACD_FAST,
            macd_slow: DEFAULT_MACD_SLOW,
            macd_signal: DEFAULT_MACD_SIGNAL,
            bollinger_window: DEFAULT_BOLLINGER_WINDOW,
            bollinger_std: DEFAULT_BOLLINGER_STD,
            rolling_window: DEFAULT_ROLLING_WINDOW,
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_window("rsi_period", self.rsi_period)?;
        ensure_window("macd_fast", self.macd_fast)?;
        ensure_window("macd_slow", self.macd_slow)?;
        ensure_window("macd_signal", self.macd_signal)?;
        if self.macd_fast >= self.macd_slow {
            return Err(AnalyticsError::invalid(
                "macd_fast",
                format!(
                    "fast span {} must be shorter than slow span {}",
                    self.macd_fast, self.macd_slow
                ),
            ));
        }
        ensure_std_window("bollinger_window", self.bollinger_window)?;
        ensure_std_window("rolling_window", self.rolling_window)?;
        ensure_non_negative("bollinger_std", self.bollinger_std)
    }
}

// Both windows feed a sample standard deviation
fn ensure_std_window(name: &'static str, window: usize) -> Result<()> {
    if window < 2 {
        return Err(AnalyticsError::invalid(
            name,
            format!("must be at least 2 for a sample standard deviation, got {window}"),
        ));
    }
    Ok(())
}

/// Every indicator for one price series, all sharing its timestamp axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub daily_returns: DerivedSeries,
    pub rolling_mean: DerivedSeries,
    pub rolling_volatility: DerivedSeries,
    pub rsi: DerivedSeries,
    pub macd: MacdSeries,
    pub bollinger: BollingerSeries,
}

/// Most recent defined value of each indicator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct IndicatorSnapshot {
    pub rolling_mean: Option<f64>,
    pub rolling_volatility: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub bollinger_middle: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_lower: Option<f64>,
}

impl IndicatorSet {
    pub fn compute(series: &PriceSeries, config: &IndicatorConfig) -> Result<Self> {
        config.validate()?;
        let prices = series.prices();

        let set = Self {
            daily_returns: series.derive(daily_returns(&prices))?,
            rolling_mean: series.derive(rolling_mean(&prices, config.rolling_window)?)?,
            rolling_volatility: series
                .derive(rolling_volatility(&prices, config.rolling_window)?)?,
            rsi: rsi_series(series, config.rsi_period)?,
            macd: macd_series(
                series,
                config.macd_fast,
                config.macd_slow,
                config.macd_signal,
            )?,
            bollinger: bollinger_series(series, config.bollinger_window, config.bollinger_std)?,
        };

        debug!(
            "computed indicators over {} samples (rsi defined: {}, bollinger defined: {})",
            series.len(),
            set.rsi.defined_count(),
            set.bollinger.middle.defined_count()
        );

        Ok(set)
    }

    pub fn latest(&self) -> IndicatorSnapshot {
        let macd = self.macd.macd.last_defined();
        let macd_signal = self.macd.signal.last_defined();
        IndicatorSnapshot {
            rolling_mean: self.rolling_mean.last_defined(),
            rolling_volatility: self.rolling_volatility.last_defined(),
            rsi: self.rsi.last_defined(),
            macd,
            macd_signal,
            macd_histogram: macd.zip(macd_signal).map(|(m, s)| m - s),
            bollinger_middle: self.bollinger.middle.last_defined(),
            bollinger_upper: self.bollinger.upper.last_defined(),
            bollinger_lower: self.bollinger.lower.last_defined(),
        }
    }
}
