//! Momentum indicators: Relative Strength Index (RSI) and Moving Average
//! Convergence Divergence (MACD)

use serde::Serialize;

use crate::error::{AnalyticsError, Result, ensure_window};
use crate::indicators::moving_averages::{ema_series, rolling_mean_of};
use crate::indicators::series::{DerivedSeries, PriceSeries};

pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_MACD_FAST: usize = 12;
pub const DEFAULT_MACD_SLOW: usize = 26;
pub const DEFAULT_MACD_SIGNAL: usize = 9;

/// RSI when the window holds neither gains nor losses.
const RSI_NEUTRAL: f64 = 50.0;
/// RSI when the window holds gains but no losses.
const RSI_SATURATED: f64 = 100.0;

/// Calculates the Relative Strength Index for every index.
///
/// RSI oscillates between 0 and 100:
///
/// RSI = 100 - (100 / (1 + RS))
/// where RS = trailing mean gain / trailing mean loss over `period` steps
///
/// Averages are simple trailing means (not Wilder smoothing), so the first
/// `period` entries are `None`: index `period` is the first one with `period`
/// price changes behind it.
///
/// Zero denominators resolve to fixed values:
/// - no losses, some gains: 100
/// - no losses, no gains (flat window): 50
///
/// Common interpretation:
/// - RSI > 70: Overbought
/// - RSI < 30: Oversold
pub fn rsi(prices: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    ensure_window("period", period)?;

    let changes = price_changes(prices);
    let (gains, losses) = gains_and_losses(&changes);
    let avg_gains = rolling_mean_of(&gains, period)?;
    let avg_losses = rolling_mean_of(&losses, period)?;

    Ok(avg_gains
        .iter()
        .zip(&avg_losses)
        .map(|(gain, loss)| match (gain, loss) {
            (Some(gain), Some(loss)) => Some(rsi_value(*gain, *loss)),
            _ => None,
        })
        .collect())
}

/// [`rsi`] on a [`PriceSeries`], aligned on its timestamps.
pub fn rsi_series(series: &PriceSeries, period: usize) -> Result<DerivedSeries> {
    series.derive(rsi(&series.prices(), period)?)
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { RSI_SATURATED } else { RSI_NEUTRAL };
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Calculates price changes between consecutive samples.
///
/// Index 0 has no previous sample and is `None`; index `i` holds
/// `P[i] - P[i-1]`.
fn price_changes(prices: &[f64]) -> Vec<Option<f64>> {
    let mut changes = Vec::with_capacity(prices.len());
    if !prices.is_empty() {
        changes.push(None);
    }
    changes.extend(prices.windows(2).map(|pair| Some(pair[1] - pair[0])));
    changes
}

/// Separates price changes into gains and losses.
///
/// - gains[i] = change if positive, else 0
/// - losses[i] = |change| if negative, else 0
fn gains_and_losses(changes: &[Option<f64>]) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let gains = changes.iter().map(|c| c.map(|c| c.max(0.0))).collect();
    let losses = changes.iter().map(|c| c.map(|c| (-c).max(0.0))).collect();
    (gains, losses)
}

/// MACD line and its signal line, index-aligned with the input prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Macd {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

impl Macd {
    /// MACD minus signal. Derived on demand, never stored.
    pub fn histogram(&self) -> Vec<f64> {
        self.macd
            .iter()
            .zip(&self.signal)
            .map(|(m, s)| m - s)
            .collect()
    }
}

/// Calculates MACD and its signal line.
///
/// macd[i]   = EMA_fast[i] - EMA_slow[i]
/// signal[i] = EMA(macd, signal_span)[i]
///
/// All EMAs are seeded with their first sample, so every index is defined.
/// Requires `0 < fast < slow` and `signal_span > 0`.
pub fn macd(prices: &[f64], fast: usize, slow: usize, signal_span: usize) -> Result<Macd> {
    ensure_window("fast", fast)?;
    ensure_window("slow", slow)?;
    ensure_window("signal", signal_span)?;
    if fast >= slow {
        return Err(AnalyticsError::invalid(
            "fast",
            format!("fast span {fast} must be shorter than slow span {slow}"),
        ));
    }

    let fast_ema = ema_series(prices, fast)?;
    let slow_ema = ema_series(prices, slow)?;
    let macd_line: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_series(&macd_line, signal_span)?;

    Ok(Macd {
        macd: macd_line,
        signal: signal_line,
    })
}

/// MACD computed on a [`PriceSeries`], with both lines on its timestamp axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdSeries {
    pub macd: DerivedSeries,
    pub signal: DerivedSeries,
}

impl MacdSeries {
    pub fn histogram(&self) -> Result<DerivedSeries> {
        self.macd.zip_with(&self.signal, |m, s| m - s)
    }
}

pub fn macd_series(
    series: &PriceSeries,
    fast: usize,
    slow: usize,
    signal_span: usize,
) -> Result<MacdSeries> {
    let Macd { macd, signal } = macd(&series.prices(), fast, slow, signal_span)?;
    Ok(MacdSeries {
        macd: series.derive(macd.into_iter().map(Some).collect())?,
        signal: series.derive(signal.into_iter().map(Some).collect())?,
    })
}
