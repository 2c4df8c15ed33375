//! Moving averages: trailing Simple Moving Average, trailing sample standard
//! deviation and the Exponential Moving Average (EMA)

use log::warn;

use crate::error::{AnalyticsError, Result, ensure_window};

/// Calculates the trailing Simple Moving Average for every index.
///
/// SMA[i] = (P[i-window+1] + ... + P[i]) / window
///
/// The first `window - 1` entries are `None`. A window longer than the input
/// yields an all-`None` series rather than an error.
pub fn rolling_mean(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    ensure_window("window", window)?;
    rolling_mean_of(&lift(values), window)
}

/// Same as [`rolling_mean`] over a series that may contain undefined entries.
pub fn rolling_mean_of(values: &[Option<f64>], window: usize) -> Result<Vec<Option<f64>>> {
    ensure_window("window", window)?;
    Ok(rolling_apply(values, window, mean))
}

/// Calculates the trailing sample standard deviation (divides by `window - 1`)
/// for every index.
///
/// Needs `window >= 2`; a window of one sample has no sample deviation.
pub fn rolling_std(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    rolling_std_of(&lift(values), window)
}

/// Same as [`rolling_std`] over a series that may already contain undefined
/// entries (e.g. daily returns). Any window touching an undefined entry is
/// itself undefined.
pub fn rolling_std_of(values: &[Option<f64>], window: usize) -> Result<Vec<Option<f64>>> {
    ensure_window("window", window)?;
    if window < 2 {
        return Err(AnalyticsError::invalid(
            "window",
            "sample standard deviation needs a window of at least 2",
        ));
    }
    Ok(rolling_apply(values, window, sample_std))
}

/// Calculates the full Exponential Moving Average series.
///
/// EMA[0] = P[0]
/// EMA[i] = P[i] * alpha + EMA[i-1] * (1 - alpha), alpha = 2 / (span + 1)
///
/// Seeded with the first sample, not a simple-average seed, so every index is
/// defined. An empty input gives an empty output.
pub fn ema_series(values: &[f64], span: usize) -> Result<Vec<f64>> {
    ensure_window("span", span)?;

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut ema_values: Vec<f64> = Vec::with_capacity(values.len());

    for &value in values {
        // Incremental form: an unchanged input leaves the EMA bit-for-bit unchanged
        let next = match ema_values.last() {
            Some(prev) => prev + alpha * (value - prev),
            None => value,
        };
        ema_values.push(next);
    }

    Ok(ema_values)
}

/// Arithmetic mean of a full window.
///
/// A constant window returns its value exactly, so a flat series never
/// drifts by a rounding error.
pub(crate) fn mean(window: &[f64]) -> f64 {
    if is_constant(window) {
        return window[0];
    }
    window.iter().sum::<f64>() / window.len() as f64
}

/// Sample standard deviation (`n - 1` denominator). Exactly zero for a
/// constant window; callers guarantee `window.len() >= 2`.
pub(crate) fn sample_std(window: &[f64]) -> f64 {
    if is_constant(window) {
        return 0.0;
    }
    let avg = mean(window);
    let variance = window.iter().map(|x| (x - avg).powi(2)).sum::<f64>()
        / (window.len() - 1) as f64;
    variance.max(0.0).sqrt()
}

fn is_constant(window: &[f64]) -> bool {
    match window.first() {
        Some(first) => window.iter().all(|x| x == first),
        None => false,
    }
}

fn lift(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().map(|&v| Some(v)).collect()
}

/// Applies `f` to every trailing window of `window` fully-defined values.
fn rolling_apply<F>(values: &[Option<f64>], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    if window > values.len() {
        warn!(
            "window {} exceeds series length {}, output is undefined",
            window,
            values.len()
        );
        return vec![None; values.len()];
    }

    let mut out = vec![None; values.len()];
    let mut buffer = Vec::with_capacity(window);

    for i in (window - 1)..values.len() {
        buffer.clear();
        buffer.extend(values[i + 1 - window..=i].iter().map_while(|v| *v));
        if buffer.len() == window {
            out[i] = Some(f(&buffer));
        }
    }

    out
}
