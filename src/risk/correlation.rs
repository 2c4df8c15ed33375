//! Cross-asset correlation of return series.
//!
//! Fetching the other assets is the caller's job; these functions only take
//! already-collected series.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{AnalyticsError, Result, ensure_window};
use crate::indicators::series::PriceSeries;
use crate::indicators::volatility::daily_returns;

/// Pearson correlation coefficient of two equally long samples.
///
/// Returns 0 when either side has zero variance. The result is clamped to
/// [-1, 1] to absorb floating point error.
pub fn pearson(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(AnalyticsError::invalid(
            "series",
            format!("length mismatch: {} vs {}", a.len(), b.len()),
        ));
    }
    if a.len() < 2 {
        return Err(AnalyticsError::InsufficientData {
            required: 2,
            actual: a.len(),
        });
    }

    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut numer = 0.0;
    let mut denom_a = 0.0;
    let mut denom_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        numer += dx * dy;
        denom_a += dx * dx;
        denom_b += dy * dy;
    }

    if denom_a == 0.0 || denom_b == 0.0 {
        return Ok(0.0);
    }

    Ok((numer / (denom_a.sqrt() * denom_b.sqrt())).clamp(-1.0, 1.0))
}

/// Trailing-window Pearson correlation, index-aligned with the inputs.
/// The first `window - 1` entries are `None`.
pub fn rolling_correlation(a: &[f64], b: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    ensure_window("window", window)?;
    if window < 2 {
        return Err(AnalyticsError::invalid(
            "window",
            "correlation needs a window of at least 2",
        ));
    }
    if a.len() != b.len() {
        return Err(AnalyticsError::invalid(
            "series",
            format!("length mismatch: {} vs {}", a.len(), b.len()),
        ));
    }

    let mut out = vec![None; a.len()];
    if window > a.len() {
        return Ok(out);
    }
    for i in (window - 1)..a.len() {
        let start = i + 1 - window;
        out[i] = Some(pearson(&a[start..=i], &b[start..=i])?);
    }
    Ok(out)
}

/// Daily returns of two series on the timestamps they share.
///
/// Each return is computed on its own series first, then matched by
/// timestamp, so gaps in one series do not distort the other.
pub fn aligned_returns(a: &PriceSeries, b: &PriceSeries) -> (Vec<f64>, Vec<f64>) {
    let b_returns: HashMap<u64, f64> = b
        .timestamps()
        .into_iter()
        .zip(daily_returns(&b.prices()))
        .filter_map(|(ts, r)| r.map(|r| (ts, r)))
        .collect();

    a.timestamps()
        .into_iter()
        .zip(daily_returns(&a.prices()))
        .filter_map(|(ts, r)| Some((r?, *b_returns.get(&ts)?)))
        .unzip()
}

/// Symmetric matrix of pairwise correlations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Builds the matrix from named return series of equal length.
    pub fn from_returns(assets: &[(String, Vec<f64>)]) -> Result<Self> {
        let n = assets.len();
        let mut values = vec![vec![1.0; n]; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let rho = pearson(&assets[i].1, &assets[j].1)?;
                values[i][j] = rho;
                values[j][i] = rho;
            }
        }

        Ok(Self {
            names: assets.iter().map(|(name, _)| name.clone()).collect(),
            values,
        })
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        Some(self.values[i][j])
    }
}
