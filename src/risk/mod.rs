//! Whole-series risk metrics computed from daily percentage returns.
//!
//! Input is a return series in percent (pct-change × 100) with the leading
//! undefined value already dropped, as produced by
//! [`returns_for_risk`](crate::indicators::volatility::returns_for_risk).
//! Unlike the windowed indicators, these statistics need the full series and
//! fail with [`AnalyticsError::InsufficientData`] on an empty one.

pub mod correlation;
pub mod statistics;

use log::debug;
use serde::Serialize;

use crate::error::{AnalyticsError, Result};
use crate::indicators::moving_averages::{mean, sample_std};

/// Trading days per year used to annualize daily figures.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Percentile used for the 95% Value at Risk.
const VAR_95_PERCENTILE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskMetrics {
    /// 5th percentile of daily returns, in percent
    pub var_95: f64,
    /// Worst peak-to-trough decline, in percent (always `<= 0`)
    pub max_drawdown: f64,
    /// Mean daily return × 252, in percent
    pub annualized_return: f64,
    /// Sample std of daily returns × sqrt(252), in percent
    pub annualized_volatility: f64,
    /// annualized_return / annualized_volatility, 0 when volatility is 0
    pub sharpe_ratio: f64,
}

impl RiskMetrics {
    pub fn compute(returns: &[f64]) -> Result<Self> {
        validate_returns(returns)?;

        let annualized_return = annualized_return(returns)?;
        let annualized_volatility = annualized_volatility(returns)?;
        let metrics = Self {
            var_95: value_at_risk_95(returns)?,
            max_drawdown: max_drawdown(returns)?,
            annualized_return,
            annualized_volatility,
            sharpe_ratio: sharpe_ratio(annualized_return, annualized_volatility),
        };

        debug!("computed risk metrics over {} returns: {:?}", returns.len(), metrics);
        Ok(metrics)
    }
}

/// Percentile with linear interpolation between order statistics.
///
/// rank = p / 100 * (n - 1); the result interpolates between the samples at
/// `floor(rank)` and `ceil(rank)` of the sorted input.
pub fn percentile(values: &[f64], pct: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(AnalyticsError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    if !(0.0..=100.0).contains(&pct) {
        return Err(AnalyticsError::invalid(
            "percentile",
            format!("must be within 0..=100, got {pct}"),
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Value at Risk at 95% confidence: the 5th percentile of returns.
pub fn value_at_risk_95(returns: &[f64]) -> Result<f64> {
    validate_returns(returns)?;
    percentile(returns, VAR_95_PERCENTILE)
}

/// Drawdown at every step of the compounded return path.
///
/// cum[i]      = Π (1 + r[k] / 100), k <= i
/// drawdown[i] = cum[i] / max(cum[..=i]) - 1
pub fn drawdown_series(returns: &[f64]) -> Result<Vec<f64>> {
    validate_returns(returns)?;

    let mut cumulative = 1.0;
    let mut running_max = f64::NEG_INFINITY;
    let mut drawdowns = Vec::with_capacity(returns.len());

    for r in returns {
        cumulative *= 1.0 + r / 100.0;
        running_max = running_max.max(cumulative);
        drawdowns.push(cumulative / running_max - 1.0);
    }

    Ok(drawdowns)
}

/// Worst drawdown in percent. Exactly 0 when the compounded path never
/// declines.
pub fn max_drawdown(returns: &[f64]) -> Result<f64> {
    let worst = drawdown_series(returns)?
        .into_iter()
        .fold(0.0_f64, f64::min);
    Ok(worst * 100.0)
}

pub fn annualized_return(returns: &[f64]) -> Result<f64> {
    validate_returns(returns)?;
    Ok(mean(returns) * TRADING_DAYS_PER_YEAR)
}

/// Annualized sample volatility. A single return has no sample deviation and
/// is reported as 0.
pub fn annualized_volatility(returns: &[f64]) -> Result<f64> {
    validate_returns(returns)?;
    if returns.len() < 2 {
        return Ok(0.0);
    }
    Ok(sample_std(returns) * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Sharpe ratio without a risk-free rate; 0 when volatility is 0.
pub fn sharpe_ratio(annualized_return: f64, annualized_volatility: f64) -> f64 {
    if annualized_volatility == 0.0 {
        return 0.0;
    }
    annualized_return / annualized_volatility
}

fn validate_returns(returns: &[f64]) -> Result<()> {
    if returns.is_empty() {
        return Err(AnalyticsError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    if let Some((i, r)) = returns
        .iter()
        .enumerate()
        .find(|(_, r)| !r.is_finite() || **r <= -100.0)
    {
        return Err(AnalyticsError::invalid(
            "returns",
            format!("return at index {i} must be finite and above -100%, got {r}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_returns_is_insufficient_data() {
        assert_eq!(
            RiskMetrics::compute(&[]),
            Err(AnalyticsError::InsufficientData {
                required: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn test_invalid_returns_rejected() {
        assert!(RiskMetrics::compute(&[1.0, f64::NAN]).is_err());
        assert!(RiskMetrics::compute(&[1.0, -100.0]).is_err());
    }

    #[test]
    fn test_percentile_interpolates() {
        let values = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(percentile(&values, 0.0).unwrap(), 1.0);
        assert_eq!(percentile(&values, 50.0).unwrap(), 3.0);
        assert_eq!(percentile(&values, 100.0).unwrap(), 5.0);
        // rank 0.2 between 1 and 2
        assert_relative_eq!(percentile(&values, 5.0).unwrap(), 1.2, epsilon = 1e-12);
        assert!(percentile(&values, 101.0).is_err());
    }

    #[test]
    fn test_var_of_twenty_returns() {
        let returns: Vec<f64> = (1..=20).map(|i| i as f64 - 10.0).collect();
        // sorted -9..=10, rank 0.95 -> -9 + 0.95
        assert_relative_eq!(value_at_risk_95(&returns).unwrap(), -8.05, epsilon = 1e-12);
    }

    #[test]
    fn test_max_drawdown_known_path() {
        // 100 -> 110 -> 88 -> 96.8
        let dd = max_drawdown(&[10.0, -20.0, 10.0]).unwrap();
        assert_relative_eq!(dd, -20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_max_drawdown_zero_for_non_decreasing_path() {
        assert_eq!(max_drawdown(&[1.0, 0.0, 2.5, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_drawdown_series_never_positive() {
        let series = drawdown_series(&[3.0, -1.0, -4.0, 6.0, -2.0]).unwrap();
        assert!(series.iter().all(|d| *d <= 0.0));
        assert_eq!(series[0], 0.0);
    }

    #[test]
    fn test_annualized_figures() {
        let returns = [1.0, -1.0, 2.0, 0.0];
        assert_relative_eq!(annualized_return(&returns).unwrap(), 0.5 * 252.0, epsilon = 1e-9);
        let std = sample_std(&returns);
        assert_relative_eq!(
            annualized_volatility(&returns).unwrap(),
            std * 252.0_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_volatility_sharpe_is_zero() {
        let metrics = RiskMetrics::compute(&[0.5, 0.5, 0.5]).unwrap();
        assert_eq!(metrics.annualized_volatility, 0.0);
        assert_eq!(metrics.sharpe_ratio, 0.0);
        assert_relative_eq!(metrics.annualized_return, 126.0, epsilon = 1e-9);
    }

    #[test]
    fn test_single_return() {
        let metrics = RiskMetrics::compute(&[2.0]).unwrap();
        assert_eq!(metrics.var_95, 2.0);
        assert_eq!(metrics.max_drawdown, 0.0);
        assert_eq!(metrics.annualized_volatility, 0.0);
        assert_eq!(metrics.sharpe_ratio, 0.0);
    }

    #[test]
    fn test_sharpe_ratio() {
        assert_eq!(sharpe_ratio(10.0, 0.0), 0.0);
        assert_relative_eq!(sharpe_ratio(10.0, 20.0), 0.5);
        assert_relative_eq!(sharpe_ratio(-10.0, 20.0), -0.5);
    }
}
