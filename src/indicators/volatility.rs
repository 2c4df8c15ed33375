//! Volatility indicators: daily returns, rolling volatility and Bollinger Bands

use serde::Serialize;

use crate::error::{Result, ensure_non_negative};
use crate::indicators::moving_averages::{rolling_mean, rolling_std, rolling_std_of};
use crate::indicators::series::{DerivedSeries, PriceSeries};

pub const DEFAULT_BOLLINGER_WINDOW: usize = 20;
pub const DEFAULT_BOLLINGER_STD: f64 = 2.0;
pub const DEFAULT_ROLLING_WINDOW: usize = 7;

/// Percentage change between consecutive prices.
///
/// r[i] = (P[i] - P[i-1]) / P[i-1] * 100
///
/// Index 0 is `None`. Prices are expected to be positive, as enforced by
/// [`PriceSeries`].
pub fn daily_returns(prices: &[f64]) -> Vec<Option<f64>> {
    let mut returns = Vec::with_capacity(prices.len());
    if !prices.is_empty() {
        returns.push(None);
    }
    returns.extend(
        prices
            .windows(2)
            .map(|pair| Some((pair[1] - pair[0]) / pair[0] * 100.0)),
    );
    returns
}

/// Daily returns of a series with the leading undefined entry dropped.
/// This is the input expected by the risk model.
pub fn returns_for_risk(series: &PriceSeries) -> Vec<f64> {
    daily_returns(&series.prices()).into_iter().flatten().collect()
}

/// Trailing sample standard deviation of daily percentage returns.
///
/// Return `r[i]` needs price `i-1`, so the first defined index is `window`.
pub fn rolling_volatility(prices: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    rolling_std_of(&daily_returns(prices), window)
}

/// Bollinger Bands, index-aligned with the input prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerBands {
    pub middle: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Calculates Bollinger Bands.
///
/// - `middle` = trailing SMA over `window`
/// - `upper`  = middle + `num_std` * σ
/// - `lower`  = middle - `num_std` * σ
///
/// σ is the sample standard deviation (divides by `window - 1`), so `window`
/// must be at least 2. A constant window has σ = 0 exactly and all three bands
/// collapse onto the price.
pub fn bollinger_bands(prices: &[f64], window: usize, num_std: f64) -> Result<BollingerBands> {
    ensure_non_negative("num_std", num_std)?;

    let middle = rolling_mean(prices, window)?;
    let std_dev = rolling_std(prices, window)?;

    let band = |sign: f64| -> Vec<Option<f64>> {
        middle
            .iter()
            .zip(&std_dev)
            .map(|(m, s)| match (m, s) {
                (Some(m), Some(s)) => Some(m + sign * num_std * s),
                _ => None,
            })
            .collect()
    };
    let upper = band(1.0);
    let lower = band(-1.0);

    Ok(BollingerBands {
        middle,
        upper,
        lower,
    })
}

/// Bollinger Bands on a [`PriceSeries`] timestamp axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerSeries {
    pub middle: DerivedSeries,
    pub upper: DerivedSeries,
    pub lower: DerivedSeries,
}

impl BollingerSeries {
    /// Distance between the outer bands.
    pub fn width(&self) -> Result<DerivedSeries> {
        self.upper.zip_with(&self.lower, |u, l| u - l)
    }
}

pub fn bollinger_series(
    series: &PriceSeries,
    window: usize,
    num_std: f64,
) -> Result<BollingerSeries> {
    let bands = bollinger_bands(&series.prices(), window, num_std)?;
    Ok(BollingerSeries {
        middle: series.derive(bands.middle)?,
        upper: series.derive(bands.upper)?,
        lower: series.derive(bands.lower)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_daily_returns() {
        let returns = daily_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns[0], None);
        assert_relative_eq!(returns[1].unwrap(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(returns[2].unwrap(), -10.0, epsilon = 1e-12);
        assert!(daily_returns(&[]).is_empty());
    }

    #[test]
    fn test_returns_for_risk_drops_leading_value() {
        let series = PriceSeries::from_prices(0, &[100.0, 110.0, 99.0]).unwrap();
        assert_eq!(returns_for_risk(&series).len(), 2);
    }

    #[test]
    fn test_rolling_volatility_first_defined_index() {
        let prices = [100.0, 101.0, 99.0, 102.0, 98.0, 103.0];
        let vol = rolling_volatility(&prices, 3).unwrap();
        assert!(vol[..3].iter().all(Option::is_none));
        assert!(vol[3..].iter().all(|v| v.unwrap() > 0.0));
    }

    #[test]
    fn test_rolling_volatility_flat_is_zero() {
        let vol = rolling_volatility(&[50.0; 10], 7).unwrap();
        assert_eq!(vol[7], Some(0.0));
    }

    #[test]
    fn test_bollinger_order() {
        let prices = [
            100.0, 102.0, 99.0, 104.0, 103.0, 107.0, 101.0, 98.0, 105.0, 110.0,
        ];
        let bands = bollinger_bands(&prices, 5, 2.0).unwrap();
        for i in 4..prices.len() {
            let (u, m, l) = (
                bands.upper[i].unwrap(),
                bands.middle[i].unwrap(),
                bands.lower[i].unwrap(),
            );
            assert!(u > m && m > l);
        }
        assert!(bands.upper[..4].iter().all(Option::is_none));
    }

    #[test]
    fn test_bollinger_known_value() {
        let bands = bollinger_bands(&[1.0, 2.0, 3.0], 3, 2.0).unwrap();
        // mean 2, sample std 1
        assert_relative_eq!(bands.middle[2].unwrap(), 2.0);
        assert_relative_eq!(bands.upper[2].unwrap(), 4.0);
        assert_relative_eq!(bands.lower[2].unwrap(), 0.0);
    }

    #[test]
    fn test_bollinger_constant_prices_collapse() {
        let bands = bollinger_bands(&[0.3; 25], 20, 2.0).unwrap();
        for i in 19..25 {
            assert_eq!(bands.upper[i], Some(0.3));
            assert_eq!(bands.middle[i], Some(0.3));
            assert_eq!(bands.lower[i], Some(0.3));
        }
    }

    #[test]
    fn test_bollinger_invalid_parameters() {
        assert!(bollinger_bands(&[1.0, 2.0, 3.0], 1, 2.0).is_err());
        assert!(bollinger_bands(&[1.0, 2.0, 3.0], 0, 2.0).is_err());
        assert!(bollinger_bands(&[1.0, 2.0, 3.0], 2, -1.0).is_err());
    }

    #[test]
    fn test_bollinger_series_width() {
        let series = PriceSeries::from_prices(0, &[1.0, 2.0, 3.0]).unwrap();
        let bands = bollinger_series(&series, 3, 2.0).unwrap();
        let width = bands.width().unwrap();
        assert_eq!(width.value_at(1), None);
        assert_relative_eq!(width.value_at(2).unwrap(), 4.0);
    }
}
