//! Full analysis of one price series: statistics, indicators, risk and mining
//! economics, ready to be serialized or printed.

use std::fmt;

use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::error::{AnalyticsError, Result};
use crate::indicators::engine::{IndicatorSet, IndicatorSnapshot};
use crate::indicators::series::PriceSeries;
use crate::indicators::volatility::returns_for_risk;
use crate::mining::{ProfitabilityResult, SweepPoint, profitability, profitability_sweep};
use crate::risk::RiskMetrics;
use crate::risk::statistics::PriceStatistics;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub samples: usize,
    pub from_timestamp: u64,
    pub to_timestamp: u64,
    pub price: PriceStatistics,
    pub indicators: IndicatorSnapshot,
    pub risk: RiskMetrics,
    /// Spot price fed to the mining model
    pub spot_price: f64,
    pub mining: ProfitabilityResult,
    pub sweep: Vec<SweepPoint>,
}

impl AnalysisReport {
    /// Runs every model over `series`. The mining model uses `spot_override`
    /// when given, otherwise the last price of the series.
    pub fn build(
        series: &PriceSeries,
        config: &AnalysisConfig,
        spot_override: Option<f64>,
    ) -> Result<Self> {
        let (from_timestamp, to_timestamp) = series
            .first_timestamp()
            .zip(series.last_timestamp())
            .ok_or(AnalyticsError::InsufficientData {
                required: 2,
                actual: 0,
            })?;

        let price = PriceStatistics::from_series(series)?;
        let indicators = IndicatorSet::compute(series, &config.indicators)?.latest();
        let risk = RiskMetrics::compute(&returns_for_risk(series))?;

        let spot_price = spot_override.unwrap_or(price.current);
        let mining = profitability(spot_price, &config.mining)?;
        let sweep = profitability_sweep(&config.mining, &config.sweep.prices()?)?;

        info!(
            "analysis built over {} samples, spot price {}",
            series.len(),
            spot_price
        );

        Ok(Self {
            samples: series.len(),
            from_timestamp,
            to_timestamp,
            price,
            indicators,
            risk,
            spot_price,
            mining,
            sweep,
        })
    }
}

fn format_timestamp(millis: u64) -> String {
    i64::try_from(millis)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn format_optional(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{v:.2}{suffix}"),
        None => "n/a".to_string(),
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Bitcoin Mining Data Analysis ===")?;
        writeln!(f)?;
        writeln!(f, "Timestamp Range ({} samples):", self.samples)?;
        writeln!(f, "From: {}", format_timestamp(self.from_timestamp))?;
        writeln!(f, "To: {}", format_timestamp(self.to_timestamp))?;

        writeln!(f)?;
        writeln!(f, "Price Statistics:")?;
        writeln!(f, "Current Price: ${:.2}", self.price.current)?;
        writeln!(f, "Average Price: ${:.2}", self.price.mean)?;
        writeln!(f, "Highest Price: ${:.2}", self.price.max)?;
        writeln!(f, "Lowest Price: ${:.2}", self.price.min)?;
        writeln!(f, "Price Volatility: ${}", format_optional(self.price.std_dev, ""))?;
        writeln!(
            f,
            "Rolling Volatility: {}",
            format_optional(self.indicators.rolling_volatility, "%")
        )?;

        writeln!(f)?;
        writeln!(f, "Technical Indicators:")?;
        writeln!(f, "Rolling Mean: {}", format_optional(self.indicators.rolling_mean, ""))?;
        writeln!(f, "RSI: {}", format_optional(self.indicators.rsi, ""))?;
        writeln!(f, "MACD: {}", format_optional(self.indicators.macd, ""))?;
        writeln!(f, "Signal Line: {}", format_optional(self.indicators.macd_signal, ""))?;
        writeln!(f, "MACD Histogram: {}", format_optional(self.indicators.macd_histogram, ""))?;
        writeln!(
            f,
            "Bollinger Bands: {} / {} / {}",
            format_optional(self.indicators.bollinger_lower, ""),
            format_optional(self.indicators.bollinger_middle, ""),
            format_optional(self.indicators.bollinger_upper, "")
        )?;

        writeln!(f)?;
        writeln!(f, "Risk Metrics:")?;
        writeln!(f, "Value at Risk (95%): {:.2}%", self.risk.var_95)?;
        writeln!(f, "Maximum Drawdown: {:.2}%", self.risk.max_drawdown)?;
        writeln!(f, "Annualized Return: {:.2}%", self.risk.annualized_return)?;
        writeln!(f, "Annualized Volatility: {:.2}%", self.risk.annualized_volatility)?;
        writeln!(f, "Sharpe Ratio: {:.2}", self.risk.sharpe_ratio)?;

        writeln!(f)?;
        writeln!(f, "Mining Metrics (spot ${:.2}):", self.spot_price)?;
        writeln!(f, "Daily Bitcoin Mined: {:.8} BTC", self.mining.daily_btc)?;
        writeln!(f, "Daily Revenue: ${:.2}", self.mining.daily_revenue)?;
        writeln!(f, "Daily Power Cost: ${:.2}", self.mining.daily_power_cost)?;
        writeln!(f, "Daily Profit: ${:.2}", self.mining.daily_profit)?;
        writeln!(f, "Monthly Profit: ${:.2}", self.mining.monthly_profit)?;
        writeln!(f, "Yearly Profit: ${:.2}", self.mining.yearly_profit)?;
        writeln!(f, "Break-even Price: ${:.2}", self.mining.break_even_price)?;
        writeln!(f, "ROI Period: {:.1} days", self.mining.roi_days)?;
        writeln!(
            f,
            "Profit Margin: {}",
            format_optional(self.mining.profit_margin(), "%")
        )?;

        writeln!(f)?;
        writeln!(f, "Daily Profit vs Price:")?;
        for point in &self.sweep {
            writeln!(f, "  ${:>10.0}  {:>14.2}", point.price, point.daily_profit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_series() -> PriceSeries {
        let prices: Vec<f64> = (0..40)
            .map(|i| 40_000.0 + (i as f64 * 0.4).sin() * 1_500.0 + i as f64 * 50.0)
            .collect();
        PriceSeries::from_prices(1_704_067_200_000, &prices).unwrap()
    }

    #[test]
    fn test_build_report() {
        let series = sample_series();
        let report = AnalysisReport::build(&series, &AnalysisConfig::default(), None).unwrap();

        assert_eq!(report.samples, 40);
        assert_eq!(report.spot_price, series.last_price().unwrap());
        assert!(report.indicators.rsi.is_some());
        assert!(report.risk.max_drawdown <= 0.0);
        assert_eq!(report.sweep.len(), 16);
    }

    #[test]
    fn test_spot_override() {
        let report =
            AnalysisReport::build(&sample_series(), &AnalysisConfig::default(), Some(0.0)).unwrap();
        assert_eq!(report.mining.daily_revenue, 0.0);
        assert!(report.mining.roi_days.is_infinite());
    }

    #[test]
    fn test_single_sample_has_no_returns() {
        let series = PriceSeries::from_prices(0, &[100.0]).unwrap();
        let err = AnalysisReport::build(&series, &AnalysisConfig::default(), None).unwrap_err();
        assert!(matches!(err, AnalyticsError::InsufficientData { .. }));
    }

    #[test]
    fn test_display_sections() {
        let report =
            AnalysisReport::build(&sample_series(), &AnalysisConfig::default(), None).unwrap();
        let text = report.to_string();
        assert!(text.contains("From: 2024-01-01 00:00:00"));
        assert!(text.contains("Risk Metrics:"));
        assert!(text.contains("Value at Risk (95%):"));
        assert!(text.contains("Break-even Price:"));
    }

    #[test]
    fn test_report_serializes() {
        let report =
            AnalysisReport::build(&sample_series(), &AnalysisConfig::default(), None).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["samples"], 40);
        assert!(json["risk"]["sharpe_ratio"].is_number());
    }
}
