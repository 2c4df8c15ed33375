//! Technical indicators, risk metrics and mining profitability for daily
//! asset price series.
//!
//! Every computation is a pure function of its inputs: nothing is cached and
//! no input series is mutated, so all of it can be called concurrently.

pub mod config;
pub mod error;
pub mod indicators;
pub mod market;
pub mod mining;
pub mod report;
pub mod risk;

// Re-exports for convenience
pub use config::{AnalysisConfig, SweepConfig};
pub use error::{AnalyticsError, Result};
pub use indicators::{DerivedSeries, IndicatorConfig, IndicatorSet, PricePoint, PriceSeries};
pub use market::{CoinGeckoParser, PriceParser};
pub use mining::{MiningParams, ProfitabilityResult, profitability, profitability_sweep};
pub use report::AnalysisReport;
pub use risk::RiskMetrics;
