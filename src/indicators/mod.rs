//! Technical indicators for price series analysis

pub mod engine;
pub mod momentum;
pub mod moving_averages;
pub mod series;
pub mod volatility;

pub use engine::{IndicatorConfig, IndicatorSet, IndicatorSnapshot};
pub use momentum::{Macd, MacdSeries, macd, macd_series, rsi, rsi_series};
pub use series::{DerivedSeries, PricePoint, PriceSeries};
pub use volatility::{
    BollingerBands, BollingerSeries, bollinger_bands, bollinger_series, daily_returns,
    returns_for_risk, rolling_volatility,
};
