//! CoinGecko `/coins/{id}/market_chart` payloads.
//!
//! ```json
//! {"prices": [[1704067200000, 42280.23], ...],
//!  "market_caps": [[...]],
//!  "total_volumes": [[1704067200000, 9.1e9], ...]}
//! ```

use std::collections::{BTreeMap, HashMap};

use log::debug;
use serde::Deserialize;

use crate::error::{AnalyticsError, Result};
use crate::indicators::series::{PricePoint, PriceSeries};
use crate::market::PriceParser;

#[derive(Debug, Deserialize)]
struct MarketChart {
    prices: Vec<(f64, f64)>,
    // Absent when the caller trimmed the payload to prices only
    #[serde(default)]
    total_volumes: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Default)]
pub struct CoinGeckoParser;

impl CoinGeckoParser {
    pub fn new() -> Self {
        Self
    }
}

impl PriceParser for CoinGeckoParser {
    fn name(&self) -> &'static str {
        "CoinGecko"
    }

    /// Daily charts repeat the current day as a final intraday sample; when two
    /// samples share a timestamp the later one in the payload wins.
    fn parse_series(&self, payload: &str) -> Result<PriceSeries> {
        let chart: MarketChart = serde_json::from_str(payload)
            .map_err(|e| AnalyticsError::Payload(format!("{}: {}", self.name(), e)))?;

        let volumes: HashMap<u64, f64> = chart
            .total_volumes
            .iter()
            .map(|&(ts, volume)| -> Result<(u64, f64)> { Ok((to_millis(ts)?, volume)) })
            .collect::<Result<_>>()?;

        let mut by_timestamp = BTreeMap::new();
        for &(ts, price) in &chart.prices {
            by_timestamp.insert(to_millis(ts)?, price);
        }

        let points = by_timestamp
            .into_iter()
            .map(|(ts, price)| match volumes.get(&ts) {
                Some(&volume) => PricePoint::new(ts, price).with_volume(volume),
                None => PricePoint::new(ts, price),
            })
            .collect::<Vec<_>>();

        debug!(
            "[{}] decoded {} price samples ({} raw)",
            self.name(),
            points.len(),
            chart.prices.len()
        );

        PriceSeries::new(points)
    }
}

// Millisecond timestamps must be whole and fit a u64 without saturating
fn to_millis(ts: f64) -> Result<u64> {
    if !ts.is_finite() || ts < 0.0 || ts.fract() != 0.0 || ts >= u64::MAX as f64 {
        return Err(AnalyticsError::Payload(format!("invalid timestamp {ts}")));
    }
    Ok(ts as u64)
}
