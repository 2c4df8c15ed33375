//! Input boundary: decoding price payloads from market-data providers into a
//! validated [`PriceSeries`](crate::indicators::PriceSeries).
//!
//! Fetching is left to the caller; a parser only turns an already-downloaded
//! payload into a series.

pub mod coingecko;

use crate::error::Result;
use crate::indicators::series::PriceSeries;

// Each provider implements PriceParser; downstream code only ever sees the
// normalized PriceSeries, so adding a provider means adding one parser.

/// Provider-specific payload decoding.
pub trait PriceParser: Send + Sync {
    fn name(&self) -> &'static str;

    /// Decodes a raw payload into an ordered, validated series.
    fn parse_series(&self, payload: &str) -> Result<PriceSeries>;
}

pub use coingecko::CoinGeckoParser;
