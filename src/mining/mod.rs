//! Mining profitability model: expected yield, costs and payback of a rig at
//! a given spot price.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result, ensure_finite, ensure_non_negative};

pub const SECONDS_PER_DAY: f64 = 86_400.0;
/// Expected hashes per unit of difficulty (2^32).
pub const HASHES_PER_DIFFICULTY: f64 = 4_294_967_296.0;
const DAYS_PER_MONTH: f64 = 30.0;
const DAYS_PER_YEAR: f64 = 365.0;
const HOURS_PER_DAY: f64 = 24.0;
/// Upper bound on the length of a generated sweep axis.
pub const MAX_SWEEP_POINTS: usize = 100_000;

/// Converts a hashrate in TH/s to H/s, the unit the model works in.
pub fn ths_to_hs(terahashes: f64) -> f64 {
    terahashes * 1e12
}

/// Hardware and economic parameters of a mining setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningParams {
    /// Hashrate in H/s (not TH/s)
    pub hashrate: f64,
    /// Power draw in watts
    pub power_consumption: f64,
    /// Electricity price per kWh
    pub power_cost: f64,
    /// Pool fee as a percentage, 0..=100
    pub pool_fee_pct: f64,
    pub hardware_cost: f64,
    pub network_difficulty: f64,
}

impl Default for MiningParams {
    fn default() -> Self {
        Self {
            hashrate: ths_to_hs(500.0),
            power_consumption: 3000.0,
            power_cost: 0.12,
            pool_fee_pct: 2.0,
            hardware_cost: 10_000.0,
            network_difficulty: 71.8e6,
        }
    }
}

impl MiningParams {
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("hashrate", self.hashrate)?;
        ensure_non_negative("power_consumption", self.power_consumption)?;
        ensure_non_negative("power_cost", self.power_cost)?;
        ensure_non_negative("hardware_cost", self.hardware_cost)?;

        ensure_finite("pool_fee_pct", self.pool_fee_pct)?;
        if !(0.0..=100.0).contains(&self.pool_fee_pct) {
            return Err(AnalyticsError::invalid(
                "pool_fee_pct",
                format!("must be within 0..=100, got {}", self.pool_fee_pct),
            ));
        }

        ensure_finite("network_difficulty", self.network_difficulty)?;
        if self.network_difficulty <= 0.0 {
            return Err(AnalyticsError::invalid(
                "network_difficulty",
                format!("must be positive, got {}", self.network_difficulty),
            ));
        }
        Ok(())
    }
}

/// Daily economics of a mining setup at one spot price.
///
/// `roi_days` and `break_even_price` are `f64::INFINITY` when the setup never
/// pays back or produces nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfitabilityResult {
    pub daily_btc: f64,
    pub daily_revenue: f64,
    pub pool_fee_cost: f64,
    pub daily_power_cost: f64,
    pub daily_profit: f64,
    pub monthly_profit: f64,
    pub yearly_profit: f64,
    pub roi_days: f64,
    pub break_even_price: f64,
}

impl ProfitabilityResult {
    /// Profit as a percentage of revenue; `None` without revenue.
    pub fn profit_margin(&self) -> Option<f64> {
        (self.daily_revenue > 0.0).then(|| self.daily_profit / self.daily_revenue * 100.0)
    }

    pub fn is_profitable(&self) -> bool {
        self.daily_profit > 0.0
    }
}

/// Evaluates the profitability model.
///
/// ```text
/// daily_btc        = hashrate * 86400 / (difficulty * 2^32)
/// daily_revenue    = daily_btc * spot_price
/// pool_fee_cost    = daily_revenue * pool_fee_pct / 100
/// daily_power_cost = power_consumption / 1000 * 24 * power_cost
/// daily_profit     = daily_revenue - daily_power_cost - pool_fee_cost
/// roi_days         = hardware_cost / daily_profit   if daily_profit > 0 else +inf
/// break_even_price = daily_power_cost / daily_btc   if daily_btc > 0    else +inf
/// ```
pub fn profitability(spot_price: f64, params: &MiningParams) -> Result<ProfitabilityResult> {
    ensure_non_negative("spot_price", spot_price)?;
    params.validate()?;

    let daily_btc =
        params.hashrate * SECONDS_PER_DAY / (params.network_difficulty * HASHES_PER_DIFFICULTY);
    let daily_revenue = daily_btc * spot_price;
    let pool_fee_cost = daily_revenue * params.pool_fee_pct / 100.0;
    let daily_power_cost = params.power_consumption / 1000.0 * HOURS_PER_DAY * params.power_cost;
    let daily_profit = daily_revenue - daily_power_cost - pool_fee_cost;
    let yearly_profit = daily_profit * DAYS_PER_YEAR;
    for (name, value) in [
        ("daily_btc", daily_btc),
        ("daily_revenue", daily_revenue),
        ("daily_power_cost", daily_power_cost),
        ("daily_profit", daily_profit),
        ("yearly_profit", yearly_profit),
    ] {
        if !value.is_finite() {
            return Err(AnalyticsError::invalid(
                name,
                format!("parameters overflow the model at spot price {spot_price}: {value}"),
            ));
        }
    }

    let roi_days = if daily_profit > 0.0 {
        params.hardware_cost / daily_profit
    } else {
        f64::INFINITY
    };
    let break_even_price = if daily_btc > 0.0 {
        daily_power_cost / daily_btc
    } else {
        f64::INFINITY
    };

    if roi_days.is_infinite() {
        warn!(
            "no payback at spot price {}: daily profit {:.2}",
            spot_price, daily_profit
        );
    }
    debug!(
        "profitability at {}: daily_btc={:.8} daily_profit={:.2}",
        spot_price, daily_btc, daily_profit
    );

    Ok(ProfitabilityResult {
        daily_btc,
        daily_revenue,
        pool_fee_cost,
        daily_power_cost,
        daily_profit,
        monthly_profit: daily_profit * DAYS_PER_MONTH,
        yearly_profit,
        roi_days,
        break_even_price,
    })
}

/// One point of a profit-vs-price sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub price: f64,
    pub daily_profit: f64,
}

/// Evaluates [`profitability`] at every price of an ascending sequence.
pub fn profitability_sweep(params: &MiningParams, prices: &[f64]) -> Result<Vec<SweepPoint>> {
    if let Some(i) = prices.windows(2).position(|pair| pair[1] <= pair[0]) {
        return Err(AnalyticsError::invalid(
            "prices",
            format!("sweep prices must be strictly ascending at index {}", i + 1),
        ));
    }

    prices
        .iter()
        .map(|&price| {
            profitability(price, params).map(|result| SweepPoint {
                price,
                daily_profit: result.daily_profit,
            })
        })
        .collect()
}

/// Stepped price axis `start, start + step, ...` strictly below `end`.
pub fn price_range(start: f64, end: f64, step: f64) -> Result<Vec<f64>> {
    ensure_non_negative("start", start)?;
    ensure_finite("end", end)?;
    ensure_finite("step", step)?;
    if step <= 0.0 {
        return Err(AnalyticsError::invalid("step", format!("must be positive, got {step}")));
    }

    let count = ((end - start) / step).ceil().max(0.0);
    if count > MAX_SWEEP_POINTS as f64 {
        return Err(AnalyticsError::invalid(
            "step",
            format!("range {start}..{end} by {step} exceeds {MAX_SWEEP_POINTS} points"),
        ));
    }
    let count = count as usize;
    Ok((0..count).map(|i| start + i as f64 * step).collect())
}
