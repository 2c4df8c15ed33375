use approx::assert_relative_eq;
use mining_analytics::mining::{
    MiningParams, price_range, profitability, profitability_sweep, ths_to_hs,
};

fn s19_class_rig() -> MiningParams {
    MiningParams {
        hashrate: ths_to_hs(110.0),
        power_consumption: 3250.0,
        power_cost: 0.02,
        pool_fee_pct: 1.5,
        hardware_cost: 2_500.0,
        network_difficulty: 72.0e12,
    }
}

#[test]
fn test_realistic_rig() {
    let params = s19_class_rig();
    let result = profitability(42_000.0, &params).unwrap();

    let daily_btc = 110e12 * 86_400.0 / (72.0e12 * 4_294_967_296.0);
    assert_relative_eq!(result.daily_btc, daily_btc, max_relative = 1e-12);
    assert_relative_eq!(result.daily_power_cost, 3.25 * 24.0 * 0.02, max_relative = 1e-12);

    let revenue = daily_btc * 42_000.0;
    assert_relative_eq!(
        result.daily_profit,
        revenue - revenue * 0.015 - 1.56,
        max_relative = 1e-9
    );
    assert_relative_eq!(
        result.break_even_price,
        1.56 / daily_btc,
        max_relative = 1e-9
    );
}

#[test]
fn test_break_even_price_is_where_pre_fee_profit_crosses_zero() {
    let params = MiningParams {
        pool_fee_pct: 0.0,
        ..s19_class_rig()
    };
    let break_even = profitability(1.0, &params).unwrap().break_even_price;
    let at_break_even = profitability(break_even, &params).unwrap();
    assert!(at_break_even.daily_profit.abs() < 1e-9);
    assert!(at_break_even.roi_days > 1e9 || at_break_even.roi_days.is_infinite());
}

#[test]
fn test_sweep_crosses_from_loss_to_profit() {
    let params = s19_class_rig();
    let prices = price_range(20_000.0, 100_000.0, 5_000.0).unwrap();
    let sweep = profitability_sweep(&params, &prices).unwrap();

    assert_eq!(sweep.len(), prices.len());
    assert!(sweep.windows(2).all(|w| w[1].daily_profit > w[0].daily_profit));

    assert!(sweep.first().unwrap().daily_profit < 0.0);
    assert!(sweep.last().unwrap().daily_profit > 0.0);

    // With the pool fee, profit turns positive above break_even / (1 - fee)
    let threshold = profitability(1.0, &params).unwrap().break_even_price / 0.985;
    for point in &sweep {
        assert_eq!(point.daily_profit > 0.0, point.price > threshold);
    }
}

#[test]
fn test_unprofitable_rig_reports_infinite_payback() {
    let params = MiningParams {
        power_cost: 1.0,
        ..s19_class_rig()
    };
    let result = profitability(20_000.0, &params).unwrap();
    assert!(result.daily_profit < 0.0);
    assert_eq!(result.roi_days, f64::INFINITY);
    assert!(result.break_even_price.is_finite());
    assert!(result.yearly_profit < result.monthly_profit);
}
