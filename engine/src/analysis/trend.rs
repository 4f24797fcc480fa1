use shared::models::Trend;
use std::cmp::Ordering;

use crate::indicators::sma;

/// Relative tolerance under which two prices compare as equal.
pub const PRICE_TOLERANCE: f64 = 1e-9;

/// Compares two prices, treating values within [`PRICE_TOLERANCE`] (relative to
/// the larger magnitude, at least 1.0) as equal. Moving averages of a constant
/// series can drift by a few ulps from the price itself.
pub fn compare_prices(a: f64, b: f64) -> Ordering {
    let scale = a.abs().max(b.abs()).max(1.0);
    if (a - b).abs() <= PRICE_TOLERANCE * scale {
        Ordering::Equal
    } else if a > b {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

fn side(price: f64, average: f64) -> i32 {
    match compare_prices(price, average) {
        Ordering::Greater => 1,
        Ordering::Less => -1,
        Ordering::Equal => 0,
    }
}

/// `+1/-1` for price above/below the fast SMA plus `+2/-2` for the slow SMA.
/// `None` when either SMA has fewer than 2 points.
pub fn trend_score(closes: &[f64], fast_period: usize, slow_period: usize) -> Option<i32> {
    let fast = sma(closes, fast_period);
    let slow = sma(closes, slow_period);
    if fast.len() < 2 || slow.len() < 2 {
        return None;
    }
    let price = *closes.last()?;
    let fast_last = *fast.last()?;
    let slow_last = *slow.last()?;
    Some(side(price, fast_last) + 2 * side(price, slow_last))
}

/// BULLISH above +2, BEARISH below -2, NEUTRAL otherwise or with too little data.
pub fn classify_trend(closes: &[f64], fast_period: usize, slow_period: usize) -> Trend {
    match trend_score(closes, fast_period, slow_period) {
        Some(score) if score > 2 => Trend::Bullish,
        Some(score) if score < -2 => Trend::Bearish,
        _ => Trend::Neutral,
    }
}
