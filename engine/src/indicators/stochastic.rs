// Stochastic oscillator (%K only)
use serde::Serialize;
use shared::models::Candle;

pub const NEUTRAL_STOCHASTIC: f64 = 50.0;

/// `d` is not computed and stays at 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stochastic {
    pub k: f64,
    pub d: f64,
}

/// `%K = (last close - lowest low) / (highest high - lowest low) * 100` over the
/// last `k_period` candles.
///
/// Fewer candles than `k_period` (or `k_period == 0`) use every candle. An
/// empty input or a zero high-low range gives [`NEUTRAL_STOCHASTIC`].
pub fn stochastic(candles: &[Candle], k_period: usize) -> Stochastic {
    let Some(last) = candles.last() else {
        return Stochastic { k: NEUTRAL_STOCHASTIC, d: 0.0 };
    };
    let n = if k_period == 0 { candles.len() } else { k_period.min(candles.len()) };
    let window = &candles[candles.len() - n..];

    let lowest_low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let highest_high = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let range = highest_high - lowest_low;

    let k = if range > 0.0 {
        (last.close - lowest_low) / range * 100.0
    } else {
        NEUTRAL_STOCHASTIC
    };
    Stochastic { k, d: 0.0 }
}
