// Simple Moving Average (SMA) indicator implementation
use super::IndicatorCalculator;
use shared::models::Candle;
use serde_json::Value;

/// Arithmetic mean of every window of `period` consecutive prices.
///
/// Output has `prices.len() - period + 1` values; empty when the input is
/// shorter than `period` or `period` is 0.
pub fn sma(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period {
        return Vec::new();
    }
    prices
        .windows(period)
        .map(|window| window.iter().sum::<f64>() / period as f64)
        .collect()
}

/// Last SMA value, if the series is long enough to produce one.
pub fn last_sma(prices: &[f64], period: usize) -> Option<f64> {
    sma(prices, period).last().copied()
}

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("SMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<f64> {
        let closes: Vec<f64> = data.iter().map(|c| c.close).collect();
        sma(&closes, self.period)
    }
}
