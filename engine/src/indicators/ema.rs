// Exponential Moving Average (EMA) indicator implementation
use super::IndicatorCalculator;
use shared::models::Candle;
use serde_json::Value;

/// EMA seeded with the first raw price rather than an initial SMA, so the
/// output has exactly one value per input point and `ema[0] == prices[0]`.
///
/// A period of 0 is treated as 1 (the EMA then tracks the price exactly).
pub fn ema(prices: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = prices.first() else {
        return Vec::new();
    };
    let multiplier = 2.0 / (period.max(1) as f64 + 1.0);

    let mut results = Vec::with_capacity(prices.len());
    let mut previous_ema = first;
    results.push(previous_ema);

    for &price in &prices[1..] {
        previous_ema = (price - previous_ema) * multiplier + previous_ema;
        results.push(previous_ema);
    }
    results
}

pub struct Ema {
    name: String,
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("EMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<f64> {
        let closes: Vec<f64> = data.iter().map(|c| c.close).collect();
        ema(&closes, self.period)
    }
}
