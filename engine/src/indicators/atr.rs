// Average True Range (ATR) indicator implementation
use super::sma::sma;
use super::IndicatorCalculator;
use shared::models::Candle;
use serde_json::Value;

/// True range per candle. The first candle has no previous close, so its
/// true range is simply `high - low`.
pub fn true_ranges(candles: &[Candle]) -> Vec<f64> {
    candles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if i == 0 {
                return c.range();
            }
            let prev_close = candles[i - 1].close;
            c.range()
                .max((c.high - prev_close).abs())
                .max((c.low - prev_close).abs())
        })
        .collect()
}

/// Plain mean of the last `period` true ranges (not Wilder-smoothed).
///
/// Fewer candles than `period` (or `period == 0`) average whatever is
/// available; no candles gives 0.
pub fn atr(candles: &[Candle], period: usize) -> f64 {
    let ranges = true_ranges(candles);
    if ranges.is_empty() {
        return 0.0;
    }
    let n = if period == 0 { ranges.len() } else { period.min(ranges.len()) };
    ranges[ranges.len() - n..].iter().sum::<f64>() / n as f64
}

pub struct Atr {
    name: String,
    period: usize,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("ATR({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    /// Trailing ATR at every index from `period - 1` onwards.
    fn calculate(&self, data: &[Candle]) -> Vec<f64> {
        sma(&true_ranges(data), self.period)
    }
}
