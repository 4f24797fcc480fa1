// Relative Strength Index (RSI) indicator implementation
use super::IndicatorCalculator;
use shared::models::Candle;
use serde_json::Value;

/// Returned when there are fewer than `period + 1` prices, and for a window
/// with no movement at all.
pub const NEUTRAL_RSI: f64 = 50.0;

/// RSI over the last `period` price changes only.
///
/// Average gain and average loss are plain means over that trailing window
/// (no Wilder smoothing). Rules for the degenerate cases:
/// - fewer than `period + 1` prices, or `period == 0`: [`NEUTRAL_RSI`]
/// - no gains and no losses in the window: [`NEUTRAL_RSI`]
/// - gains but no losses: 100
pub fn rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return NEUTRAL_RSI;
    }
    window_rsi(&prices[prices.len() - period - 1..])
}

// `window` holds period + 1 prices.
fn window_rsi(window: &[f64]) -> f64 {
    let period = (window.len() - 1) as f64;
    let (gains, losses) = window.windows(2).fold((0.0, 0.0), |(gains, losses), pair| {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            (gains + change, losses)
        } else {
            (gains, losses - change) // losses are positive values
        }
    });

    let avg_gain = gains / period;
    let avg_loss = losses / period;

    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            NEUTRAL_RSI
        } else {
            100.0
        }
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }
}

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    /// Trailing-window RSI at every index from `period` onwards.
    fn calculate(&self, data: &[Candle]) -> Vec<f64> {
        if self.period == 0 || data.len() <= self.period {
            return Vec::new();
        }
        let closes: Vec<f64> = data.iter().map(|c| c.close).collect();
        closes.windows(self.period + 1).map(window_rsi).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_candles(closes: &[f64]) -> Vec<Candle> {
        closes.iter().enumerate().map(|(i, &c)| Candle::flat(i as i64, c)).collect()
    }

    #[test]
    fn test_rsi_calculation() {
        let prices = [
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28,
        ];
        // Gains: 0.06 + 0.72 + 0.50 + 0.27 + 0.32 + 0.42 + 0.24 + 0.14 + 0.67 = 3.34
        // Losses: 0.25 + 0.54 + 0.19 + 0.42 = 1.40
        let expected = 100.0 - 100.0 / (1.0 + 3.34 / 1.40);
        let value = rsi(&prices, 14);
        assert!((value - expected).abs() < 1e-6, "RSI {} != {}", value, expected);
        assert!(value > 70.0 && value < 71.0);
    }

    #[test]
    fn test_rsi_uses_only_trailing_window() {
        // A crash long before the window must not matter.
        let mut prices = vec![100.0, 50.0];
        prices.extend((0..15).map(|i| 50.0 + i as f64));
        assert_eq!(rsi(&prices, 14), 100.0);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        assert_eq!(rsi(&[1.0; 14], 14), NEUTRAL_RSI);
        assert_eq!(rsi(&[], 14), NEUTRAL_RSI);
        assert_eq!(rsi(&[1.0, 2.0], 0), NEUTRAL_RSI);
    }

    #[test]
    fn test_rsi_all_gains() {
        let prices: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        assert_eq!(rsi(&prices, 14), 100.0);
    }

    #[test]
    fn test_rsi_all_losses() {
        let prices: Vec<f64> = (1..=20).map(|i| 20.0 - i as f64).collect();
        assert_eq!(rsi(&prices, 14), 0.0);
    }

    #[test]
    fn test_rsi_flat_window_is_neutral() {
        assert_eq!(rsi(&[1.10; 60], 14), NEUTRAL_RSI);
    }

    #[test]
    fn test_rsi_calculator_series() {
        let candles = create_candles(&(1..=20).map(|i| i as f64).collect::<Vec<_>>());
        let results = Rsi::new(14).calculate(&candles);
        assert_eq!(results.len(), 6);
        assert!(results.iter().all(|&v| v == 100.0));

        assert!(Rsi::new(14).calculate(&candles[..10]).is_empty());
    }
}
