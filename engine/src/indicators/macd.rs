// Moving Average Convergence Divergence (MACD)
use serde::Serialize;

use super::ema::ema;

/// Last aligned MACD, signal and histogram values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Macd {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl Macd {
    pub fn is_bullish(&self) -> bool {
        self.histogram > 0.0 && self.macd > self.signal
    }

    pub fn is_bearish(&self) -> bool {
        self.histogram < 0.0 && self.macd < self.signal
    }
}

/// MACD line (fast EMA minus slow EMA) and its signal EMA.
///
/// The two EMAs are aligned on their common tail by trimming the head of the
/// longer one. With first-price seeding both have the input's length, so the
/// trim is a no-op unless the EMA seeding changes. An empty input yields zeros.
pub fn macd_lines(prices: &[f64], fast: usize, slow: usize, signal: usize) -> (Vec<f64>, Vec<f64>) {
    let fast_ema = ema(prices, fast);
    let slow_ema = ema(prices, slow);

    let len = fast_ema.len().min(slow_ema.len());
    let fast_tail = &fast_ema[fast_ema.len() - len..];
    let slow_tail = &slow_ema[slow_ema.len() - len..];

    let macd_line: Vec<f64> = fast_tail.iter().zip(slow_tail).map(|(f, s)| f - s).collect();
    let signal_line = ema(&macd_line, signal);
    (macd_line, signal_line)
}

pub fn macd(prices: &[f64], fast: usize, slow: usize, signal: usize) -> Macd {
    let (macd_line, signal_line) = macd_lines(prices, fast, slow, signal);
    match (macd_line.last(), signal_line.last()) {
        (Some(&macd), Some(&signal)) => Macd {
            macd,
            signal,
            histogram: macd - signal,
        },
        _ => Macd::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macd_rising_series_is_bullish() {
        let prices: Vec<f64> = (0..60).map(|i| 1.00 + 0.1 * i as f64 / 59.0).collect();
        let result = macd(&prices, 12, 26, 9);
        assert!(result.macd > 0.0);
        assert!(result.histogram > 0.0);
        assert!(result.is_bullish());
        assert!(!result.is_bearish());
    }

    #[test]
    fn test_macd_falling_series_is_bearish() {
        let prices: Vec<f64> = (0..60).map(|i| 1.10 - 0.1 * i as f64 / 59.0).collect();
        let result = macd(&prices, 12, 26, 9);
        assert!(result.macd < 0.0);
        assert!(result.is_bearish());
    }

    #[test]
    fn test_macd_histogram_is_difference() {
        let prices = [1.0850, 1.0862, 1.0841, 1.0855, 1.0870, 1.0866];
        let result = macd(&prices, 3, 5, 2);
        assert!((result.histogram - (result.macd - result.signal)).abs() < 1e-15);
    }

    #[test]
    fn test_macd_lines_align_with_input() {
        let prices = [1.0, 2.0, 3.0];
        let (line, signal) = macd_lines(&prices, 12, 26, 9);
        assert_eq!(line.len(), 3);
        assert_eq!(signal.len(), 3);
        assert_eq!(line[0], 0.0);
    }

    #[test]
    fn test_macd_degenerate_inputs() {
        assert_eq!(macd(&[], 12, 26, 9), Macd::default());
        let flat = macd(&[1.1; 40], 12, 26, 9);
        assert_eq!(flat, Macd::default());
    }
}
