// Bollinger Bands
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub std_dev: f64,
}

impl BollingerBands {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Position of `price` inside the bands: 0 at the lower band, 1 at the upper.
    /// `None` when the bands have collapsed.
    pub fn percent_b(&self, price: f64) -> Option<f64> {
        let width = self.width();
        if width > 0.0 {
            Some((price - self.lower) / width)
        } else {
            None
        }
    }
}

/// Bands around the last SMA(`period`), with the population standard deviation
/// of the last `period` closes taken around that middle value.
///
/// Shorter inputs (or `period == 0`) use the whole series as the window; an
/// empty input yields all zeros. A negative multiplier is taken by magnitude.
pub fn bollinger_bands(prices: &[f64], period: usize, std_dev_multiplier: f64) -> BollingerBands {
    if prices.is_empty() {
        return BollingerBands::default();
    }
    let window_len = if period == 0 { prices.len() } else { period.min(prices.len()) };
    let window = &prices[prices.len() - window_len..];

    let middle = window.iter().sum::<f64>() / window_len as f64;
    let variance = window.iter().map(|p| (p - middle).powi(2)).sum::<f64>() / window_len as f64;
    let std_dev = variance.sqrt();
    let offset = std_dev_multiplier.abs() * std_dev;

    BollingerBands {
        upper: middle + offset,
        middle,
        lower: middle - offset,
        std_dev,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bollinger_calculation() {
        // mean 5, population variance 4
        let prices = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let bands = bollinger_bands(&prices, 8, 2.0);
        assert!((bands.middle - 5.0).abs() < 1e-12);
        assert!((bands.std_dev - 2.0).abs() < 1e-12);
        assert!((bands.upper - 9.0).abs() < 1e-12);
        assert!((bands.lower - 1.0).abs() < 1e-12);
        assert_eq!(bands.percent_b(5.0), Some(0.5));
    }

    #[test]
    fn test_bollinger_uses_last_period_only() {
        let mut prices = vec![100.0; 10];
        prices.extend([1.0, 1.0, 1.0]);
        let bands = bollinger_bands(&prices, 3, 2.0);
        assert_eq!(bands.middle, 1.0);
        assert_eq!(bands.width(), 0.0);
        assert_eq!(bands.percent_b(1.0), None);
    }

    #[test]
    fn test_bollinger_short_input_uses_whole_series() {
        let bands = bollinger_bands(&[1.0, 3.0], 20, 2.0);
        assert_eq!(bands.middle, 2.0);
        assert_eq!(bands.std_dev, 1.0);
        assert_eq!(bands.upper, 4.0);
        assert_eq!(bands.lower, 0.0);
    }

    #[test]
    fn test_bollinger_empty() {
        assert_eq!(bollinger_bands(&[], 20, 2.0), BollingerBands::default());
    }
}
