use shared::models::{Candle, SupportResistanceLevels};

pub const DEFAULT_BUCKETS: usize = 5;

/// Uniform partition of the observed close range into `bucket_count` steps.
///
/// Support is `min + step * i` and resistance `max - step * i` for
/// `i = 1..bucket_count`. These are not pivot or volume levels. Fewer than two
/// buckets, or no candles, gives empty levels.
pub fn find_levels(candles: &[Candle], bucket_count: usize) -> SupportResistanceLevels {
    if candles.is_empty() || bucket_count < 2 {
        return SupportResistanceLevels::default();
    }
    let min = candles.iter().map(|c| c.close).fold(f64::INFINITY, f64::min);
    let max = candles.iter().map(|c| c.close).fold(f64::NEG_INFINITY, f64::max);
    let step = (max - min) / bucket_count as f64;

    SupportResistanceLevels {
        support: (1..bucket_count).map(|i| min + step * i as f64).collect(),
        resistance: (1..bucket_count).map(|i| max - step * i as f64).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles(closes: &[f64]) -> Vec<Candle> {
        closes.iter().enumerate().map(|(i, &c)| Candle::flat(i as i64, c)).collect()
    }

    #[test]
    fn test_levels_partition_range() {
        let levels = find_levels(&candles(&[1.00, 1.10, 1.05]), DEFAULT_BUCKETS);
        let expected_support = [1.02, 1.04, 1.06, 1.08];
        let expected_resistance = [1.08, 1.06, 1.04, 1.02];
        assert_eq!(levels.support.len(), 4);
        assert_eq!(levels.resistance.len(), 4);
        for (got, want) in levels.support.iter().zip(expected_support) {
            assert!((got - want).abs() < 1e-12, "{} != {}", got, want);
        }
        for (got, want) in levels.resistance.iter().zip(expected_resistance) {
            assert!((got - want).abs() < 1e-12, "{} != {}", got, want);
        }
    }

    #[test]
    fn test_levels_ordering() {
        let levels = find_levels(&candles(&[1.30, 1.25, 1.40, 1.35]), 4);
        assert!(levels.support.windows(2).all(|w| w[0] < w[1]));
        assert!(levels.resistance.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_levels_degenerate() {
        assert_eq!(find_levels(&[], 5), SupportResistanceLevels::default());
        assert_eq!(find_levels(&candles(&[1.0, 2.0]), 1), SupportResistanceLevels::default());
        let flat = find_levels(&candles(&[1.1; 10]), 5);
        assert!(flat.support.iter().all(|&l| l == 1.1));
    }
}
