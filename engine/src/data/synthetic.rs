// Seeded random-walk candles, used by callers as a stand-in when no real
// price history is available. The analysis engine never calls this itself.
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shared::models::{Candle, TimeFrame};

use super::rates::{base_price_for, LastKnownRates};
use crate::config::SyntheticSettings;
use crate::error::Result;
use crate::models::PriceSeries;

/// Same seed, same series:
///
/// ```
/// use engine::data::synthetic::SyntheticSeriesGenerator;
/// use shared::models::TimeFrame;
///
/// let a = SyntheticSeriesGenerator::new(7).generate(1.0850, 50, TimeFrame::Hour1, 0);
/// let b = SyntheticSeriesGenerator::new(7).generate(1.0850, 50, TimeFrame::Hour1, 0);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone)]
pub struct SyntheticSeriesGenerator {
    rng: ChaCha8Rng,
    volatility: f64,
    wick: f64,
}

impl SyntheticSeriesGenerator {
    pub fn new(seed: u64) -> Self {
        Self::from_settings(&SyntheticSettings {
            seed,
            ..SyntheticSettings::default()
        })
    }

    pub fn from_settings(settings: &SyntheticSettings) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(settings.seed),
            volatility: settings.volatility.abs(),
            wick: settings.wick.abs(),
        }
    }

    /// `count` candles starting at `base_price`, spaced by the timeframe.
    ///
    /// Each close moves by `(u - 0.5) * price * volatility`; the high and low
    /// extend past open/close by `u * price * wick`, so every candle keeps
    /// `low <= min(open, close)` and `high >= max(open, close)`.
    pub fn generate(&mut self, base_price: f64, count: usize, timeframe: TimeFrame, start_time: i64) -> Vec<Candle> {
        let step = timeframe.seconds();
        let mut price = base_price;
        let mut candles = Vec::with_capacity(count);

        for i in 0..count {
            let open = price;
            let change = (self.rng.gen::<f64>() - 0.5) * price * self.volatility;
            let close = price + change;
            let high = open.max(close) + self.rng.gen::<f64>() * price * self.wick;
            let low = open.min(close) - self.rng.gen::<f64>() * price * self.wick;
            candles.push(Candle::new(start_time + step * i as i64, open, high, low, close));
            price = close;
        }
        candles
    }

    /// Fallback series for `pair`, anchored on the caller's last known rates.
    pub fn fallback_series(
        &mut self,
        pair: &str,
        rates: Option<&LastKnownRates>,
        count: usize,
        timeframe: TimeFrame,
        start_time: i64,
    ) -> Result<PriceSeries> {
        let base_price = base_price_for(pair, rates);
        tracing::warn!(
            pair = %pair,
            timeframe = %timeframe,
            base_price,
            candles = count,
            "Using synthetic price series"
        );
        PriceSeries::new(self.generate(base_price, count, timeframe, start_time))
    }
}
