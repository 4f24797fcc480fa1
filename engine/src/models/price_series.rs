// Validated, ordered OHLC history handed to the analysis engine.
use serde::Serialize;
use shared::models::Candle;

use crate::error::{EngineError, Result};

/// Ordered candles with at least one element, strictly increasing `time`,
/// and every candle satisfying `low <= min(open, close) <= max(open, close) <= high`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    candles: Vec<Candle>,
}

impl PriceSeries {
    pub fn new(candles: Vec<Candle>) -> Result<Self> {
        if candles.is_empty() {
            return Err(EngineError::InvalidSeries("series is empty".to_string()));
        }
        if let Some((idx, candle)) = candles
            .iter()
            .enumerate()
            .find(|(_, c)| !c.is_well_formed())
        {
            return Err(EngineError::InvalidSeries(format!(
                "candle {} at time {} violates the OHLC invariant",
                idx, candle.time
            )));
        }
        if let Some(idx) = candles.windows(2).position(|w| w[1].time <= w[0].time) {
            return Err(EngineError::InvalidSeries(format!(
                "time must be strictly increasing (candle {} at {} follows {})",
                idx + 1,
                candles[idx + 1].time,
                candles[idx].time
            )));
        }
        Ok(Self { candles })
    }

    /// Builds candles from a closes-only history: each open is the previous close
    /// and the high/low span open and close.
    pub fn from_closes(closes: &[f64], start_time: i64, step_secs: i64) -> Result<Self> {
        if step_secs <= 0 {
            return Err(EngineError::InvalidSeries(format!(
                "step must be positive, got {}",
                step_secs
            )));
        }
        let mut candles = Vec::with_capacity(closes.len());
        let mut previous: Option<f64> = None;
        for (i, &close) in closes.iter().enumerate() {
            let open = previous.unwrap_or(close);
            candles.push(Candle::new(
                start_time + step_secs * i as i64,
                open,
                open.max(close),
                open.min(close),
                close,
            ));
            previous = Some(close);
        }
        Self::new(candles)
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn last(&self) -> &Candle {
        // Non-empty by construction.
        &self.candles[self.candles.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

}
