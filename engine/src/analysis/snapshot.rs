use serde::Serialize;
use shared::models::Candle;

use crate::indicators::{atr, ema, last_sma};

/// Candles covered by the session high/low.
pub const SESSION_CANDLES: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VolatilityLevel {
    Low,
    Medium,
    High,
}

impl VolatilityLevel {
    /// Below 0.5% of price is low, below 1% medium.
    pub fn from_percent(percent: f64) -> Self {
        if percent < 0.5 {
            VolatilityLevel::Low
        } else if percent < 1.0 {
            VolatilityLevel::Medium
        } else {
            VolatilityLevel::High
        }
    }
}

/// Moving averages, volatility and range figures for the quick-stats panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub price: f64,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub ema12: Option<f64>,
    pub ema26: Option<f64>,
    pub atr: f64,
    pub volatility_percent: f64,
    pub volatility: VolatilityLevel,
    pub session_high: f64,
    pub session_low: f64,
    pub session_range: f64,
    pub change: f64,
    pub change_percent: f64,
}

impl MarketSnapshot {
    pub fn compute(candles: &[Candle], atr_period: usize) -> Self {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let price = closes.last().copied().unwrap_or(0.0);
        let first = closes.first().copied().unwrap_or(0.0);

        let current_atr = atr(candles, atr_period);
        let volatility_percent = if price != 0.0 { current_atr / price * 100.0 } else { 0.0 };

        let session = &candles[candles.len().saturating_sub(SESSION_CANDLES)..];
        let (session_high, session_low) = if session.is_empty() {
            (0.0, 0.0)
        } else {
            (
                session.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max),
                session.iter().map(|c| c.low).fold(f64::INFINITY, f64::min),
            )
        };

        let change = price - first;
        let change_percent = if first != 0.0 { change / first * 100.0 } else { 0.0 };

        MarketSnapshot {
            price,
            sma20: last_sma(&closes, 20),
            sma50: last_sma(&closes, 50),
            sma200: last_sma(&closes, 200),
            ema12: ema(&closes, 12).last().copied(),
            ema26: ema(&closes, 26).last().copied(),
            atr: current_atr,
            volatility_percent,
            volatility: VolatilityLevel::from_percent(volatility_percent),
            session_high,
            session_low,
            session_range: session_high - session_low,
            change,
            change_percent,
        }
    }
}
