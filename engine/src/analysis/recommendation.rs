// Weighted signal scorer: turns the latest indicator readings into a
// BUY/SELL/NEUTRAL call with entry, stop and target levels.
use serde::Serialize;
use shared::models::{Action, Candle, IndicatorReading, Recommendation, Signal, Trend};
use shared::utils::forex_format;
use std::cmp::Ordering;

use super::trend::{classify_trend, compare_prices};
use crate::config::AnalysisSettings;
use crate::indicators::{atr, bollinger_bands, macd, rsi, stochastic, BollingerBands, Macd};

/// Score at or beyond which a call is reported as strong.
pub const STRONG_SCORE: i32 = 4;
pub const MAX_CONFIDENCE: i32 = 95;

/// Latest value of every indicator the scorer looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Readings {
    pub price: f64,
    /// Every close in the series is the same price (or there are none).
    pub flat_closes: bool,
    pub rsi: f64,
    pub macd: Macd,
    pub bollinger: BollingerBands,
    pub stochastic_k: f64,
    pub atr: f64,
    pub trend: Trend,
}

impl Readings {
    /// Computes every reading independently. Never fails: short or empty
    /// inputs fall back to each indicator's neutral default.
    pub fn compute(candles: &[Candle], settings: &AnalysisSettings) -> Self {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let flat_closes = closes.windows(2).all(|w| w[0] == w[1]);
        Readings {
            price: closes.last().copied().unwrap_or(0.0),
            flat_closes,
            rsi: rsi(&closes, settings.rsi_period),
            macd: macd(&closes, settings.macd_fast, settings.macd_slow, settings.macd_signal),
            bollinger: bollinger_bands(&closes, settings.bollinger_period, settings.bollinger_std_dev),
            stochastic_k: stochastic(candles, settings.stochastic_period).k,
            atr: atr(candles, settings.atr_period),
            trend: classify_trend(&closes, settings.trend_fast_period, settings.trend_slow_period),
        }
    }
}

/// Evaluates every rule independently and collects the matching reasons in order.
pub fn score_readings(readings: &Readings, settings: &AnalysisSettings) -> (i32, Vec<String>) {
    let mut score = 0;
    let mut reasons = Vec::new();
    let mut apply = |condition: bool, delta: i32, reason: &str| {
        if condition {
            score += delta;
            reasons.push(reason.to_string());
        }
    };

    let r = readings;
    apply(r.rsi < settings.rsi_oversold, 2, "RSI in oversold territory");
    apply(r.rsi > settings.rsi_overbought, -2, "RSI in overbought territory");
    apply(
        r.rsi >= settings.rsi_neutral_low && r.rsi <= settings.rsi_neutral_high,
        1,
        "RSI in neutral zone",
    );
    apply(r.macd.is_bullish(), 2, "MACD bullish signal");
    apply(r.macd.is_bearish(), -2, "MACD bearish signal");
    apply(
        compare_prices(r.price, r.bollinger.lower) == Ordering::Less,
        2,
        "Price near lower Bollinger Band",
    );
    apply(
        compare_prices(r.price, r.bollinger.upper) == Ordering::Greater,
        -2,
        "Price near upper Bollinger Band",
    );
    apply(r.trend == Trend::Bullish, 3, "Strong bullish trend");
    apply(r.trend == Trend::Bearish, -3, "Strong bearish trend");
    apply(r.stochastic_k < settings.stochastic_oversold, 1, "Stochastic oversold");
    apply(r.stochastic_k > settings.stochastic_overbought, -1, "Stochastic overbought");

    (score, reasons)
}

/// Maps a score to an action and whether the call is strong (|score| >= 4).
pub fn action_for_score(score: i32) -> (Action, bool) {
    match score {
        s if s >= STRONG_SCORE => (Action::Buy, true),
        s if s <= -STRONG_SCORE => (Action::Sell, true),
        s if s >= 1 => (Action::Buy, false),
        s if s <= -1 => (Action::Sell, false),
        _ => (Action::Neutral, false),
    }
}

/// `min(|score| * 15 + 50, 95)`
pub fn confidence_for_score(score: i32) -> u8 {
    let confidence = (score.saturating_abs().saturating_mul(15).saturating_add(50)).min(MAX_CONFIDENCE);
    // Bounded to 50..=95 above.
    confidence as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskLevels {
    pub stop_loss: f64,
    pub take_profit: f64,
    pub risk_reward_ratio: f64,
}

/// Stop and target placed in ATR multiples on the side of the trade; SELL
/// mirrors them above/below entry, BUY and NEUTRAL use the long side.
/// A zero ATR collapses both onto entry and the ratio is defined as 0.
pub fn risk_levels(action: Action, entry: f64, atr: f64, settings: &AnalysisSettings) -> RiskLevels {
    let stop_distance = settings.stop_loss_atr * atr;
    let target_distance = settings.take_profit_atr * atr;
    let (stop_loss, take_profit) = match action {
        Action::Sell => (entry + stop_distance, entry - target_distance),
        Action::Buy | Action::Neutral => (entry - stop_distance, entry + target_distance),
    };

    let risk = (entry - stop_loss).abs();
    let reward = (entry - take_profit).abs();
    let risk_reward_ratio = if risk > 0.0 {
        (reward / risk * 10.0).round() / 10.0
    } else {
        0.0
    };
    RiskLevels {
        stop_loss,
        take_profit,
        risk_reward_ratio,
    }
}

/// Stateless scorer parameterised by [`AnalysisSettings`].
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    settings: AnalysisSettings,
}

impl RecommendationEngine {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn readings(&self, candles: &[Candle]) -> Readings {
        Readings::compute(candles, &self.settings)
    }

    pub fn recommend(&self, pair: &str, candles: &[Candle], timeframe: &str) -> Recommendation {
        let readings = self.readings(candles);
        self.recommend_from(pair, &readings, timeframe)
    }

    pub fn recommend_from(&self, pair: &str, readings: &Readings, timeframe: &str) -> Recommendation {
        let (score, reasons) = score_readings(readings, &self.settings);

        // A price that never moved carries no direction, whatever the
        // neutral-zone RSI adds to the score.
        let flat = readings.flat_closes;
        let (action, strong, confidence) = if flat {
            (Action::Neutral, false, confidence_for_score(0))
        } else {
            let (action, strong) = action_for_score(score);
            (action, strong, confidence_for_score(score))
        };

        let entry = readings.price;
        let levels = risk_levels(action, entry, readings.atr.max(0.0), &self.settings);
        let summary = summarize(pair, timeframe, action, strong, flat, score, confidence, entry);

        tracing::debug!(
            pair = %pair,
            timeframe = %timeframe,
            score,
            action = %action,
            confidence,
            reasons = reasons.len(),
            "Computed recommendation"
        );

        Recommendation {
            pair: pair.to_string(),
            timeframe: timeframe.to_string(),
            action,
            confidence,
            score,
            entry_price: entry,
            stop_loss: levels.stop_loss,
            take_profit: levels.take_profit,
            risk_reward_ratio: levels.risk_reward_ratio,
            summary,
            reasons,
        }
    }

    /// Display rows for RSI, MACD, Bollinger Bands and Stochastic.
    pub fn indicator_readings(&self, pair: &str, readings: &Readings) -> Vec<IndicatorReading> {
        let s = &self.settings;
        let r = readings;
        let mut rows = Vec::with_capacity(4);

        let (signal, description) = if r.rsi < s.rsi_oversold {
            (Signal::Bullish, "Oversold")
        } else if r.rsi > s.rsi_overbought {
            (Signal::Bearish, "Overbought")
        } else {
            (Signal::Neutral, "Neutral")
        };
        rows.push(IndicatorReading {
            name: format!("RSI ({})", s.rsi_period),
            value: format!("{:.1}", r.rsi),
            signal,
            description: description.to_string(),
        });

        let (signal, description) = if r.macd.is_bullish() {
            (Signal::Bullish, "MACD above signal line")
        } else if r.macd.is_bearish() {
            (Signal::Bearish, "MACD below signal line")
        } else {
            (Signal::Neutral, "No momentum divergence")
        };
        rows.push(IndicatorReading {
            name: format!("MACD ({},{},{})", s.macd_fast, s.macd_slow, s.macd_signal),
            value: format!("{:.6}", r.macd.histogram),
            signal,
            description: description.to_string(),
        });

        let (signal, description) = match (
            compare_prices(r.price, r.bollinger.lower),
            compare_prices(r.price, r.bollinger.upper),
        ) {
            (Ordering::Less, _) => (Signal::Bullish, "Price below lower band"),
            (_, Ordering::Greater) => (Signal::Bearish, "Price above upper band"),
            _ => (Signal::Neutral, "Price inside the bands"),
        };
        rows.push(IndicatorReading {
            name: format!("Bollinger ({}, {})", s.bollinger_period, s.bollinger_std_dev),
            value: format!(
                "{} / {}",
                forex_format::format_price(pair, r.bollinger.upper),
                forex_format::format_price(pair, r.bollinger.lower)
            ),
            signal,
            description: description.to_string(),
        });

        let (signal, description) = if r.stochastic_k < s.stochastic_oversold {
            (Signal::Bullish, "Oversold")
        } else if r.stochastic_k > s.stochastic_overbought {
            (Signal::Bearish, "Overbought")
        } else {
            (Signal::Neutral, "Neutral")
        };
        rows.push(IndicatorReading {
            name: format!("Stochastic ({})", s.stochastic_period),
            value: format!("{:.1}", r.stochastic_k),
            signal,
            description: description.to_string(),
        });

        rows
    }
}

#[allow(clippy::too_many_arguments)]
fn summarize(
    pair: &str,
    timeframe: &str,
    action: Action,
    strong: bool,
    flat: bool,
    score: i32,
    confidence: u8,
    entry: f64,
) -> String {
    let entry = forex_format::format_price(pair, entry);
    match action {
        Action::Neutral if flat => format!(
            "NEUTRAL on {} ({}): price is not moving, no stop or target range at {}",
            pair, timeframe, entry
        ),
        Action::Neutral => format!(
            "NEUTRAL on {} ({}): mixed signals (score {:+}) around {}",
            pair, timeframe, score, entry
        ),
        _ => format!(
            "{} {} on {} ({}) at {}: score {:+}, {}% confidence",
            if strong { "Strong" } else { "Mild" },
            action,
            pair,
            timeframe,
            entry,
            score,
            confidence
        ),
    }
}

/// `recommend` with default settings.
pub fn recommend(pair: &str, candles: &[Candle], timeframe: &str) -> Recommendation {
    RecommendationEngine::default().recommend(pair, candles, timeframe)
}
