use serde::Serialize;
use shared::models::{TimeFrame, Trend};
use std::cmp::Ordering;

use super::trend::{classify_trend, compare_prices};
use crate::config::AnalysisSettings;
use crate::indicators::{last_sma, rsi};
use crate::models::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    /// Price on its fast SMA, or too little data for one.
    Flat,
}

/// One tile of the all-timeframes summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeframeOverview {
    pub timeframe: TimeFrame,
    pub label: String,
    pub direction: Direction,
    pub rsi: f64,
    pub trend: Trend,
}

pub fn timeframe_overview(
    timeframe: TimeFrame,
    series: &PriceSeries,
    settings: &AnalysisSettings,
) -> TimeframeOverview {
    let closes = series.closes();
    let price = series.last().close;
    let direction = match last_sma(&closes, settings.trend_fast_period) {
        Some(average) => match compare_prices(price, average) {
            Ordering::Greater => Direction::Up,
            Ordering::Less => Direction::Down,
            Ordering::Equal => Direction::Flat,
        },
        None => Direction::Flat,
    };

    TimeframeOverview {
        timeframe,
        label: timeframe.label().to_string(),
        direction,
        rsi: rsi(&closes, settings.rsi_period),
        trend: classify_trend(&closes, settings.trend_fast_period, settings.trend_slow_period),
    }
}

/// Summaries in the order given.
pub fn multi_timeframe_overview(
    entries: &[(TimeFrame, PriceSeries)],
    settings: &AnalysisSettings,
) -> Vec<TimeframeOverview> {
    entries
        .iter()
        .map(|(timeframe, series)| timeframe_overview(*timeframe, series, settings))
        .collect()
}
