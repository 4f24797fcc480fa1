// Analysis layer: trend classification, range levels, the recommendation
// scorer, and the bundle a dashboard panel renders from one call.
pub mod levels;
pub mod overview;
pub mod recommendation;
pub mod snapshot;
pub mod trend;

pub use levels::{find_levels, DEFAULT_BUCKETS};
pub use overview::{multi_timeframe_overview, timeframe_overview, Direction, TimeframeOverview};
pub use recommendation::{recommend, Readings, RecommendationEngine, RiskLevels};
pub use snapshot::{MarketSnapshot, VolatilityLevel};
pub use trend::{classify_trend, trend_score};

use serde::Serialize;
use shared::models::{IndicatorReading, Recommendation, SupportResistanceLevels, Trend};

use crate::models::PriceSeries;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub recommendation: Recommendation,
    pub indicators: Vec<IndicatorReading>,
    pub levels: SupportResistanceLevels,
    pub trend: Trend,
    pub snapshot: MarketSnapshot,
}

impl RecommendationEngine {
    /// Recommendation, indicator panel, levels and snapshot for one
    /// (pair, timeframe) request.
    pub fn analyze(&self, pair: &str, series: &PriceSeries, timeframe: &str) -> Analysis {
        let candles = series.candles();
        let readings = self.readings(candles);
        let settings = self.settings();

        Analysis {
            recommendation: self.recommend_from(pair, &readings, timeframe),
            indicators: self.indicator_readings(pair, &readings),
            levels: find_levels(candles, settings.level_buckets),
            trend: readings.trend,
            snapshot: MarketSnapshot::compute(candles, settings.atr_period),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Action;

    #[test]
    fn test_analyze_bundle() {
        let closes: Vec<f64> = (0..60).map(|i| 1.00 + 0.1 * i as f64 / 59.0).collect();
        let series = PriceSeries::from_closes(&closes, 1_700_000_000, 3600).unwrap();
        let analysis = RecommendationEngine::default().analyze("EUR/USD", &series, "1H");

        assert_eq!(analysis.trend, Trend::Bullish);
        assert_eq!(analysis.recommendation.action, Action::Buy);
        assert_eq!(analysis.indicators.len(), 4);
        assert_eq!(analysis.levels.support.len(), DEFAULT_BUCKETS - 1);
        assert_eq!(analysis.snapshot.price, *closes.last().unwrap());
    }
}
