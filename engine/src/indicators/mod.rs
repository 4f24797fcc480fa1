// Technical indicators module
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use atr::{atr, true_ranges, Atr};
pub use bollinger::{bollinger_bands, BollingerBands};
pub use ema::{ema, Ema};
pub use macd::{macd, Macd};
pub use rsi::{rsi, Rsi, NEUTRAL_RSI};
pub use sma::{last_sma, sma, Sma};
pub use stochastic::{stochastic, Stochastic, NEUTRAL_STOCHASTIC};

use crate::error::EngineError;
use shared::models::Candle;
use serde_json::Value;

// Common trait for the single-series indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, data: &[Candle]) -> Vec<f64>; // Values aligned to the tail of `data`; shorter than the input when the lookback needs it
}

/// Builds a calculator from its kind ("sma", "ema", "rsi", "atr") and JSON
/// parameters such as `{"period": 20}`.
pub fn build_calculator(kind: &str, params: &Value) -> Result<Box<dyn IndicatorCalculator>, EngineError> {
    let kind = kind.trim().to_lowercase();
    let default_period = match kind.as_str() {
        "sma" | "ema" => 20,
        "rsi" | "atr" => 14,
        _ => return Err(EngineError::UnknownIndicator(kind)),
    };

    let period = match params.get("period") {
        None | Some(Value::Null) => default_period,
        Some(v) => v
            .as_u64()
            .and_then(|p| usize::try_from(p).ok())
            .ok_or_else(|| EngineError::IndicatorError(format!("Invalid period for {}: {}", kind, v)))?,
    };
    if period == 0 {
        return Err(EngineError::IndicatorError("Indicator period cannot be 0".to_string()));
    }

    let calculator: Box<dyn IndicatorCalculator> = match kind.as_str() {
        "sma" => Box::new(Sma::new(period)),
        "ema" => Box::new(Ema::new(period)),
        "rsi" => Box::new(Rsi::new(period)),
        _ => Box::new(Atr::new(period)),
    };
    tracing::debug!(indicator = %calculator.name(), "Built indicator calculator");
    Ok(calculator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_calculator_defaults() {
        assert_eq!(build_calculator("sma", &json!({})).unwrap().name(), "SMA(20)");
        assert_eq!(build_calculator("RSI", &Value::Null).unwrap().name(), "RSI(14)");
        assert_eq!(build_calculator("atr", &json!({ "period": null })).unwrap().name(), "ATR(14)");
    }

    #[test]
    fn test_build_calculator_with_period() {
        let calculator = build_calculator("ema", &json!({ "period": 9 })).unwrap();
        assert_eq!(calculator.name(), "EMA(9)");
        assert_eq!(calculator.parameters(), json!({ "period": 9 }));
    }

    #[test]
    fn test_build_calculator_errors() {
        assert!(matches!(
            build_calculator("vwap", &json!({})),
            Err(EngineError::UnknownIndicator(_))
        ));
        assert!(matches!(
            build_calculator("sma", &json!({ "period": 0 })),
            Err(EngineError::IndicatorError(_))
        ));
        assert!(matches!(
            build_calculator("sma", &json!({ "period": "ten" })),
            Err(EngineError::IndicatorError(_))
        ));
    }
}
