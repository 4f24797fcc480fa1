// Engine settings: indicator periods, scoring thresholds, risk multipliers and
// the synthetic fallback parameters. Loaded from JSON; every field has a default.
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EngineError, Result};

/// Environment variable consulted when no explicit config path is given.
pub const CONFIG_ENV_VAR: &str = "ENGINE_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub analysis: AnalysisSettings,
    pub synthetic: SyntheticSettings,
    /// Period of the `watch` refresh loop.
    pub refresh_interval_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            analysis: AnalysisSettings::default(),
            synthetic: SyntheticSettings::default(),
            refresh_interval_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
    pub atr_period: usize,
    pub stochastic_period: usize,
    pub trend_fast_period: usize,
    pub trend_slow_period: usize,

    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub rsi_neutral_low: f64,
    pub rsi_neutral_high: f64,
    pub stochastic_oversold: f64,
    pub stochastic_overbought: f64,

    pub stop_loss_atr: f64,
    pub take_profit_atr: f64,
    pub level_buckets: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            atr_period: 14,
            stochastic_period: 14,
            trend_fast_period: 20,
            trend_slow_period: 50,

            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            rsi_neutral_low: 45.0,
            rsi_neutral_high: 55.0,
            stochastic_oversold: 20.0,
            stochastic_overbought: 80.0,

            stop_loss_atr: 2.0,
            take_profit_atr: 1.5,
            level_buckets: 5,
        }
    }
}

impl AnalysisSettings {
    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bollinger_period", self.bollinger_period),
            ("atr_period", self.atr_period),
            ("stochastic_period", self.stochastic_period),
            ("trend_fast_period", self.trend_fast_period),
            ("trend_slow_period", self.trend_slow_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(EngineError::ConfigError(format!("{} must be greater than 0", name)));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(EngineError::ConfigError(format!(
                "macd_fast ({}) must be shorter than macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        if self.rsi_oversold >= self.rsi_overbought {
            return Err(EngineError::ConfigError(
                "rsi_oversold must be below rsi_overbought".to_string(),
            ));
        }
        if self.rsi_neutral_low > self.rsi_neutral_high {
            return Err(EngineError::ConfigError(
                "rsi_neutral_low must not exceed rsi_neutral_high".to_string(),
            ));
        }
        if self.stochastic_oversold >= self.stochastic_overbought {
            return Err(EngineError::ConfigError(
                "stochastic_oversold must be below stochastic_overbought".to_string(),
            ));
        }
        if self.bollinger_std_dev < 0.0 || self.stop_loss_atr < 0.0 || self.take_profit_atr < 0.0 {
            return Err(EngineError::ConfigError(
                "band and risk multipliers must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticSettings {
    pub candles: usize,
    /// Relative size of one close-to-close step.
    pub volatility: f64,
    /// Relative size of the high/low wicks.
    pub wick: f64,
    pub seed: u64,
}

impl Default for SyntheticSettings {
    fn default() -> Self {
        SyntheticSettings {
            candles: 100,
            volatility: 0.0015,
            wick: 0.0005,
            seed: 42,
        }
    }
}

impl EngineSettings {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let settings: EngineSettings = serde_json::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Explicit path first, then `ENGINE_CONFIG`, then defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(env_path) if !env_path.trim().is_empty() => Self::from_file(env_path.trim()),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        if self.synthetic.candles == 0 {
            return Err(EngineError::ConfigError(
                "synthetic.candles must be greater than 0".to_string(),
            ));
        }
        if self.refresh_interval_secs == 0 {
            return Err(EngineError::ConfigError(
                "refresh_interval_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let settings = EngineSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.analysis.rsi_period, 14);
        assert_eq!(settings.analysis.level_buckets, 5);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            EngineSettings::from_json_str(r#"{ "analysis": { "rsi_period": 21 } }"#).unwrap();
        assert_eq!(settings.analysis.rsi_period, 21);
        assert_eq!(settings.analysis.macd_slow, 26);
        assert_eq!(settings.synthetic.candles, 100);
    }

    #[test]
    fn test_zero_period_rejected() {
        let result = EngineSettings::from_json_str(r#"{ "analysis": { "atr_period": 0 } }"#);
        match result {
            Err(EngineError::ConfigError(msg)) => assert!(msg.contains("atr_period")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let raw = r#"{ "analysis": { "rsi_oversold": 80.0, "rsi_overbought": 20.0 } }"#;
        assert!(EngineSettings::from_json_str(raw).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "refresh_interval_secs": 5, "synthetic": {{ "seed": 7 }} }}"#).unwrap();
        let settings = EngineSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.refresh_interval_secs, 5);
        assert_eq!(settings.synthetic.seed, 7);
    }

    #[test]
    fn test_malformed_json() {
        let result = EngineSettings::from_json_str("{ not json");
        assert!(matches!(result, Err(EngineError::JsonError { .. })));
    }
}
