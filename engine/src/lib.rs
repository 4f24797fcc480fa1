// Engine library root
// Technical indicator & recommendation engine: a pure pipeline from an OHLC
// price series to a scored trading recommendation plus an indicator panel.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod models;

pub use analysis::{Analysis, RecommendationEngine};
pub use config::{AnalysisSettings, EngineSettings};
pub use error::EngineError;
pub use models::PriceSeries;
