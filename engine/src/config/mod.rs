pub mod settings;

pub use settings::{AnalysisSettings, EngineSettings, SyntheticSettings};
