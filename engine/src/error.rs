use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("Invalid price series: {0}")]
    InvalidSeries(String),

    #[error("Unknown indicator type: {0}")]
    UnknownIndicator(String),

    #[error("Indicator parameter error: {0}")]
    IndicatorError(String),

    // CSV read and field errors, already carrying file and line context.
    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::InvalidSeries("series is empty".to_string());
        assert_eq!(err.to_string(), "Invalid price series: series is empty");

        let err = EngineError::UnknownIndicator("vwap".to_string());
        assert_eq!(err.to_string(), "Unknown indicator type: vwap");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: EngineError = io.into();
        assert!(matches!(err, EngineError::IoError { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_from_anyhow_is_transparent() {
        let err: EngineError = anyhow::anyhow!("Missing 'close' field in CSV record at line 3").into();
        assert!(matches!(err, EngineError::AnyhowError(_)));
        assert_eq!(err.to_string(), "Missing 'close' field in CSV record at line 3");
    }
}
