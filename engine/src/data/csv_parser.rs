use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate};
use csv::{ReaderBuilder, StringRecord};
use shared::models::Candle;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::models::PriceSeries;

// Timestamp formats accepted in the `time` column.
pub mod time_format {
    use super::*;

    /// Integer Unix seconds, RFC 3339, or a plain `YYYY-MM-DD` date (midnight UTC).
    pub fn parse_time(s: &str) -> Result<i64> {
        let s = s.trim();
        if let Ok(seconds) = s.parse::<i64>() {
            return Ok(seconds);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.timestamp());
        }
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| anyhow!("Failed to parse time '{}': {}", s, e))?;
        date.and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .ok_or_else(|| anyhow!("Failed to parse time '{}'", s))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_time_seconds() {
            assert_eq!(parse_time("1700000000").unwrap(), 1_700_000_000);
        }

        #[test]
        fn test_parse_time_rfc3339() {
            assert_eq!(parse_time("2024-01-02T00:00:00Z").unwrap(), 1_704_153_600);
            assert_eq!(parse_time("2024-01-02T01:00:00+01:00").unwrap(), 1_704_153_600);
        }

        #[test]
        fn test_parse_time_date() {
            assert_eq!(parse_time("2024-01-02").unwrap(), 1_704_153_600);
        }

        #[test]
        fn test_parse_time_invalid() {
            assert!(parse_time("02/01/2024").is_err());
            assert!(parse_time("").is_err());
        }
    }
}

pub struct OhlcCsvParser;

impl OhlcCsvParser {
    // CSV Header: time,open,high,low,close (any column order, extra columns ignored)
    // Example Row: 2024-01-02,1.0945,1.0960,1.0921,1.0940
    pub fn load_candles_from_csv(file_path: impl AsRef<Path>) -> Result<Vec<Candle>> {
        let path = file_path.as_ref();
        let file = File::open(path).map_err(|e| anyhow!("Failed to open CSV file '{}': {}", path.display(), e))?;
        Self::read_candles(BufReader::new(file))
    }

    pub fn load_series_from_csv(file_path: impl AsRef<Path>) -> crate::error::Result<PriceSeries> {
        let candles = Self::load_candles_from_csv(file_path)?;
        PriceSeries::new(candles)
    }

    pub fn read_candles<R: Read>(reader: R) -> Result<Vec<Candle>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut candles = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result.map_err(|e| anyhow!("Error reading CSV record at line {}: {}", line, e))?;

            let time_str = Self::require_field(&record, &headers, "time", line)?;
            let time = time_format::parse_time(time_str)
                .map_err(|e| anyhow!("Error parsing 'time' at line {}: {}", line, e))?;

            let open = Self::parse_price(&record, &headers, "open", line)?;
            let high = Self::parse_price(&record, &headers, "high", line)?;
            let low = Self::parse_price(&record, &headers, "low", line)?;
            let close = Self::parse_price(&record, &headers, "close", line)?;

            candles.push(Candle::new(time, open, high, low, close));
        }
        tracing::debug!(candles = candles.len(), "Parsed OHLC CSV");
        Ok(candles)
    }

    fn parse_price(record: &StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<f64> {
        let raw = Self::require_field(record, headers, name, line)?;
        let value = raw
            .parse::<f64>()
            .map_err(|e| anyhow!("Error parsing '{}' at line {}: {}", name, line, e))?;
        if !value.is_finite() {
            return Err(anyhow!("Error parsing '{}' at line {}: value is not finite", name, line));
        }
        Ok(value)
    }

    fn require_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<&'a str> {
        Self::get_field(record, headers, name)
            .ok_or_else(|| anyhow!("Missing '{}' field in CSV record at line {}", name, line))
    }

    // Looks a field up by header name (case-insensitive) so column order does not matter.
    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .and_then(|pos| record.get(pos))
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_candles_from_csv_valid_data() {
        let csv_content = "\
time,open,high,low,close
2024-01-02,1.0945,1.0960,1.0921,1.0940
1704240000,1.0940,1.0952,1.0930,1.0950";
        let tmp_file = create_test_csv(csv_content);
        let candles = OhlcCsvParser::load_candles_from_csv(tmp_file.path()).unwrap();

        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0], Candle::new(1_704_153_600, 1.0945, 1.0960, 1.0921, 1.0940));
        assert_eq!(candles[1].time, 1_704_240_000);
        assert_eq!(candles[1].close, 1.0950);
    }

    #[test]
    fn test_columns_in_any_order() {
        let csv_content = "\
Close, Low, High, Open, Time, Volume
1.0940, 1.0921, 1.0960, 1.0945, 100, 5000";
        let candles = OhlcCsvParser::read_candles(csv_content.as_bytes()).unwrap();
        assert_eq!(candles, vec![Candle::new(100, 1.0945, 1.0960, 1.0921, 1.0940)]);
    }

    #[test]
    fn test_load_candles_from_csv_empty_file() {
        let tmp_file = create_test_csv("time,open,high,low,close"); // Only header
        let candles = OhlcCsvParser::load_candles_from_csv(tmp_file.path()).unwrap();
        assert!(candles.is_empty());
        // ...which is not a usable series
        assert!(OhlcCsvParser::load_series_from_csv(tmp_file.path()).is_err());
    }

    #[test]
    fn test_load_candles_from_csv_missing_field() {
        let csv_content = "\
time,open,high,low
1,1.0,1.0,1.0";
        let result = OhlcCsvParser::read_candles(csv_content.as_bytes());
        assert!(result.unwrap_err().to_string().contains("Missing 'close' field"));
    }

    #[test]
    fn test_load_candles_from_csv_invalid_data_format() {
        let csv_content = "\
time,open,high,low,close
1,1.0,1.0,1.0,1.0
2,invalid,1.0,1.0,1.0";
        let err = OhlcCsvParser::read_candles(csv_content.as_bytes()).unwrap_err().to_string();
        assert!(err.contains("Error parsing 'open' at line 3"), "{}", err);
    }

    #[test]
    fn test_load_series_validates_order() {
        let csv_content = "\
time,open,high,low,close
2,1.0,1.0,1.0,1.0
1,1.0,1.0,1.0,1.0";
        let tmp_file = create_test_csv(csv_content);
        let err = OhlcCsvParser::load_series_from_csv(tmp_file.path()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSeries(_)));
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn test_load_series_read_error_keeps_line_context() {
        let csv_content = "\
time,open,high,low,close
1,1.0,1.0,1.0,1.0
2,1.0,oops,1.0,1.0";
        let tmp_file = create_test_csv(csv_content);
        let err = OhlcCsvParser::load_series_from_csv(tmp_file.path()).unwrap_err();
        assert!(matches!(err, EngineError::AnyhowError(_)));
        assert!(err.to_string().contains("Error parsing 'high' at line 3"), "{}", err);
    }

    #[test]
    fn test_missing_file() {
        let err = OhlcCsvParser::load_candles_from_csv("/nonexistent/prices.csv").unwrap_err();
        assert!(err.to_string().contains("Failed to open CSV file"));
    }
}
