// Price sources consumed by callers of the engine: CSV files, and the seeded
// synthetic fallback with its last-known-rates anchor.
pub mod csv_parser;
pub mod rates;
pub mod synthetic;

pub use csv_parser::OhlcCsvParser;
pub use rates::{base_price_for, LastKnownRates};
pub use synthetic::SyntheticSeriesGenerator;
