// Engine-side models. Plain value objects (Candle, Recommendation, ...) live in
// the `shared` crate; this module adds the validated series wrapper.
pub mod price_series;

pub use price_series::PriceSeries;
