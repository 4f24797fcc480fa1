// Last successfully fetched spot rates, passed explicitly to the fallback
// series constructor instead of living in a process-wide cache.
use serde::{Deserialize, Serialize};
use shared::utils::forex_format;
use std::collections::HashMap;

/// Fallback anchor for JPY-quoted pairs when no rate is known.
pub const DEFAULT_JPY_PRICE: f64 = 150.0;
/// Fallback anchor for every other pair.
pub const DEFAULT_PRICE: f64 = 1.0850;

/// Currency code -> units per one unit of a common base currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LastKnownRates {
    rates: HashMap<String, f64>,
}

impl LastKnownRates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in table (EUR base) used when the rate provider has never answered.
    pub fn sample() -> Self {
        [
            ("EUR", 1.0),
            ("USD", 1.085),
            ("GBP", 0.865),
            ("JPY", 163.5),
            ("CHF", 0.912),
            ("AUD", 1.655),
            ("CAD", 1.475),
            ("NZD", 1.785),
        ]
        .into_iter()
        .collect()
    }

    pub fn insert(&mut self, currency: &str, rate: f64) {
        if rate.is_finite() && rate > 0.0 {
            self.rates.insert(currency.trim().to_ascii_uppercase(), rate);
        }
    }

    pub fn get(&self, currency: &str) -> Option<f64> {
        self.rates.get(&currency.trim().to_ascii_uppercase()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Price of one `base` in `quote` units, when both legs are known.
    pub fn cross_rate(&self, base: &str, quote: &str) -> Option<f64> {
        let base_rate = self.get(base)?;
        let quote_rate = self.get(quote)?;
        Some(quote_rate / base_rate)
    }
}

impl<'a> FromIterator<(&'a str, f64)> for LastKnownRates {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut rates = LastKnownRates::new();
        for (currency, rate) in iter {
            rates.insert(currency, rate);
        }
        rates
    }
}

/// Splits "EUR/USD", "EURUSD" or "eur-usd" into ("EUR", "USD").
pub fn split_pair(pair: &str) -> Option<(String, String)> {
    let cleaned: String = pair
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if cleaned.len() != 6 {
        return None;
    }
    Some((cleaned[..3].to_string(), cleaned[3..].to_string()))
}

/// Anchor price for a synthetic series: the cross rate from `rates` when both
/// currencies are known, otherwise a fixed default by quote convention.
pub fn base_price_for(pair: &str, rates: Option<&LastKnownRates>) -> f64 {
    let known = rates.and_then(|rates| {
        let (base, quote) = split_pair(pair)?;
        rates.cross_rate(&base, &quote)
    });
    match known {
        Some(price) => price,
        None if forex_format::is_jpy_pair(pair) => DEFAULT_JPY_PRICE,
        None => DEFAULT_PRICE,
    }
}
