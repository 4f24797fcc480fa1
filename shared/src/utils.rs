// Quote formatting helpers shared by the engine and any dashboard front-end.

/// Pairs quoted in yen move in hundredths; everything else in ten-thousandths.
pub mod forex_format {
    pub fn is_jpy_pair(pair: &str) -> bool {
        pair.to_ascii_uppercase().contains("JPY")
    }

    pub fn pip_size(pair: &str) -> f64 {
        if is_jpy_pair(pair) {
            0.01
        } else {
            0.0001
        }
    }

    /// Decimal places shown for a quote: pip precision plus one fractional digit.
    pub fn price_decimals(pair: &str) -> usize {
        if is_jpy_pair(pair) {
            3
        } else {
            5
        }
    }

    pub fn format_price(pair: &str, value: f64) -> String {
        format!("{:.decimals$}", value, decimals = price_decimals(pair))
    }

    pub fn to_pips(pair: &str, delta: f64) -> f64 {
        delta / pip_size(pair)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_pip_size() {
            assert_eq!(pip_size("EUR/USD"), 0.0001);
            assert_eq!(pip_size("usd/jpy"), 0.01);
        }

        #[test]
        fn test_format_price() {
            assert_eq!(format_price("EUR/USD", 1.08504), "1.08504");
            assert_eq!(format_price("USD/JPY", 150.1234), "150.123");
        }

        #[test]
        fn test_to_pips() {
            assert!((to_pips("EUR/USD", 0.0025) - 25.0).abs() < 1e-9);
            assert!((to_pips("EUR/JPY", 0.5) - 50.0).abs() < 1e-9);
        }
    }
}
