//! Index option contract specifications
//!
//! Contract multiplier (lot size) and listed strike interval per underlying.

use serde::{Deserialize, Serialize};

/// Contract specification for one underlying
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSpec {
    /// Underlying symbol (e.g. "NIFTY")
    pub symbol: String,
    /// Contract multiplier (units of underlying per contract)
    pub contract_size: f64,
    /// Distance between listed strikes
    pub strike_interval: f64,
}

/// Known index underlyings: (symbol, contract size, strike interval)
const KNOWN_SYMBOLS: [(&str, f64, f64); 4] = [
    ("NIFTY", 25.0, 50.0),
    ("BANKNIFTY", 15.0, 100.0),
    ("FINNIFTY", 40.0, 50.0),
    ("MIDCPNIFTY", 75.0, 25.0),
];

/// Symbol used when an unknown underlying is requested
pub const DEFAULT_SYMBOL: &str = "NIFTY";

impl SymbolSpec {
    /// Look up a known underlying (case-insensitive)
    pub fn lookup(symbol: &str) -> Option<Self> {
        let wanted = symbol.trim().to_ascii_uppercase();
        KNOWN_SYMBOLS
            .iter()
            .find(|(name, _, _)| *name == wanted)
            .map(|&(name, contract_size, strike_interval)| Self {
                symbol: name.to_string(),
                contract_size,
                strike_interval,
            })
    }

    /// Look up a symbol, falling back to NIFTY's specification
    ///
    /// The returned spec keeps the requested symbol name.
    pub fn lookup_or_default(symbol: &str) -> Self {
        match Self::lookup(symbol) {
            Some(spec) => spec,
            None => {
                tracing::warn!(
                    "Unknown symbol {}, using {} contract specification",
                    symbol,
                    DEFAULT_SYMBOL
                );
                let mut spec = Self::nifty();
                spec.symbol = symbol.to_string();
                spec
            }
        }
    }

    /// NIFTY 50 index options
    pub fn nifty() -> Self {
        Self {
            symbol: "NIFTY".to_string(),
            contract_size: 25.0,
            strike_interval: 50.0,
        }
    }

    /// All known symbols
    pub fn all() -> Vec<Self> {
        KNOWN_SYMBOLS
            .iter()
            .filter_map(|(name, _, _)| Self::lookup(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known() {
        let bn = SymbolSpec::lookup("banknifty").unwrap();
        assert_eq!(bn.symbol, "BANKNIFTY");
        assert_eq!(bn.contract_size, 15.0);
        assert_eq!(bn.strike_interval, 100.0);
        assert_eq!(SymbolSpec::all().len(), 4);
    }

    #[test]
    fn test_unknown_falls_back_to_nifty() {
        assert!(SymbolSpec::lookup("SENSEX").is_none());
        let spec = SymbolSpec::lookup_or_default("SENSEX");
        assert_eq!(spec.symbol, "SENSEX");
        assert_eq!(spec.contract_size, 25.0);
        assert_eq!(spec.strike_interval, 50.0);
    }
}
