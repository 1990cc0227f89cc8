//! Asset class detection from the symbol alone.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Base currencies recognized as crypto.
pub const CRYPTO_BASES: [&str; 19] = [
    "BTC", "ETH", "XRP", "SOL", "ADA", "DOT", "DOGE", "AVAX", "MATIC", "LINK", "UNI", "LTC", "BCH",
    "XLM", "ALGO", "ATOM", "FTM", "NEAR", "XTZ",
];

/// Asset class of a traded symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    /// Crypto pair such as `BTCUSD` or `ETH-USD`.
    Crypto,
    /// Stock or ETF. The fallback class.
    Equity,
    /// Currency pair such as `EURUSD` or `EUR/USD`.
    Forex,
}

impl AssetClass {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Crypto => "crypto",
            Self::Equity => "equity",
            Self::Forex => "forex",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[allow(clippy::expect_used)] // Patterns are compile-time constants
fn crypto_pattern() -> &'static Regex {
    static CRYPTO: OnceLock<Regex> = OnceLock::new();
    CRYPTO.get_or_init(|| {
        Regex::new(r"^([A-Z]{2,5})[-/]?(?:USD|USDT|USDC|EUR|JPY|BTC|ETH)$")
            .expect("crypto regex is valid")
    })
}

#[allow(clippy::expect_used)] // Patterns are compile-time constants
fn forex_pattern() -> &'static Regex {
    static FOREX: OnceLock<Regex> = OnceLock::new();
    FOREX.get_or_init(|| Regex::new(r"^[A-Z]{3}[-/]?[A-Z]{3}$").expect("forex regex is valid"))
}

/// Classify a symbol. Crypto is checked before forex; anything else is equity.
#[must_use]
pub fn classify_asset_class(symbol: &str) -> AssetClass {
    let upper = symbol.to_uppercase();

    let is_crypto = crypto_pattern()
        .captures(&upper)
        .and_then(|caps| caps.get(1))
        .is_some_and(|base| CRYPTO_BASES.contains(&base.as_str()));
    if is_crypto {
        return AssetClass::Crypto;
    }

    if forex_pattern().is_match(&upper) {
        return AssetClass::Forex;
    }

    AssetClass::Equity
}
