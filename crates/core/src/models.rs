use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Market Data
// ---------------------------------------------------------------------------

/// A single token quote as returned by the public price endpoint.
///
/// Only `usd` is guaranteed; the remaining fields are present when the
/// endpoint is queried with the extended parameters and are passed through
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenQuote {
    pub usd: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usd_24h_change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usd_market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usd_24h_vol: Option<f64>,
}

impl TokenQuote {
    /// Quote carrying only a spot USD price.
    pub fn usd(price: f64) -> Self {
        Self {
            usd: price,
            usd_24h_change: None,
            usd_market_cap: None,
            usd_24h_vol: None,
        }
    }
}

/// Quotes keyed by token identifier (e.g. "bitcoin", "ethereum").
///
/// A fresh map is produced per request; entries have no identity beyond the
/// call that returned them.
pub type MarketData = HashMap<String, TokenQuote>;

// ---------------------------------------------------------------------------
// Account Balance
// ---------------------------------------------------------------------------

/// Funds held in a single currency on the private exchange account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyBalance {
    pub available: f64,
    pub locked: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

/// Balances keyed by currency code (e.g. "BTC", "USDT").
pub type AccountBalance = HashMap<String, CurrencyBalance>;
