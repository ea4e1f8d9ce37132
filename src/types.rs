//! Types for the crypto price checker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ticker the registry can resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    /// Uppercase base ticker, e.g. `BTC`
    pub user_symbol: String,

    /// Provider identifier, e.g. `bitcoin`
    pub provider_id: String,
}

impl SymbolEntry {
    /// Create a new entry
    pub fn new(user_symbol: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            user_symbol: user_symbol.into(),
            provider_id: provider_id.into(),
        }
    }
}

/// One row of the provider's symbol listing, e.g. `BTC-USD` -> `bitcoin`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedPair {
    /// Trading pair as `BASE-QUOTE`
    pub pair: String,

    /// Provider identifier of the base asset
    pub provider_id: String,
}

impl ListedPair {
    /// Create a new listed pair
    pub fn new(pair: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            provider_id: provider_id.into(),
        }
    }
}

/// Provider-neutral market data for one asset, as returned by a fetch
///
/// Every market field is optional: providers omit them freely and the
/// normalizer decides which absences are fatal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawQuote {
    /// Identifier the quote was fetched for
    pub provider_id: String,

    /// Ticker echoed back by the provider
    pub symbol: Option<String>,

    /// Current price in USD
    pub price: Option<f64>,

    /// Price 24 hours ago in USD, when the provider reports it directly
    pub price_24h_ago: Option<f64>,

    /// 24h price change percentage
    pub change_percent_24h: Option<f64>,

    /// 24h traded volume in USD
    pub volume_24h: Option<f64>,

    /// Market capitalization in USD
    pub market_cap: Option<f64>,
}

/// A complete quote ready for display
///
/// Numeric fields keep full precision; rounding for display happens in
/// [`DisplayQuote::view`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayQuote {
    /// Current price in USD
    pub price: f64,

    /// Price 24 hours ago in USD
    pub price_24h_ago: f64,

    /// True when `price_24h_ago` was derived from the percentage change
    /// rather than reported by the provider
    pub price_24h_ago_estimated: bool,

    /// 24h change in percent, rounded to 2 decimal places
    pub change_percent: f64,

    /// 24h volume in USD
    pub volume: f64,

    /// Market capitalization in USD
    pub market_cap: f64,

    /// Label such as `BTC-USD`
    pub symbol_label: String,

    /// When the quote was fetched
    pub fetched_at: DateTime<Utc>,
}

impl DisplayQuote {
    /// Formats every field into display strings
    pub fn view(&self) -> QuoteView {
        QuoteView {
            symbol_label: self.symbol_label.clone(),
            price: format!("${}", crate::format::with_separators(self.price, 2)),
            price_24h_ago: format!("${}", crate::format::with_separators(self.price_24h_ago, 2)),
            price_24h_ago_estimated: self.price_24h_ago_estimated,
            change_percent: format!("{:.2}%", self.change_percent),
            volume: crate::format::with_separators(self.volume, 0),
            market_cap: format!("${} USD", crate::format::with_separators(self.market_cap, 0)),
            fetched_at: self.fetched_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        }
    }
}

/// Display strings for a [`DisplayQuote`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteView {
    pub symbol_label: String,
    pub price: String,
    pub price_24h_ago: String,
    pub price_24h_ago_estimated: bool,
    pub change_percent: String,
    pub volume: String,
    pub market_cap: String,
    pub fetched_at: String,
}

/// What the page shows below the form
///
/// A quote and an error message are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    /// Fresh form, nothing checked yet
    Form,
    /// Successful check
    Quote(QuoteView),
    /// Failed check with its user-facing message
    Error(String),
}

/// Health status reported by `/health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Registry populated
    Healthy,
    /// Registry empty, every check will be rejected
    Unhealthy,
}

/// Body of the `/health` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub provider: String,
    pub symbols: usize,
    pub registry_source: String,
    pub registry_built_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn quote() -> DisplayQuote {
        DisplayQuote {
            price: 67000.12,
            price_24h_ago: 65000.5,
            price_24h_ago_estimated: true,
            change_percent: 3.08,
            volume: 31_234_567_890.4,
            market_cap: 1_320_000_000_000.0,
            symbol_label: "BTC-USD".to_string(),
            fetched_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn view_formats_money_fields() {
        let view = quote().view();
        assert_eq!(view.price, "$67,000.12");
        assert_eq!(view.price_24h_ago, "$65,000.50");
        assert_eq!(view.change_percent, "3.08%");
        assert_eq!(view.volume, "31,234,567,890");
        assert_eq!(view.market_cap, "$1,320,000,000,000 USD");
        assert_eq!(view.fetched_at, "2024-03-01 12:30:00 UTC");
        assert!(view.price_24h_ago_estimated);
    }

    #[test]
    fn negative_change_keeps_sign() {
        let mut q = quote();
        q.change_percent = -1.5;
        assert_eq!(q.view().change_percent, "-1.50%");
    }
}
