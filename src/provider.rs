//! Provider abstraction for fetching market data from external APIs

use crate::{
    error::FetchError,
    types::{ListedPair, RawQuote},
};
use async_trait::async_trait;

/// Trait for market-data providers
///
/// Every method issues at most one outbound request and never retries; a
/// failed attempt is returned to the caller as is.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches the current market data for a single asset
    ///
    /// # Arguments
    /// * `provider_id` - The provider's identifier for the asset (e.g. `bitcoin`)
    ///
    /// # Returns
    /// The raw quote, or the kind of failure that occurred
    async fn fetch_quote(&self, provider_id: &str) -> Result<RawQuote, FetchError>;

    /// Lists tradeable pairs as `BASE-QUOTE` with the base asset's identifier
    ///
    /// Used to rebuild the symbol registry.
    async fn list_symbols(&self) -> Result<Vec<ListedPair>, FetchError>;

    /// Returns the provider's ticker listing unmodified
    async fn raw_tickers(&self) -> Result<serde_json::Value, FetchError>;

    /// Returns the provider's symbol listing unmodified
    async fn raw_symbols(&self) -> Result<serde_json::Value, FetchError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}
