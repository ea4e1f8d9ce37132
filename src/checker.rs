//! Price check orchestration
//!
//! One check walks through fixed stages and always ends in a rendered
//! outcome, either a quote or a single user-facing error:
//!
//! ```text
//! Idle -> Validating -> Fetching -> Normalizing -> Rendered(quote)
//!            |             |             |
//!            +-------------+-------------+--------> Rendered(error)
//! ```
//!
//! Nothing is retried. Internal detail is logged here and never copied into
//! the returned [`CheckError`].

use crate::{
    error::CheckError,
    normalizer::normalize,
    provider::MarketDataProvider,
    registry::{normalize_input, SymbolRegistry},
    types::DisplayQuote,
};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Number of tickers suggested when a symbol is rejected
const EXAMPLES_IN_ERRORS: usize = 6;

/// Runs price checks against a registry and a provider
#[derive(Clone)]
pub struct PriceChecker {
    registry: Arc<SymbolRegistry>,
    provider: Arc<dyn MarketDataProvider>,
}

impl PriceChecker {
    pub fn new(registry: Arc<SymbolRegistry>, provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { registry, provider }
    }

    pub fn registry(&self) -> &Arc<SymbolRegistry> {
        &self.registry
    }

    pub fn provider(&self) -> &Arc<dyn MarketDataProvider> {
        &self.provider
    }

    /// Checks the price for user input such as `btc` or `ETH-USD`
    pub async fn check(&self, input: &str) -> Result<DisplayQuote, CheckError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("check_price", %request_id);
        let result = self.run(input).instrument(span.clone()).await;

        span.in_scope(|| match &result {
            Ok(quote) => tracing::info!(
                symbol = %quote.symbol_label,
                price = quote.price,
                "Price check succeeded"
            ),
            Err(e) => tracing::info!(kind = e.kind(), "Price check failed"),
        });

        result
    }

    async fn run(&self, input: &str) -> Result<DisplayQuote, CheckError> {
        let symbol = normalize_input(input);
        tracing::debug!(stage = "validating", input = %symbol);
        if symbol.is_empty() {
            return Err(CheckError::InputInvalid);
        }

        let provider_id = self.registry.resolve(&symbol).ok_or_else(|| {
            CheckError::SymbolUnsupported {
                symbol: symbol.clone(),
                examples: self.registry.example_symbols(EXAMPLES_IN_ERRORS),
            }
        })?;

        tracing::debug!(stage = "fetching", provider_id = %provider_id);
        let raw = self
            .provider
            .fetch_quote(&provider_id)
            .await
            .map_err(|e| {
                tracing::warn!(
                    provider = self.provider.provider_name(),
                    provider_id = %provider_id,
                    error = %e,
                    "Failed to fetch quote"
                );
                CheckError::from_fetch(
                    e,
                    &symbol,
                    self.registry.example_symbols(EXAMPLES_IN_ERRORS),
                )
            })?;

        tracing::debug!(stage = "normalizing", provider_id = %provider_id);
        normalize(&raw).map_err(|e| {
            tracing::warn!(
                provider_id = %provider_id,
                error = %e,
                "Quote has no usable market data"
            );
            CheckError::DataUnavailable { symbol }
        })
    }
}
