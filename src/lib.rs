//! # Crypto Price Checker
//!
//! A small web server that looks up the current market data for a
//! cryptocurrency ticker on CoinGecko and renders it as a page: price,
//! price 24h ago, 24h change, volume and market cap.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use crypto_price_checker::{CoinGeckoProvider, PriceChecker, SymbolRegistry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(SymbolRegistry::new());
//! let provider = Arc::new(CoinGeckoProvider::new(
//!     "https://api.coingecko.com/api/v3",
//!     None,
//! )?);
//! let checker = PriceChecker::new(registry, provider);
//!
//! match checker.check("btc-usd").await {
//!     Ok(quote) => println!("{}: {}", quote.symbol_label, quote.view().price),
//!     Err(e) => println!("{}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! POST /check-price
//!     ↓
//! PriceChecker::check
//!     ↓ SymbolRegistry::resolve   (ticker -> provider id)
//!     ↓ MarketDataProvider        (one GET, 10s timeout, no retry)
//!     ↓ normalizer::normalize     (RawQuote -> DisplayQuote)
//!     ↓
//! view::render_page
//! ```

pub mod checker;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod normalizer;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod server;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use checker::PriceChecker;
pub use config::Config;
pub use error::{CheckError, FetchError, NormalizeError, RegistryError};
pub use provider::MarketDataProvider;
pub use providers::CoinGeckoProvider;
pub use registry::SymbolRegistry;
pub use types::{DisplayQuote, PageView, QuoteView, RawQuote, SymbolEntry};
