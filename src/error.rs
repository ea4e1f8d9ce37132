//! Error types for the crypto price checker

use thiserror::Error;

/// Errors that can occur when fetching data from the market-data provider
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    /// Provider does not know the identifier (HTTP 404)
    #[error("Provider returned 404 Not Found")]
    NotFound,

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Timeout waiting for response
    #[error("Request timeout")]
    Timeout,

    /// Any other non-2xx status
    #[error("Provider returned HTTP {0}")]
    Upstream(u16),

    /// Connection-level failure reaching the provider
    #[error("Transport error: {0}")]
    Transport(String),

    /// Body could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Errors that can occur when refreshing the symbol registry
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The listing request failed
    #[error("Symbol listing failed: {0}")]
    Fetch(#[from] FetchError),

    /// The listing had no pair with an accepted quote currency
    #[error("Symbol listing contained no usable pairs")]
    EmptyListing,
}

/// Reasons a raw quote cannot be turned into a display record
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NormalizeError {
    /// Current price missing from the payload
    #[error("Current price missing")]
    MissingPrice,

    /// Current price present but not a usable number
    #[error("Current price is not a finite number: {0}")]
    InvalidPrice(f64),

    /// The 24h-ago price cannot be derived (a change of -100% or worse)
    #[error("Price 24h ago cannot be derived from the 24h change: {0}")]
    InvalidPriorPrice(f64),
}

/// Every way a price check can fail, as shown to the user
///
/// The `Display` text of each variant is the exact message rendered on the
/// page. Internal detail (provider bodies, transport errors) is logged where
/// the error is produced and never carried here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CheckError {
    /// Empty or missing symbol
    #[error("Please enter a cryptocurrency symbol.")]
    InputInvalid,

    /// Symbol not present in the registry
    #[error("Cryptocurrency \"{symbol}\" not supported. Try: {}, etc.", .examples.join(", "))]
    SymbolUnsupported {
        symbol: String,
        examples: Vec<String>,
    },

    /// Registry knew the symbol but the provider returned 404
    #[error("Cryptocurrency \"{symbol}\" not found. Try: {}, etc.", .examples.join(", "))]
    UpstreamNotFound {
        symbol: String,
        examples: Vec<String>,
    },

    /// Provider rate limit hit
    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    UpstreamRateLimited,

    /// Provider did not answer in time
    #[error("The price service took too long to respond. Please try again.")]
    UpstreamTimeout,

    /// Provider answered with an unexpected status
    #[error("An error occurred while fetching the price. Please try again later.")]
    UpstreamOther(u16),

    /// Payload lacked the fields needed for a quote
    #[error("No market data available for {symbol}.")]
    DataUnavailable { symbol: String },

    /// Network failure reaching the provider
    #[error("An error occurred while fetching the price. Please try again later.")]
    Transport,
}

impl CheckError {
    /// Builds the error for a failed fetch of `symbol`
    pub fn from_fetch(err: FetchError, symbol: &str, examples: Vec<String>) -> Self {
        match err {
            FetchError::NotFound => Self::UpstreamNotFound {
                symbol: symbol.to_string(),
                examples,
            },
            FetchError::RateLimited => Self::UpstreamRateLimited,
            FetchError::Timeout => Self::UpstreamTimeout,
            FetchError::Upstream(status) => Self::UpstreamOther(status),
            FetchError::Transport(_) => Self::Transport,
            FetchError::InvalidResponse(_) => Self::DataUnavailable {
                symbol: symbol.to_string(),
            },
        }
    }

    /// Short stable name of the variant, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InputInvalid => "input_invalid",
            Self::SymbolUnsupported { .. } => "symbol_unsupported",
            Self::UpstreamNotFound { .. } => "upstream_not_found",
            Self::UpstreamRateLimited => "upstream_rate_limited",
            Self::UpstreamTimeout => "upstream_timeout",
            Self::UpstreamOther(_) => "upstream_other",
            Self::DataUnavailable { .. } => "data_unavailable",
            Self::Transport => "transport",
        }
    }
}
