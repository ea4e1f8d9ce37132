//! Constants for the crypto price checker
//!
//! Compile-time defaults. Anything an operator may want to change at runtime
//! is read by `config::Config` and falls back to the values here.

/// Port the web server listens on when `PORT` is not set
pub const DEFAULT_PORT: u16 = 3000;

/// HTTP request timeout when talking to the market-data provider (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko endpoint for a single coin's full record (`/coins/{id}`)
pub const COINGECKO_COINS_ENDPOINT: &str = "/coins";

/// CoinGecko endpoint listing every coin id with its symbol
pub const COINGECKO_COINS_LIST_ENDPOINT: &str = "/coins/list";

/// CoinGecko endpoint with market rows (price, volume, market cap) per coin
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// Header carrying the optional CoinGecko demo API key
pub const COINGECKO_API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Number of market rows requested when refreshing the symbol registry
pub const REGISTRY_LISTING_SIZE: u32 = 250;

/// Quote-currency suffixes accepted when building the registry from a listing
pub const ACCEPTED_QUOTE_SUFFIXES: &[&str] = &["-USD", "-USDT"];

/// Well-known tickers suggested to the user when a symbol is rejected
pub const EXAMPLE_SYMBOLS: &[&str] = &["BTC", "ETH", "SOL", "XRP", "ADA", "DOGE"];

/// Built-in ticker to CoinGecko id table used until (or instead of) a refresh
pub const STATIC_SYMBOLS: &[(&str, &str)] = &[
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("USDT", "tether"),
    ("BNB", "binancecoin"),
    ("SOL", "solana"),
    ("XRP", "ripple"),
    ("ADA", "cardano"),
    ("DOGE", "dogecoin"),
    ("TRX", "tron"),
    ("DOT", "polkadot"),
    ("MATIC", "matic-network"),
    ("LTC", "litecoin"),
    ("SHIB", "shiba-inu"),
    ("AVAX", "avalanche-2"),
    ("UNI", "uniswap"),
    ("LINK", "chainlink"),
];

/// User agent for HTTP requests
pub const USER_AGENT: &str = "crypto-price-checker/0.1.0";
