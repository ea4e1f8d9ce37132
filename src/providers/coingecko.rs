//! CoinGecko market-data provider implementation

use crate::{
    constants::{
        COINGECKO_API_KEY_HEADER, COINGECKO_COINS_ENDPOINT, COINGECKO_COINS_LIST_ENDPOINT,
        COINGECKO_MARKETS_ENDPOINT, REGISTRY_LISTING_SIZE, REQUEST_TIMEOUT_SECS, USER_AGENT,
    },
    error::FetchError,
    provider::MarketDataProvider,
    types::{ListedPair, RawQuote},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Values keyed by quote currency (`usd`, `eur`, ...); CoinGecko sends
/// `null` for currencies it has no figure for
type CurrencyMap = HashMap<String, Option<f64>>;

/// CoinGecko `/coins/{id}` response (only the fields we read)
#[derive(Debug, Deserialize)]
struct CoinResponse {
    id: String,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    market_data: Option<MarketData>,
}

#[derive(Debug, Deserialize)]
struct MarketData {
    #[serde(default)]
    current_price: CurrencyMap,
    #[serde(default)]
    price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    total_volume: CurrencyMap,
    #[serde(default)]
    market_cap: CurrencyMap,
}

/// One row of `/coins/markets`
#[derive(Debug, Deserialize)]
struct MarketRow {
    id: String,
    symbol: String,
}

fn usd(values: &CurrencyMap) -> Option<f64> {
    values.get("usd").copied().flatten()
}

/// Maps a non-success status to the matching fetch error
fn check_status(status: StatusCode) -> Result<(), FetchError> {
    match status {
        StatusCode::NOT_FOUND => Err(FetchError::NotFound),
        StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited),
        s if !s.is_success() => Err(FetchError::Upstream(s.as_u16())),
        _ => Ok(()),
    }
}

/// Reshapes a `/coins/{id}` payload into a provider-neutral quote
///
/// A payload without `market_data` yields a quote with no price, which the
/// normalizer rejects.
fn parse_coin(response: CoinResponse) -> RawQuote {
    let mut quote = RawQuote {
        provider_id: response.id,
        symbol: response.symbol,
        ..RawQuote::default()
    };

    if let Some(market) = response.market_data {
        quote.price = usd(&market.current_price);
        quote.change_percent_24h = market.price_change_percentage_24h;
        quote.volume_24h = usd(&market.total_volume);
        quote.market_cap = usd(&market.market_cap);
    }

    quote
}

/// Turns market rows into `SYMBOL-USD` pairs; CoinGecko prices every row in
/// the requested `vs_currency`
fn parse_markets(rows: Vec<MarketRow>) -> Vec<ListedPair> {
    rows.into_iter()
        .filter(|row| !row.id.is_empty() && !row.symbol.is_empty())
        .map(|row| ListedPair::new(format!("{}-USD", row.symbol.to_uppercase()), row.id))
        .collect()
}

/// CoinGecko market-data provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. `https://api.coingecko.com/api/v3`
    /// * `api_key` - Optional demo API key sent with every request
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, api_key, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Creates a provider whose requests give up after `timeout`
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self::with_client(client, base_url, api_key))
    }

    fn with_client(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Issues one GET and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "Requesting CoinGecko");

        let mut request = self.client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.header(COINGECKO_API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if let Err(e) = check_status(status) {
            tracing::warn!(url = %url, status = status.as_u16(), "CoinGecko request failed");
            return Err(e);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(
                url = %url,
                error = %e,
                body_len = body.len(),
                "Unparseable CoinGecko response"
            );
            FetchError::InvalidResponse(format!("Failed to parse CoinGecko response: {}", e))
        })
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn fetch_quote(&self, provider_id: &str) -> Result<RawQuote, FetchError> {
        let path = format!("{}/{}", COINGECKO_COINS_ENDPOINT, provider_id);
        let response: CoinResponse = self
            .get_json(
                &path,
                &[
                    ("localization", "false"),
                    ("tickers", "false"),
                    ("community_data", "false"),
                    ("developer_data", "false"),
                ],
            )
            .await?;

        Ok(parse_coin(response))
    }

    async fn list_symbols(&self) -> Result<Vec<ListedPair>, FetchError> {
        let per_page = REGISTRY_LISTING_SIZE.to_string();
        let rows: Vec<MarketRow> = self
            .get_json(
                COINGECKO_MARKETS_ENDPOINT,
                &[
                    ("vs_currency", "usd"),
                    ("order", "market_cap_desc"),
                    ("per_page", per_page.as_str()),
                    ("page", "1"),
                ],
            )
            .await?;

        let pairs = parse_markets(rows);
        tracing::debug!(count = pairs.len(), "Fetched symbol listing from CoinGecko");
        Ok(pairs)
    }

    async fn raw_tickers(&self) -> Result<serde_json::Value, FetchError> {
        self.get_json(COINGECKO_MARKETS_ENDPOINT, &[("vs_currency", "usd")])
            .await
    }

    async fn raw_symbols(&self) -> Result<serde_json::Value, FetchError> {
        self.get_json(COINGECKO_COINS_LIST_ENDPOINT, &[]).await
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one connection on a local port with a canned HTTP response
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    /// Accepts one connection and never answers
    async fn serve_silence() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            tokio::time::sleep(Duration::from_secs(30)).await;
        });
        format!("http://{}", addr)
    }

    fn local_provider(base_url: String, timeout: Duration) -> CoinGeckoProvider {
        let client = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .unwrap();
        CoinGeckoProvider::with_client(client, base_url, None)
    }

    async fn fetch_from(
        status_line: &'static str,
        body: &'static str,
    ) -> Result<RawQuote, FetchError> {
        let url = serve_once(status_line, body).await;
        local_provider(url, Duration::from_secs(5))
            .fetch_quote("bitcoin")
            .await
    }

    #[tokio::test]
    async fn http_not_found_is_not_found() {
        let result = fetch_from("404 Not Found", r#"{"error":"coin not found"}"#).await;
        assert_eq!(result, Err(FetchError::NotFound));
    }

    #[tokio::test]
    async fn http_too_many_requests_is_rate_limited() {
        let result = fetch_from("429 Too Many Requests", "").await;
        assert_eq!(result, Err(FetchError::RateLimited));
    }

    #[tokio::test]
    async fn http_service_unavailable_is_upstream() {
        let result = fetch_from("503 Service Unavailable", "maintenance").await;
        assert_eq!(result, Err(FetchError::Upstream(503)));
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let result = fetch_from("200 OK", "{not json").await;
        assert!(matches!(result, Err(FetchError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn well_formed_body_is_parsed() {
        let quote = fetch_from(
            "200 OK",
            r#"{"id":"bitcoin","symbol":"btc","market_data":{"current_price":{"usd":1.5}}}"#,
        )
        .await
        .unwrap();
        assert_eq!(quote.provider_id, "bitcoin");
        assert_eq!(quote.price, Some(1.5));
    }

    #[tokio::test]
    async fn stalled_server_times_out() {
        let url = serve_silence().await;
        let result = local_provider(url, Duration::from_millis(200))
            .fetch_quote("bitcoin")
            .await;
        assert_eq!(result, Err(FetchError::Timeout));
    }

    #[test]
    fn parses_full_coin_payload() {
        let body = r#"{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "market_data": {
                "current_price": { "usd": 67000.12, "eur": 61000.0 },
                "price_change_percentage_24h": 2.5,
                "total_volume": { "usd": 31000000000.0 },
                "market_cap": { "usd": 1320000000000.0 }
            }
        }"#;
        let response: CoinResponse = serde_json::from_str(body).unwrap();
        let quote = parse_coin(response);

        assert_eq!(quote.provider_id, "bitcoin");
        assert_eq!(quote.symbol.as_deref(), Some("btc"));
        assert_eq!(quote.price, Some(67000.12));
        assert_eq!(quote.change_percent_24h, Some(2.5));
        assert_eq!(quote.volume_24h, Some(31_000_000_000.0));
        assert_eq!(quote.market_cap, Some(1_320_000_000_000.0));
        assert_eq!(quote.price_24h_ago, None);
    }

    #[test]
    fn missing_market_data_leaves_price_empty() {
        let response: CoinResponse =
            serde_json::from_str(r#"{ "id": "ghost", "symbol": "gst" }"#).unwrap();
        let quote = parse_coin(response);
        assert_eq!(quote.price, None);
        assert_eq!(quote.symbol.as_deref(), Some("gst"));
    }

    #[test]
    fn null_usd_values_are_absent() {
        let body = r#"{
            "id": "newcoin",
            "symbol": "new",
            "market_data": {
                "current_price": { "usd": 0.42 },
                "price_change_percentage_24h": null,
                "total_volume": { "usd": null },
                "market_cap": {}
            }
        }"#;
        let quote = parse_coin(serde_json::from_str(body).unwrap());
        assert_eq!(quote.price, Some(0.42));
        assert_eq!(quote.change_percent_24h, None);
        assert_eq!(quote.volume_24h, None);
        assert_eq!(quote.market_cap, None);
    }

    #[test]
    fn status_classification() {
        assert_eq!(check_status(StatusCode::OK), Ok(()));
        assert_eq!(check_status(StatusCode::NOT_FOUND), Err(FetchError::NotFound));
        assert_eq!(
            check_status(StatusCode::TOO_MANY_REQUESTS),
            Err(FetchError::RateLimited)
        );
        assert_eq!(
            check_status(StatusCode::BAD_GATEWAY),
            Err(FetchError::Upstream(502))
        );
        assert_eq!(
            check_status(StatusCode::UNAUTHORIZED),
            Err(FetchError::Upstream(401))
        );
    }

    #[test]
    fn markets_become_usd_pairs() {
        let rows: Vec<MarketRow> = serde_json::from_str(
            r#"[
                { "id": "bitcoin", "symbol": "btc", "current_price": 1.0 },
                { "id": "", "symbol": "bad" },
                { "id": "ethereum", "symbol": "eth" }
            ]"#,
        )
        .unwrap();
        let pairs = parse_markets(rows);
        assert_eq!(
            pairs,
            vec![
                ListedPair::new("BTC-USD", "bitcoin"),
                ListedPair::new("ETH-USD", "ethereum"),
            ]
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider = CoinGeckoProvider::new("http://localhost:1234/api/v3/", None).unwrap();
        assert_eq!(provider.base_url, "http://localhost:1234/api/v3");
        assert_eq!(provider.provider_name(), "coingecko");

        let provider = CoinGeckoProvider::with_timeout(
            "http://localhost:1234/",
            Some("key".to_string()),
            Duration::from_millis(250),
        )
        .unwrap();
        assert_eq!(provider.base_url, "http://localhost:1234");
        assert_eq!(provider.api_key.as_deref(), Some("key"));
    }
}
