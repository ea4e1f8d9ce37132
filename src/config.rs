//! Server configuration.

use crate::constants::{COINGECKO_API_URL, DEFAULT_PORT};
use anyhow::Context;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub registry_refresh: Option<Duration>,
}

impl Config {
    /// Load configuration from a `.env` file (if any) and the environment.
    ///
    /// Optional:
    /// - `PORT`: Port to bind to (default: 3000)
    /// - `COINGECKO_API_URL`: API root (default: public CoinGecko v3)
    /// - `COINGECKO_API_KEY`: Demo API key sent with every request
    /// - `REGISTRY_REFRESH_SECS`: Rebuild the symbol list from CoinGecko at
    ///   startup and then at this interval; unset or 0 keeps the built-in list
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        let registry_refresh = match get("REGISTRY_REFRESH_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().with_context(|| {
                    format!("REGISTRY_REFRESH_SECS must be a number of seconds, got {raw:?}")
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            api_base_url: get("COINGECKO_API_URL").unwrap_or_else(|| COINGECKO_API_URL.to_string()),
            api_key: get("COINGECKO_API_KEY"),
            registry_refresh,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr.port(), 3000);
        assert_eq!(cfg.api_base_url, COINGECKO_API_URL);
        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.registry_refresh, None);
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("PORT", "8080"),
            ("COINGECKO_API_KEY", "CG-abc"),
            ("COINGECKO_API_URL", "http://localhost:9999"),
            ("REGISTRY_REFRESH_SECS", "3600"),
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.api_key.as_deref(), Some("CG-abc"));
        assert_eq!(cfg.api_base_url, "http://localhost:9999");
        assert_eq!(cfg.registry_refresh, Some(Duration::from_secs(3600)));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = config(&[("COINGECKO_API_KEY", "  "), ("REGISTRY_REFRESH_SECS", "0")]).unwrap();
        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.registry_refresh, None);
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = config(&[("PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
