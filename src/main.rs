use anyhow::Context;
use crypto_price_checker::server::{router, AppState};
use crypto_price_checker::{
    CoinGeckoProvider, Config, MarketDataProvider, PriceChecker, SymbolRegistry,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let provider: Arc<dyn MarketDataProvider> = Arc::new(
        CoinGeckoProvider::new(config.api_base_url.clone(), config.api_key.clone())
            .context("failed to build CoinGecko client")?,
    );
    let registry = Arc::new(SymbolRegistry::new());

    if let Some(interval) = config.registry_refresh {
        registry.start_refresh_task(provider.clone(), interval);
    }

    let app = router(AppState::new(PriceChecker::new(registry.clone(), provider)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!(
        addr = %config.bind_addr,
        symbols = registry.snapshot().len(),
        api_key = config.api_key.is_some(),
        "Server running"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
