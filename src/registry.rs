//! Symbol registry: maps user-entered tickers to provider identifiers
//!
//! The current mapping is an immutable [`RegistrySnapshot`] behind an
//! `Arc`. Lookups clone the `Arc` under a momentary read lock; a refresh
//! builds a complete new snapshot first and then swaps the pointer, so
//! readers see either the old mapping or the new one, never a mix.

use crate::{
    constants::{ACCEPTED_QUOTE_SUFFIXES, EXAMPLE_SYMBOLS, STATIC_SYMBOLS},
    error::RegistryError,
    provider::MarketDataProvider,
    types::{ListedPair, SymbolEntry},
};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Uppercases and trims raw user input
pub fn normalize_input(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Extracts the base ticker, e.g. `BTC` from `btc-usd`
pub fn base_ticker(input: &str) -> String {
    let normalized = normalize_input(input);
    match normalized.split_once('-') {
        Some((base, _)) => base.trim().to_string(),
        None => normalized,
    }
}

/// Where a snapshot's entries came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    /// Built-in table
    Static,
    /// Provider listing
    Provider,
}

impl SnapshotSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotSource::Static => "static",
            SnapshotSource::Provider => "provider",
        }
    }
}

/// Immutable ticker mapping
#[derive(Debug)]
pub struct RegistrySnapshot {
    /// Entries sorted by ticker
    entries: Vec<SymbolEntry>,
    /// Ticker -> index into `entries`
    index: HashMap<String, usize>,
    source: SnapshotSource,
    built_at: DateTime<Utc>,
}

impl RegistrySnapshot {
    /// Builds a snapshot from entries
    ///
    /// Entries with an empty ticker or id are dropped; when a ticker repeats,
    /// the first occurrence wins. The result is sorted by ticker.
    pub fn new(entries: impl IntoIterator<Item = SymbolEntry>, source: SnapshotSource) -> Self {
        let mut seen = HashSet::new();
        let mut entries: Vec<SymbolEntry> = entries
            .into_iter()
            .filter(|e| !e.user_symbol.is_empty() && !e.provider_id.is_empty())
            .filter(|e| seen.insert(e.user_symbol.clone()))
            .collect();
        entries.sort_by(|a, b| a.user_symbol.cmp(&b.user_symbol));

        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.user_symbol.clone(), i))
            .collect();

        Self {
            entries,
            index,
            source,
            built_at: Utc::now(),
        }
    }

    /// Snapshot of the built-in table
    pub fn from_static() -> Self {
        Self::new(
            STATIC_SYMBOLS
                .iter()
                .map(|(symbol, id)| SymbolEntry::new(*symbol, *id)),
            SnapshotSource::Static,
        )
    }

    /// Builds a snapshot from a provider listing
    ///
    /// Keeps pairs quoted in an accepted currency (`-USD`, `-USDT`) and
    /// strips the suffix. Provider order decides which id a repeated ticker
    /// maps to.
    pub fn from_listing(pairs: &[ListedPair]) -> Self {
        let entries = pairs.iter().filter_map(|pair| {
            let pair_name = normalize_input(&pair.pair);
            // a base containing '-' could never come back out of base_ticker
            ACCEPTED_QUOTE_SUFFIXES.iter().find_map(|suffix| {
                pair_name
                    .strip_suffix(suffix)
                    .filter(|base| !base.is_empty() && !base.contains('-'))
                    .map(|base| SymbolEntry::new(base, pair.provider_id.clone()))
            })
        });
        Self::new(entries, SnapshotSource::Provider)
    }

    pub fn get(&self, ticker: &str) -> Option<&SymbolEntry> {
        self.index.get(ticker).map(|&i| &self.entries[i])
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn source(&self) -> SnapshotSource {
        self.source
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}

/// Process-wide symbol registry
pub struct SymbolRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
}

impl SymbolRegistry {
    /// Creates a registry seeded with the built-in table
    pub fn new() -> Self {
        Self::with_snapshot(RegistrySnapshot::from_static())
    }

    /// Creates a registry with a given snapshot
    pub fn with_snapshot(snapshot: RegistrySnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Returns the current snapshot
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        // A panic while holding the lock cannot leave a half-written
        // snapshot, so a poisoned lock still holds a valid pointer.
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolves user input to a provider identifier
    ///
    /// Returns `None` when the base ticker is not in the current mapping.
    pub fn resolve(&self, user_input: &str) -> Option<String> {
        let ticker = base_ticker(user_input);
        self.snapshot()
            .get(&ticker)
            .map(|entry| entry.provider_id.clone())
    }

    /// All known tickers, sorted
    pub fn symbols(&self) -> Vec<String> {
        self.snapshot()
            .entries()
            .iter()
            .map(|e| e.user_symbol.clone())
            .collect()
    }

    /// Up to `limit` tickers to suggest to the user
    ///
    /// Prefers the well-known examples that are present, then fills up with
    /// other known tickers in sorted order.
    pub fn example_symbols(&self, limit: usize) -> Vec<String> {
        let snapshot = self.snapshot();
        let mut examples: Vec<String> = EXAMPLE_SYMBOLS
            .iter()
            .filter(|s| snapshot.get(s).is_some())
            .map(|s| s.to_string())
            .collect();

        for entry in snapshot.entries() {
            if examples.len() >= limit {
                break;
            }
            if !examples.contains(&entry.user_symbol) {
                examples.push(entry.user_symbol.clone());
            }
        }

        examples.truncate(limit);
        examples
    }

    /// Replaces the mapping wholesale
    pub fn replace(&self, snapshot: RegistrySnapshot) {
        let snapshot = Arc::new(snapshot);
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = snapshot;
    }

    /// Rebuilds the mapping from the provider's listing
    ///
    /// Best-effort: on any failure, including a listing with no usable
    /// pairs, the current mapping is kept unchanged.
    ///
    /// # Returns
    /// Number of tickers in the new mapping
    pub async fn refresh(&self, provider: &dyn MarketDataProvider) -> Result<usize, RegistryError> {
        let pairs = provider.list_symbols().await?;
        let snapshot = RegistrySnapshot::from_listing(&pairs);
        if snapshot.is_empty() {
            return Err(RegistryError::EmptyListing);
        }

        let count = snapshot.len();
        self.replace(snapshot);
        tracing::info!(
            symbols = count,
            provider = provider.provider_name(),
            "Symbol registry refreshed"
        );
        Ok(count)
    }

    /// Starts the background refresh task
    ///
    /// Refreshes immediately, then every `interval`. Failures are logged and
    /// the previous mapping stays in place until the next attempt.
    pub fn start_refresh_task(
        self: &Arc<Self>,
        provider: Arc<dyn MarketDataProvider>,
        interval: Duration,
    ) -> JoinHandle<()> {
        let registry = self.clone();

        tokio::spawn(async move {
            tracing::info!(
                refresh_interval_secs = interval.as_secs(),
                "Starting symbol registry refresh task"
            );

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = registry.refresh(provider.as_ref()).await {
                    tracing::warn!(
                        error = %e,
                        "Failed to refresh symbol registry, keeping current mapping"
                    );
                }
            }
        })
    }
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
