//! Turns raw provider quotes into display records

use crate::{
    error::NormalizeError,
    format::round_to,
    types::{DisplayQuote, RawQuote},
};
use chrono::{DateTime, Utc};

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Normalizes a raw quote, stamping it with the current time
pub fn normalize(raw: &RawQuote) -> Result<DisplayQuote, NormalizeError> {
    normalize_at(raw, Utc::now())
}

/// Normalizes a raw quote fetched at `fetched_at`
///
/// Deterministic: the same input always yields the same record.
///
/// * The current price is required; without it there is no record at all.
/// * The 24h-ago price is taken from the provider when reported. Otherwise
///   it is estimated as `price / (1 + pct / 100)`, with a missing or zero
///   percentage meaning no change, so the estimate equals the price.
/// * The change percentage comes from the provider, or is computed from the
///   two prices when only those are known.
/// * Volume and market cap fall back to 0.
pub fn normalize_at(
    raw: &RawQuote,
    fetched_at: DateTime<Utc>,
) -> Result<DisplayQuote, NormalizeError> {
    let price = match raw.price {
        None => return Err(NormalizeError::MissingPrice),
        Some(p) if !p.is_finite() => return Err(NormalizeError::InvalidPrice(p)),
        Some(p) => p,
    };

    let pct = finite(raw.change_percent_24h);
    let reported_prior = finite(raw.price_24h_ago);

    let (price_24h_ago, estimated) = match reported_prior {
        Some(prior) => (prior, false),
        None => match pct {
            None => (price, true),
            Some(p) if p == 0.0 => (price, true),
            Some(p) => {
                let divisor = 1.0 + p / 100.0;
                let prior = price / divisor;
                if divisor <= 0.0 || !prior.is_finite() {
                    return Err(NormalizeError::InvalidPriorPrice(prior));
                }
                (prior, true)
            }
        },
    };

    let change = match pct {
        Some(p) => p,
        None if price_24h_ago == 0.0 => 0.0,
        None => (price - price_24h_ago) / price_24h_ago * 100.0,
    };

    let symbol = raw
        .symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(&raw.provider_id);

    Ok(DisplayQuote {
        price,
        price_24h_ago,
        price_24h_ago_estimated: estimated,
        change_percent: round_to(change, 2),
        volume: finite(raw.volume_24h).unwrap_or(0.0),
        market_cap: finite(raw.market_cap).unwrap_or(0.0),
        symbol_label: format!("{}-USD", symbol.to_uppercase()),
        fetched_at,
    })
}
