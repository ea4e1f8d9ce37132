//! HTTP surface: routes, handlers and shared state.

use crate::{
    checker::PriceChecker,
    error::FetchError,
    types::{HealthReport, HealthStatus, PageView},
    view::render_page,
};
use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub checker: PriceChecker,
}

impl AppState {
    pub fn new(checker: PriceChecker) -> Self {
        Self { checker }
    }
}

/// Body of `POST /check-price`.
#[derive(Debug, Deserialize)]
pub struct CheckPriceForm {
    #[serde(rename = "cryptoSymbol", default)]
    pub crypto_symbol: Option<String>,
}

/// Builds the router with every route and the trace layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/check-price", post(check_price))
        .route("/tickers", get(tickers))
        .route("/symbols", get(symbols))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / - Input page.
async fn index(State(state): State<AppState>) -> Html<String> {
    let symbols = state.checker.registry().symbols();
    Html(render_page(&PageView::Form, "", &symbols))
}

/// POST /check-price - Look up a symbol and render the result.
///
/// Always answers 200 with a page; failures are shown as a message.
async fn check_price(
    State(state): State<AppState>,
    form: Result<Form<CheckPriceForm>, FormRejection>,
) -> Html<String> {
    let input = match form {
        Ok(Form(form)) => form.crypto_symbol.unwrap_or_default(),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable check-price form");
            String::new()
        }
    };

    let view = match state.checker.check(&input).await {
        Ok(quote) => PageView::Quote(quote.view()),
        Err(e) => PageView::Error(e.to_string()),
    };

    let symbols = state.checker.registry().symbols();
    Html(render_page(&view, input.trim(), &symbols))
}

/// GET /tickers - Provider market listing, unmodified.
async fn tickers(State(state): State<AppState>) -> Response {
    passthrough(state.checker.provider().raw_tickers().await)
}

/// GET /symbols - Provider symbol listing, unmodified.
async fn symbols(State(state): State<AppState>) -> Response {
    passthrough(state.checker.provider().raw_symbols().await)
}

fn passthrough(result: Result<serde_json::Value, FetchError>) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Pass-through request failed");
            let (status, message) = match e {
                FetchError::RateLimited => (
                    StatusCode::TOO_MANY_REQUESTS,
                    "Rate limit exceeded. Please wait a moment and try again.",
                ),
                FetchError::Timeout => (
                    StatusCode::GATEWAY_TIMEOUT,
                    "The price service took too long to respond.",
                ),
                _ => (
                    StatusCode::BAD_GATEWAY,
                    "The price service could not be reached.",
                ),
            };
            (status, Json(serde_json::json!({ "error": message }))).into_response()
        }
    }
}

/// GET /health - Registry and provider status.
async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let snapshot = state.checker.registry().snapshot();
    let status = if snapshot.is_empty() {
        HealthStatus::Unhealthy
    } else {
        HealthStatus::Healthy
    };

    Json(HealthReport {
        status,
        provider: state.checker.provider().provider_name().to_string(),
        symbols: snapshot.len(),
        registry_source: snapshot.source().as_str().to_string(),
        registry_built_at: snapshot.built_at(),
    })
}
