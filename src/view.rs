//! HTML page rendering
//!
//! Everything interpolated into the page goes through [`escape_html`].

use crate::types::{PageView, QuoteView};
use std::fmt::Write;

/// Escapes text for use in HTML element content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:40rem;margin:3rem auto;\
padding:0 1rem;color:#222}form{display:flex;gap:.5rem}\
input[type=text]{flex:1;padding:.5rem;font-size:1rem}button{padding:.5rem 1rem;font-size:1rem}\
table{border-collapse:collapse;margin-top:1.5rem;width:100%}\
td{padding:.4rem;border-bottom:1px solid #ddd}td:first-child{color:#666}\
.error{margin-top:1.5rem;padding:.75rem;background:#fdecea;color:#8a1c10;border-radius:4px}\
.symbols{margin-top:2rem;font-size:.85rem;color:#666}small{color:#888}";

/// Renders the whole page
///
/// # Arguments
/// * `view` - What to show below the form
/// * `input` - Value to pre-fill in the symbol field
/// * `symbols` - Known tickers listed at the bottom of the page
pub fn render_page(view: &PageView, input: &str, symbols: &[String]) -> String {
    let mut html = String::with_capacity(4096);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Crypto Price Checker</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>Crypto Price Checker</h1>\n\
         <form method=\"post\" action=\"/check-price\">\n\
         <input type=\"text\" name=\"cryptoSymbol\" placeholder=\"BTC or BTC-USD\" \
         value=\"{}\" autofocus>\n\
         <button type=\"submit\">Check price</button>\n</form>\n",
        escape_html(input)
    );

    match view {
        PageView::Form => {}
        PageView::Quote(quote) => render_quote(&mut html, quote),
        PageView::Error(message) => {
            let _ = writeln!(html, "<p class=\"error\">{}</p>", escape_html(message));
        }
    }

    if !symbols.is_empty() {
        let _ = writeln!(
            html,
            "<p class=\"symbols\">Supported symbols: {}</p>",
            escape_html(&symbols.join(", "))
        );
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_quote(html: &mut String, quote: &QuoteView) {
    let prior_note = if quote.price_24h_ago_estimated {
        " <small>(estimated from 24h change)</small>"
    } else {
        ""
    };

    let _ = write!(
        html,
        "<h2>{label}</h2>\n<table>\n\
         <tr><td>Price</td><td>{price}</td></tr>\n\
         <tr><td>Price 24h ago</td><td>{prior}{prior_note}</td></tr>\n\
         <tr><td>24h change</td><td>{change}</td></tr>\n\
         <tr><td>24h volume</td><td>{volume}</td></tr>\n\
         <tr><td>Market cap</td><td>{market_cap}</td></tr>\n\
         </table>\n<p><small>Updated {fetched_at}</small></p>\n",
        label = escape_html(&quote.symbol_label),
        price = escape_html(&quote.price),
        prior = escape_html(&quote.price_24h_ago),
        change = escape_html(&quote.change_percent),
        volume = escape_html(&quote.volume),
        market_cap = escape_html(&quote.market_cap),
        fetched_at = escape_html(&quote.fetched_at),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_view() -> QuoteView {
        QuoteView {
            symbol_label: "BTC-USD".to_string(),
            price: "$67,000.12".to_string(),
            price_24h_ago: "$65,000.00".to_string(),
            price_24h_ago_estimated: true,
            change_percent: "3.08%".to_string(),
            volume: "1,234".to_string(),
            market_cap: "$5,678 USD".to_string(),
            fetched_at: "2024-05-01 00:00:00 UTC".to_string(),
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<script>alert("x")</script>&'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;&amp;&#x27;"
        );
    }

    #[test]
    fn quote_page_has_fields_and_no_error() {
        let html = render_page(&PageView::Quote(quote_view()), "btc", &[]);
        assert!(html.contains("$67,000.12"));
        assert!(html.contains("3.08%"));
        assert!(html.contains("estimated from 24h change"));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn error_page_escapes_user_input() {
        let html = render_page(
            &PageView::Error("Cryptocurrency \"<B>\" not supported.".to_string()),
            "<b>",
            &[],
        );
        assert!(html.contains("class=\"error\""));
        assert!(html.contains("&quot;&lt;B&gt;&quot;"));
        assert!(html.contains("value=\"&lt;b&gt;\""));
        assert!(!html.contains("<b>"));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn form_page_lists_symbols() {
        let html = render_page(
            &PageView::Form,
            "",
            &["BTC".to_string(), "ETH".to_string()],
        );
        assert!(html.contains("Supported symbols: BTC, ETH"));
        assert!(html.contains("name=\"cryptoSymbol\""));
    }
}
