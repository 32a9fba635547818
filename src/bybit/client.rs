// =============================================================================
// Bybit v5 REST Client — public kline endpoint
// =============================================================================
//
// Only the unauthenticated market-data endpoint is used, so no request
// signing is needed. Bybit returns klines newest first with every number
// encoded as a string; the client reverses the list so callers always see
// candles oldest first.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::future::BoxFuture;
use tracing::{debug, instrument, warn};

use crate::market_data::{Candle, CandleSource, KlineRequest};

/// Minimum number of fields in a kline entry:
///   [0] startTime, [1] open, [2] high, [3] low, [4] close, [5] volume,
///   [6] turnover (optional for our purposes)
const MIN_KLINE_FIELDS: usize = 6;

/// Bybit REST client for public market data.
#[derive(Clone)]
pub struct BybitClient {
    base_url: String,
    category: String,
    client: reqwest::Client,
}

impl BybitClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a new `BybitClient`.
    ///
    /// # Arguments
    /// * `base_url` — REST root, e.g. `https://api.bybit.com`.
    /// * `category` — market category, e.g. `spot`.
    /// * `timeout`  — per-request timeout.
    pub fn new(
        base_url: impl Into<String>,
        category: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        debug!(base_url = %base_url, "BybitClient initialised");

        Ok(Self {
            base_url,
            category: category.into(),
            client,
        })
    }

    // -------------------------------------------------------------------------
    // Public market data
    // -------------------------------------------------------------------------

    /// GET /v5/market/kline (public, unsigned).
    ///
    /// Returns candles oldest first.
    #[instrument(
        skip(self, request),
        fields(symbol = %request.symbol, interval = %request.interval, limit = request.limit),
        name = "bybit::get_klines"
    )]
    pub async fn get_klines(&self, request: &KlineRequest) -> Result<Vec<Candle>> {
        let url = format!("{}/v5/market/kline", self.base_url);
        let limit = request.limit.to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("category", self.category.as_str()),
                ("symbol", request.symbol.as_str()),
                ("interval", request.interval.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .context("GET /v5/market/kline request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Bybit GET /v5/market/kline returned {}: {}", status, text);
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse kline response")?;

        let candles = parse_kline_response(&body)?;
        debug!(count = candles.len(), "klines fetched");
        Ok(candles)
    }
}

impl CandleSource for BybitClient {
    fn fetch_candles<'a>(
        &'a self,
        request: &'a KlineRequest,
    ) -> BoxFuture<'a, Result<Vec<Candle>>> {
        Box::pin(self.get_klines(request))
    }
}

impl std::fmt::Debug for BybitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BybitClient")
            .field("base_url", &self.base_url)
            .field("category", &self.category)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Response parsing
// -----------------------------------------------------------------------------

/// Parse a `/v5/market/kline` body into candles, oldest first.
///
/// Fails on a non-zero `retCode`, a missing `result.list`, or any number that
/// does not parse to a finite `f64`. Entries with too few fields are skipped.
pub fn parse_kline_response(body: &serde_json::Value) -> Result<Vec<Candle>> {
    let ret_code = body["retCode"].as_i64().unwrap_or(0);
    if ret_code != 0 {
        let msg = body["retMsg"].as_str().unwrap_or("");
        anyhow::bail!("Bybit kline error retCode={ret_code}: {msg}");
    }

    let raw = body["result"]["list"]
        .as_array()
        .context("kline response missing 'result.list' array")?;

    let mut candles = Vec::with_capacity(raw.len());

    for entry in raw.iter().rev() {
        let arr = entry.as_array().context("kline entry is not an array")?;

        if arr.len() < MIN_KLINE_FIELDS {
            warn!("skipping malformed kline entry with {} elements", arr.len());
            continue;
        }

        let timestamp = parse_i64(&arr[0])?;
        let open = parse_f64(&arr[1])?;
        let high = parse_f64(&arr[2])?;
        let low = parse_f64(&arr[3])?;
        let close = parse_f64(&arr[4])?;
        let volume = parse_f64(&arr[5])?;

        candles.push(Candle::new(timestamp, open, high, low, close, volume));
    }

    Ok(candles)
}

/// Parse a JSON value that may be either a string or a number into a finite
/// `f64`.
fn parse_f64(val: &serde_json::Value) -> Result<f64> {
    let n = if let Some(s) = val.as_str() {
        s.parse::<f64>()
            .with_context(|| format!("failed to parse '{s}' as f64"))?
    } else if let Some(n) = val.as_f64() {
        n
    } else {
        anyhow::bail!("expected string or number, got: {val}")
    };

    if !n.is_finite() {
        anyhow::bail!("non-finite number in kline entry: {val}");
    }
    Ok(n)
}

fn parse_i64(val: &serde_json::Value) -> Result<i64> {
    if let Some(s) = val.as_str() {
        s.parse::<i64>()
            .with_context(|| format!("failed to parse '{s}' as i64"))
    } else if let Some(n) = val.as_i64() {
        Ok(n)
    } else {
        anyhow::bail!("expected string or integer timestamp, got: {val}")
    }
}
